//! Rolling-window signal smoothing

use std::collections::VecDeque;

/// Bounded sliding window producing a moving average of raw samples.
///
/// Length never exceeds capacity; the oldest entry is evicted on overflow
/// (sliding, never reset).
#[derive(Debug, Clone)]
pub struct SignalSmoother {
    window: VecDeque<f32>,
    capacity: usize,
}

impl SignalSmoother {
    /// Create a smoother with the given window capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample and return the updated moving average
    pub fn push(&mut self, sample: f32) -> f32 {
        if self.window.len() >= self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(sample);
        self.mean()
    }

    /// Current moving average; `None` until the first sample arrives.
    ///
    /// Callers must treat "no output" distinctly from a zero value.
    pub fn current(&self) -> Option<f32> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.mean())
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    fn mean(&self) -> f32 {
        self.window.iter().sum::<f32>() / self.window.len() as f32
    }
}
