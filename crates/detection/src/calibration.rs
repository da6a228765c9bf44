//! Per-session EAR baseline calibration
//!
//! The first N measured frames of a session establish a personal baseline
//! from the median of the valid samples. Detection runs concurrently on the
//! same frames and uses a fixed fallback threshold until the baseline lands.

use tracing::info;

/// Calibration stage for the eye-closure baseline.
#[derive(Debug, Clone)]
pub struct Calibration {
    target_frames: u32,
    fallback_baseline: f32,
    frames_seen: u32,
    samples: Vec<f32>,
    baseline: Option<f32>,
}

impl Calibration {
    /// Create a calibration stage collecting over `target_frames` frames
    pub fn new(target_frames: u32, fallback_baseline: f32) -> Self {
        Self {
            target_frames,
            fallback_baseline,
            frames_seen: 0,
            samples: Vec::with_capacity(target_frames as usize),
            baseline: None,
        }
    }

    /// Observe one measured EAR frame.
    ///
    /// Only strictly positive samples are collected; the frame counter
    /// advances regardless. Once the counter reaches the target the baseline
    /// is fixed and further observations are ignored.
    pub fn observe(&mut self, ear: f32) {
        if self.frames_seen >= self.target_frames {
            return;
        }
        if ear > 0.0 {
            self.samples.push(ear);
        }
        self.frames_seen += 1;

        if self.frames_seen == self.target_frames {
            let baseline = if self.samples.is_empty() {
                self.fallback_baseline
            } else {
                median(&mut self.samples)
            };
            self.baseline = Some(baseline);
            info!(baseline, "EAR baseline calibrated");
        }
    }

    /// Personal baseline, once set. Set exactly once per session.
    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// Closure threshold for the current frame: baseline-derived once
    /// calibrated, fixed fallback before that.
    pub fn threshold(&self, multiplier: f32, fallback: f32) -> f32 {
        match self.baseline {
            Some(baseline) => baseline * multiplier,
            None => fallback,
        }
    }
}

fn median(samples: &mut [f32]) -> f32 {
    samples.sort_by(f32::total_cmp);
    let mid = samples.len() / 2;
    if samples.len() % 2 == 0 {
        (samples[mid - 1] + samples[mid]) / 2.0
    } else {
        samples[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_is_median() {
        let mut cal = Calibration::new(5, 0.25);
        for ear in [0.30, 0.10, 0.50, 0.20, 0.40] {
            cal.observe(ear);
        }
        assert_eq!(cal.baseline(), Some(0.30));
    }

    #[test]
    fn test_even_sample_count_median() {
        let mut cal = Calibration::new(4, 0.25);
        for ear in [0.10, 0.20, 0.30, 0.40] {
            cal.observe(ear);
        }
        assert!((cal.baseline().unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_zero_samples_fall_back() {
        let mut cal = Calibration::new(3, 0.25);
        for _ in 0..3 {
            cal.observe(0.0);
        }
        assert_eq!(cal.baseline(), Some(0.25));
    }

    #[test]
    fn test_uncalibrated_uses_fallback_threshold() {
        let cal = Calibration::new(50, 0.25);
        assert!(!cal.is_calibrated());
        assert_eq!(cal.threshold(0.7, 0.22), 0.22);
    }

    #[test]
    fn test_calibrated_threshold_is_dynamic() {
        let mut cal = Calibration::new(1, 0.25);
        cal.observe(0.30);
        assert!((cal.threshold(0.7, 0.22) - 0.21).abs() < 1e-6);
    }

    #[test]
    fn test_baseline_set_exactly_once() {
        let mut cal = Calibration::new(2, 0.25);
        cal.observe(0.30);
        cal.observe(0.30);
        let first = cal.baseline();

        // Later, more stable samples must not move the baseline
        for _ in 0..100 {
            cal.observe(0.99);
        }
        assert_eq!(cal.baseline(), first);
    }

    #[test]
    fn test_invalid_samples_skipped_but_counter_advances() {
        let mut cal = Calibration::new(3, 0.25);
        cal.observe(0.0);
        cal.observe(0.40);
        cal.observe(0.0);
        // Only the 0.40 sample was collected
        assert_eq!(cal.baseline(), Some(0.40));
    }
}
