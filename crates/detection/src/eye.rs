//! Eye-closure detection state machine
//!
//! Hysteresis: the smoothed EAR must stay below the dynamic threshold
//! continuously for the per-user closure duration before an event is
//! confirmed. Any frame at or above threshold discards the candidate; a
//! frame with no smoothed measurement (no face) leaves the candidate alone.

use tracing::debug;

use crate::cooldown::CooldownGate;
use crate::events::{DetectedEvent, EventKind};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClosureState {
    Open,
    Closing { started_at: f64 },
}

/// Hysteresis-and-cooldown state machine for sustained eye closure.
#[derive(Debug, Clone)]
pub struct EyeClosureDetector {
    state: ClosureState,
    gate: CooldownGate,
    min_closure_secs: f64,
}

impl EyeClosureDetector {
    /// Create a detector confirming closures sustained for
    /// `min_closure_secs`, emitting at most once per `cooldown_secs`.
    pub fn new(min_closure_secs: f64, cooldown_secs: f64) -> Self {
        Self {
            state: ClosureState::Open,
            gate: CooldownGate::new(cooldown_secs),
            min_closure_secs,
        }
    }

    /// Advance the state machine by one frame.
    ///
    /// `smoothed` is the smoothed EAR for this frame, or `None` when no
    /// measurement was produced (skipped frame, state untouched).
    pub fn process(
        &mut self,
        smoothed: Option<f32>,
        threshold: f32,
        now: f64,
    ) -> Option<DetectedEvent> {
        let value = smoothed?;

        if value > 0.0 && value < threshold {
            match self.state {
                ClosureState::Open => {
                    self.state = ClosureState::Closing { started_at: now };
                    None
                }
                ClosureState::Closing { started_at } => {
                    let held = now - started_at;
                    if held >= self.min_closure_secs && self.gate.ready(now) {
                        self.gate.mark(now);
                        debug!(duration = held, "eye closure confirmed");
                        // Still closing: repeated confirmation on later
                        // frames is suppressed by the gate, not the state.
                        Some(DetectedEvent {
                            kind: EventKind::EyeClosed,
                            timestamp: now,
                            duration: held,
                        })
                    } else {
                        None
                    }
                }
            }
        } else {
            // Closure must be continuous, not cumulative
            self.state = ClosureState::Open;
            None
        }
    }

    /// Whether a closure candidate is currently in progress
    pub fn is_closing(&self) -> bool {
        matches!(self.state, ClosureState::Closing { .. })
    }
}
