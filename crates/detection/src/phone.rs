//! Phone-presence detection state machine
//!
//! Requires a run of consecutive qualifying frames before confirming, then
//! emits one event per cooldown period for as long as the phone stays in
//! view (cooldown chaining). A single negative frame discards the candidate.

use tracing::debug;
use vision::DetectedObject;

use crate::config::DetectionConfig;
use crate::cooldown::CooldownGate;
use crate::events::{DetectedEvent, EventKind};

/// Sustained-presence state machine for handheld phones.
#[derive(Debug, Clone)]
pub struct PhonePresenceDetector {
    consecutive: u32,
    started_at: Option<f64>,
    gate: CooldownGate,
    confidence_min: f32,
    area_min: f32,
    min_frames: u32,
}

impl PhonePresenceDetector {
    /// Create a detector from the shared detection configuration
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            consecutive: 0,
            started_at: None,
            gate: CooldownGate::new(config.phone_cooldown_secs),
            confidence_min: config.phone_confidence,
            area_min: config.min_phone_area,
            min_frames: config.min_phone_frames,
        }
    }

    /// Advance the state machine with this frame's detector output.
    ///
    /// Confidence is enforced here as well as at the detector so the
    /// pipeline tolerates detectors without inference-time thresholds.
    pub fn process(&mut self, detections: &[DetectedObject], now: f64) -> Option<DetectedEvent> {
        let qualifying = detections.iter().find(|d| {
            d.is_phone() && d.confidence >= self.confidence_min && d.area() >= self.area_min
        });

        if qualifying.is_some() {
            self.consecutive += 1;
        } else {
            // No partial credit across gaps
            self.consecutive = 0;
            self.started_at = None;
            return None;
        }

        if self.consecutive < self.min_frames {
            return None;
        }

        let started_at = *self.started_at.get_or_insert(now);

        if self.gate.ready(now) {
            let duration = now - started_at;
            self.gate.mark(now);
            // Chain: the next interval is measured from this emission
            self.started_at = Some(now);
            debug!(duration, "phone presence confirmed");
            return Some(DetectedEvent {
                kind: EventKind::PhoneDetected,
                timestamp: now,
                duration,
            });
        }

        None
    }

    /// Current consecutive qualifying-frame count
    pub fn consecutive_frames(&self) -> u32 {
        self.consecutive
    }
}
