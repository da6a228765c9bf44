//! Detected behavioral events

use serde::{Deserialize, Serialize};

/// Distraction event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Sustained eye closure confirmed
    EyeClosed,

    /// Handheld phone presence confirmed
    PhoneDetected,
}

impl EventKind {
    /// Stable string form used for storage and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::EyeClosed => "eye_closed",
            EventKind::PhoneDetected => "phone_detected",
        }
    }
}

/// A confirmed, cooldown-gated distraction event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedEvent {
    pub kind: EventKind,

    /// Emission time (monotonic seconds, as supplied by the caller)
    pub timestamp: f64,

    /// Length of the confirmed interval (seconds)
    pub duration: f64,
}
