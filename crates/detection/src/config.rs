//! Detection configuration

use serde::{Deserialize, Serialize};

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Frames collected before the EAR baseline is fixed
    pub baseline_frames: u32,

    /// Baseline used when calibration collects zero valid samples
    pub fallback_baseline: f32,

    /// EAR smoothing window capacity
    pub smooth_window: usize,

    /// Closure threshold = baseline * multiplier once calibrated
    pub dynamic_multiplier: f32,

    /// Closure threshold before calibration completes
    pub fallback_threshold: f32,

    /// Minimum gap between eye_closed emissions (seconds)
    pub eye_cooldown_secs: f64,

    /// Minimum detector confidence for a phone box
    pub phone_confidence: f32,

    /// Minimum phone bounding-box area (square pixels)
    pub min_phone_area: f32,

    /// Consecutive qualifying frames required to confirm a phone
    pub min_phone_frames: u32,

    /// Minimum gap between phone_detected emissions (seconds)
    pub phone_cooldown_secs: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            baseline_frames: 50,
            fallback_baseline: 0.25,
            smooth_window: 8,
            dynamic_multiplier: 0.7,
            fallback_threshold: 0.22,
            eye_cooldown_secs: 5.0,
            phone_confidence: 0.65,
            min_phone_area: 1500.0,
            min_phone_frames: 4,
            phone_cooldown_secs: 5.0,
        }
    }
}

impl DetectionConfig {
    /// Strict config (faster confirmation, shorter cooldowns)
    pub fn strict() -> Self {
        Self {
            min_phone_frames: 3,
            eye_cooldown_secs: 3.0,
            phone_cooldown_secs: 3.0,
            ..Default::default()
        }
    }

    /// Lenient config (more sustained evidence required)
    pub fn lenient() -> Self {
        Self {
            min_phone_frames: 6,
            eye_cooldown_secs: 8.0,
            phone_cooldown_secs: 8.0,
            ..Default::default()
        }
    }
}
