//! Application configuration
//!
//! Typed defaults with `FOCUSMON_`-prefixed environment overrides, e.g.
//! `FOCUSMON_BIND_ADDR=127.0.0.1:9000`.

use serde::Deserialize;

/// API binary configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address for the HTTP server
    pub bind_addr: String,
    /// Capture frame width
    pub camera_width: u32,
    /// Capture frame height
    pub camera_height: u32,
    /// Inter-frame delay for the monitor loop (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            camera_width: 640,
            camera_height: 480,
            poll_interval_ms: 70,
        }
    }
}

impl ApiConfig {
    /// Load configuration: defaults overridden by the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("camera_width", 640_i64)?
            .set_default("camera_height", 480_i64)?
            .set_default("poll_interval_ms", 70_i64)?
            .add_source(config::Environment::with_prefix("FOCUSMON"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ApiConfig::load().unwrap();
        assert_eq!(cfg.camera_width, 640);
        assert_eq!(cfg.poll_interval_ms, 70);
    }
}
