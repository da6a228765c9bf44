//! Attention Event Detection
//!
//! The per-frame signal-fusion state machine:
//! - Personalized eye-closure baseline calibration
//! - Temporal smoothing of noisy per-frame EAR measurements
//! - Dynamic thresholding with hysteresis-based closure confirmation
//! - Sustained-frame phone-presence confirmation
//! - Cooldown-gated event emission
//!
//! All components are driven by a single caller (the frame worker) and take
//! the current time explicitly, so they carry no clocks and no locks.

pub mod calibration;
pub mod config;
pub mod cooldown;
pub mod events;
pub mod eye;
pub mod phone;
pub mod smoothing;

pub use calibration::Calibration;
pub use config::DetectionConfig;
pub use cooldown::CooldownGate;
pub use events::{DetectedEvent, EventKind};
pub use eye::EyeClosureDetector;
pub use phone::PhonePresenceDetector;
pub use smoothing::SignalSmoother;
