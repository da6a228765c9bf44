//! Vision Contracts for Attention Monitoring
//!
//! Defines what the monitoring loop requires from its vision collaborators:
//! - Facial landmark extraction (for eye-closure measurement)
//! - Object detection (for handheld-phone presence)
//!
//! No particular model is mandated; implementations plug in behind the
//! [`LandmarkExtractor`] and [`ObjectDetector`] traits. Null implementations
//! are provided for runs without a configured model.

pub mod ear;
pub mod landmarks;
pub mod objects;

pub use ear::average_ear;
pub use landmarks::{FaceLandmarks, LandmarkExtractor, NormalizedPoint, NullExtractor};
pub use objects::{DetectedObject, NullDetector, ObjectDetector};

use thiserror::Error;

/// Vision error types
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}
