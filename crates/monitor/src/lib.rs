//! Monitoring Control Loop
//!
//! Owns the lifecycle of one monitoring session: acquiring the camera,
//! running the frame worker that drives the detection state machine, and
//! finalizing session totals on stop. All per-session detection state lives
//! inside the worker; control operations touch only the camera handle, the
//! cancellation flag, and the repository.

pub mod aggregate;
mod service;
mod worker;

pub use service::{MonitorConfig, MonitorService, PipelineFactory, SourceFactory, VisionPipeline};

use thiserror::Error;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Monitoring already active")]
    AlreadyActive,

    #[error("No such user")]
    NoUser,

    #[error("Cannot access camera: {0}")]
    CameraUnavailable(#[from] frame_source::FrameError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}
