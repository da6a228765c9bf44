//! Monitoring service lifecycle
//!
//! `start` acquires the camera and spawns the frame worker; `stop` flips the
//! cancellation flag, releases the camera, and waits for the worker to
//! finalize the session. The activity flag is readable at any time without
//! blocking the worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use frame_source::{FrameError, FrameSource, SharedCamera};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use detection::DetectionConfig;
use storage::Repository;
use vision::{LandmarkExtractor, ObjectDetector};

use crate::worker::{self, WorkerContext};
use crate::MonitorError;

/// Vision collaborators for one monitoring session
pub struct VisionPipeline {
    pub extractor: Box<dyn LandmarkExtractor>,
    pub detector: Box<dyn ObjectDetector>,
}

/// Opens the frame source at monitoring start
pub type SourceFactory = Arc<dyn Fn() -> Result<Box<dyn FrameSource>, FrameError> + Send + Sync>;

/// Builds the vision collaborators for each session
pub type PipelineFactory = Arc<dyn Fn() -> VisionPipeline + Send + Sync>;

/// Monitor loop configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Fixed inter-frame delay (cooperative CPU throttle)
    pub poll_interval: Duration,
    /// Delay after a failed or empty frame read
    pub retry_interval: Duration,
    /// Detection state-machine tuning
    pub detection: DetectionConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(70),
            retry_interval: Duration::from_millis(50),
            detection: DetectionConfig::default(),
        }
    }
}

/// Controls one monitoring session at a time.
pub struct MonitorService {
    repo: Arc<Repository>,
    camera: SharedCamera,
    source_factory: SourceFactory,
    pipeline_factory: PipelineFactory,
    config: MonitorConfig,
    active: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl MonitorService {
    /// Create a service over the given repository and collaborator factories
    pub fn new(
        repo: Arc<Repository>,
        source_factory: SourceFactory,
        pipeline_factory: PipelineFactory,
        config: MonitorConfig,
    ) -> Self {
        Self {
            repo,
            camera: SharedCamera::new(),
            source_factory,
            pipeline_factory,
            config,
            active: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Whether a monitoring session is currently running. Never blocks.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Start monitoring for a user. Rejections (already active, unknown
    /// user, camera unavailable) are surfaced here and leave state
    /// unchanged; nothing is raised mid-loop.
    pub async fn start(&self, user_id: i64) -> Result<i64, MonitorError> {
        if self.is_active() {
            return Err(MonitorError::AlreadyActive);
        }

        let user = self.repo.user(user_id).map_err(|_| MonitorError::NoUser)?;

        let source = (self.source_factory)()?;
        self.camera.install(source);

        let session = match self.repo.open_session(user_id) {
            Ok(session) => session,
            Err(e) => {
                self.camera.release();
                return Err(e.into());
            }
        };

        self.active.store(true, Ordering::SeqCst);

        let ctx = WorkerContext {
            repo: Arc::clone(&self.repo),
            camera: self.camera.clone(),
            pipeline: (self.pipeline_factory)(),
            active: Arc::clone(&self.active),
            config: self.config.clone(),
            user_id,
            session_id: session.id,
            eye_closure_secs: user.eye_closure_secs,
        };

        let handle = tokio::spawn(worker::run(ctx));
        *self.worker.lock().await = Some(handle);

        info!(user_id, session_id = session.id, "Monitoring started");
        Ok(session.id)
    }

    /// Stop monitoring. Idempotent: a second call is a no-op with respect
    /// to session state. Waits for the worker to finish finalization.
    pub async fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.camera.release();

        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Frame worker join failed");
            }
            info!("Monitoring stopped");
        }
    }
}
