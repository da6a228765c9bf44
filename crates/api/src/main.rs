//! Focus Monitor Pipeline - Main Entry Point

use std::sync::Arc;
use std::time::Duration;

use api::{app_config::ApiConfig, init_logging, run_server, AppState};
use frame_source::{FrameSource, SyntheticSource};
use monitor::{MonitorConfig, MonitorService, VisionPipeline};
use storage::Repository;
use tracing::info;
use vision::{NullDetector, NullExtractor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Focus Monitor Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = ApiConfig::load()?;
    info!(?config, "Configuration loaded");

    let repository = Arc::new(Repository::new());

    // No real capture device or vision models are wired here; the synthetic
    // source and null vision implementations keep the pipeline runnable.
    let (width, height) = (config.camera_width, config.camera_height);
    let monitor = Arc::new(MonitorService::new(
        Arc::clone(&repository),
        Arc::new(move || Ok(Box::new(SyntheticSource::new(width, height)) as Box<dyn FrameSource>)),
        Arc::new(|| VisionPipeline {
            extractor: Box::new(NullExtractor),
            detector: Box::new(NullDetector),
        }),
        MonitorConfig {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            ..Default::default()
        },
    ));

    let state = Arc::new(AppState::new(repository, monitor));
    run_server(&config.bind_addr, state).await
}
