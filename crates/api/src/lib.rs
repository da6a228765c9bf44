//! Focus Monitor API Server
//!
//! REST API for the focus monitoring dashboard: user login, monitoring
//! start/stop, session/event reporting, settings, and CSV export.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod app_config;
mod routes;

use monitor::MonitorService;
use storage::Repository;

/// Application state shared across handlers
pub struct AppState {
    /// Storage repository
    pub repository: Arc<Repository>,
    /// Monitoring control loop
    pub monitor: Arc<MonitorService>,
    /// Currently logged-in user
    pub current_user: RwLock<Option<i64>>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state over a repository and monitor service
    pub fn new(repository: Arc<Repository>, monitor: Arc<MonitorService>) -> Self {
        Self {
            repository,
            monitor,
            current_user: RwLock::new(None),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Error payload for rejected requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn reject(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub monitoring_active: bool,
    pub metrics: StoreMetrics,
}

/// Store metrics
#[derive(Debug, Serialize)]
pub struct StoreMetrics {
    pub session_count: usize,
    pub event_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/users", get(routes::users::list_users))
        .route("/api/v1/users/login", post(routes::users::login))
        .route("/api/v1/users/reset", post(routes::users::reset_user_data))
        .route("/api/v1/monitoring/start", post(routes::monitoring::start))
        .route("/api/v1/monitoring/stop", post(routes::monitoring::stop))
        .route("/api/v1/monitoring/status", get(routes::monitoring::status))
        .route("/api/v1/dashboard", get(routes::dashboard::dashboard_data))
        .route("/api/v1/comparison", get(routes::dashboard::comparison_data))
        .route("/api/v1/settings", get(routes::settings::get_settings))
        .route("/api/v1/settings", put(routes::settings::update_settings))
        .route("/api/v1/export/csv", get(routes::export::export_csv))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        monitoring_active: state.monitor.is_active(),
        metrics: StoreMetrics {
            session_count: state.repository.session_count(),
            event_count: state.repository.event_count(),
        },
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    // Ignored when a subscriber is already installed (test harnesses)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Run the server
pub async fn run_server(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use frame_source::{FrameSource, SyntheticSource};
    use monitor::{MonitorConfig, VisionPipeline};
    use tower::ServiceExt;
    use vision::{NullDetector, NullExtractor};

    fn test_state() -> Arc<AppState> {
        let repository = Arc::new(Repository::new());
        let monitor = Arc::new(MonitorService::new(
            Arc::clone(&repository),
            Arc::new(|| Ok(Box::new(SyntheticSource::new(64, 48)) as Box<dyn FrameSource>)),
            Arc::new(|| VisionPipeline {
                extractor: Box::new(NullExtractor),
                detector: Box::new(NullDetector),
            }),
            MonitorConfig::default(),
        ));
        Arc::new(AppState::new(repository, monitor))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["monitoring_active"], false);
    }

    #[tokio::test]
    async fn test_login_then_settings() {
        let state = test_state();

        let response = create_router(Arc::clone(&state))
            .oneshot(json_request(
                "POST",
                "/api/v1/users/login",
                serde_json::json!({ "username": "alice" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user"]["username"], "alice");

        let response = create_router(state)
            .oneshot(Request::get("/api/v1/settings").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["daily_goal_minutes"], 120);
        assert_eq!(json["eye_closure_secs"], 3.0);
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let response = create_router(test_state())
            .oneshot(json_request(
                "POST",
                "/api/v1/users/login",
                serde_json::json!({ "username": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_requires_login() {
        let response = create_router(test_state())
            .oneshot(Request::get("/api/v1/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_without_user_rejected() {
        let response = create_router(test_state())
            .oneshot(
                Request::post("/api/v1/monitoring/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_monitoring_lifecycle() {
        let state = test_state();

        create_router(Arc::clone(&state))
            .oneshot(json_request(
                "POST",
                "/api/v1/users/login",
                serde_json::json!({ "username": "bob" }),
            ))
            .await
            .unwrap();

        let response = create_router(Arc::clone(&state))
            .oneshot(
                Request::post("/api/v1/monitoring/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Starting again conflicts
        let response = create_router(Arc::clone(&state))
            .oneshot(
                Request::post("/api/v1/monitoring/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = create_router(Arc::clone(&state))
            .oneshot(
                Request::get("/api/v1/monitoring/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["active"], true);

        // Stop twice: idempotent, both succeed
        for _ in 0..2 {
            let response = create_router(Arc::clone(&state))
                .oneshot(
                    Request::post("/api/v1/monitoring/stop")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = create_router(state)
            .oneshot(
                Request::get("/api/v1/monitoring/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["active"], false);
    }
}
