//! Monitoring Routes
//!
//! Start/stop are the only operations that can reject; rejections are
//! surfaced immediately and leave monitoring state unchanged.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{reject, AppState};
use monitor::MonitorError;

/// Start response
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub success: bool,
    pub session_id: i64,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub active: bool,
}

/// Start monitoring for the current user
pub async fn start(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(user_id) = *state.current_user.read().await else {
        return reject(StatusCode::BAD_REQUEST, "No user logged in");
    };

    match state.monitor.start(user_id).await {
        Ok(session_id) => Json(StartResponse {
            success: true,
            session_id,
        })
        .into_response(),
        Err(MonitorError::AlreadyActive) => {
            reject(StatusCode::CONFLICT, "Monitoring already active")
        }
        Err(MonitorError::NoUser) => reject(StatusCode::BAD_REQUEST, "No user logged in"),
        Err(e @ MonitorError::CameraUnavailable(_)) => {
            reject(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Stop monitoring (idempotent)
pub async fn stop(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.monitor.stop().await;
    Json(serde_json::json!({ "success": true }))
}

/// Live monitoring status; never blocks on the worker
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusResponse {
        active: state.monitor.is_active(),
    })
}
