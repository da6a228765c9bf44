//! User Routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{reject, AppState};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// User summary for list/login responses
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserSummary,
}

/// List all users
pub async fn list_users(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let users = state.repository.users().unwrap_or_default();
    Json(
        users
            .into_iter()
            .map(|u| UserSummary {
                id: u.id,
                username: u.username,
            })
            .collect::<Vec<_>>(),
    )
}

/// Log in (creating the user on first sight) and make it current
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> impl IntoResponse {
    if body.username.trim().is_empty() {
        return reject(StatusCode::BAD_REQUEST, "Username required");
    }

    let user = match state.repository.create_or_get_user(body.username.trim()) {
        Ok(user) => user,
        Err(e) => return reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    *state.current_user.write().await = Some(user.id);

    Json(LoginResponse {
        success: true,
        user: UserSummary {
            id: user.id,
            username: user.username,
        },
    })
    .into_response()
}

/// Bulk-delete the current user's sessions and events
pub async fn reset_user_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(user_id) = *state.current_user.read().await else {
        return reject(StatusCode::BAD_REQUEST, "No user logged in");
    };

    match state.repository.reset_user_data(user_id) {
        Ok(()) => Json(serde_json::json!({ "success": true })).into_response(),
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
