//! Settings Routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{reject, AppState};
use storage::UserSettings;

/// Settings response
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub daily_goal_minutes: i64,
    pub eye_closure_secs: f64,
}

/// Current user's settings
pub async fn get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(user_id) = *state.current_user.read().await else {
        return reject(StatusCode::BAD_REQUEST, "No user logged in");
    };

    match state.repository.user(user_id) {
        Ok(user) => Json(SettingsResponse {
            daily_goal_minutes: user.daily_goal_minutes,
            eye_closure_secs: user.eye_closure_secs,
        })
        .into_response(),
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Update the current user's settings; omitted fields are left unchanged.
///
/// A changed eye-closure duration takes effect on the next monitoring
/// session, not the one in flight.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserSettings>,
) -> impl IntoResponse {
    let Some(user_id) = *state.current_user.read().await else {
        return reject(StatusCode::BAD_REQUEST, "No user logged in");
    };

    match state.repository.update_settings(user_id, &body) {
        Ok(user) => Json(SettingsResponse {
            daily_goal_minutes: user.daily_goal_minutes,
            eye_closure_secs: user.eye_closure_secs,
        })
        .into_response(),
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
