//! Dashboard Routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::{reject, AppState};

/// Event summary for the dashboard feed
#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub duration: f64,
}

/// Per-type counts over the recent-event feed
#[derive(Debug, Serialize)]
pub struct EventBreakdown {
    pub eye_closed: usize,
    pub phone_detected: usize,
}

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Today's focus time across sessions (seconds)
    pub total_focus_time: i64,
    /// Today's distraction time across sessions (seconds)
    pub total_distraction_time: i64,
    /// Progress toward the daily goal (percent, capped at 100)
    pub goal_progress: f64,
    pub daily_goal: i64,
    pub recent_events: Vec<EventSummary>,
    pub event_breakdown: EventBreakdown,
    pub monitoring_active: bool,
}

/// Per-user comparison entry
#[derive(Debug, Serialize)]
pub struct ComparisonEntry {
    pub username: String,
    /// Total focus time (minutes)
    pub focus_time: f64,
    /// Total distraction time (minutes)
    pub distraction_time: f64,
    pub focus_percentage: f64,
}

/// Today's aggregates and recent events for the current user
pub async fn dashboard_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(user_id) = *state.current_user.read().await else {
        return reject(StatusCode::BAD_REQUEST, "No user logged in");
    };
    let user = match state.repository.user(user_id) {
        Ok(user) => user,
        Err(e) => return reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let today = Utc::now().date_naive();
    let day_start = today.and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + chrono::Duration::days(1);

    let sessions = state
        .repository
        .sessions_between(user_id, day_start, day_end)
        .unwrap_or_default();
    let events = state
        .repository
        .recent_events(user_id, day_start, day_end, 10)
        .unwrap_or_default();

    let total_focus_time: i64 = sessions.iter().map(|s| s.focus_duration).sum();
    let total_distraction_time: i64 = sessions.iter().map(|s| s.distraction_duration).sum();

    let goal_progress = if user.daily_goal_minutes > 0 {
        ((total_focus_time as f64 / 60.0) / user.daily_goal_minutes as f64 * 100.0).min(100.0)
    } else {
        0.0
    };

    let eye_closed = events.iter().filter(|e| e.event_type == "eye_closed").count();
    let phone_detected = events
        .iter()
        .filter(|e| e.event_type == "phone_detected")
        .count();

    Json(DashboardResponse {
        total_focus_time,
        total_distraction_time,
        goal_progress,
        daily_goal: user.daily_goal_minutes,
        recent_events: events
            .into_iter()
            .map(|e| EventSummary {
                timestamp: e.timestamp,
                event_type: e.event_type,
                duration: e.duration,
            })
            .collect(),
        event_breakdown: EventBreakdown {
            eye_closed,
            phone_detected,
        },
        monitoring_active: state.monitor.is_active(),
    })
    .into_response()
}

/// All-user focus comparison, sorted by focus percentage descending
pub async fn comparison_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let users = state.repository.users().unwrap_or_default();

    let mut comparison: Vec<ComparisonEntry> = users
        .into_iter()
        .map(|user| {
            let sessions = state
                .repository
                .sessions_for_user(user.id)
                .unwrap_or_default();
            let focus: f64 = sessions.iter().map(|s| s.focus_duration as f64).sum::<f64>() / 60.0;
            let distraction: f64 =
                sessions.iter().map(|s| s.distraction_duration as f64).sum::<f64>() / 60.0;
            let total = focus + distraction;
            let focus_percentage = if total > 0.0 { focus / total * 100.0 } else { 0.0 };

            ComparisonEntry {
                username: user.username,
                focus_time: focus,
                distraction_time: distraction,
                focus_percentage,
            }
        })
        .collect();

    comparison.sort_by(|a, b| b.focus_percentage.total_cmp(&a.focus_percentage));
    Json(comparison)
}
