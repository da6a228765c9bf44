//! Export Routes

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::{reject, AppState};
use storage::SessionRecord;

/// Current user's session history as CSV
pub async fn export_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(user_id) = *state.current_user.read().await else {
        return reject(StatusCode::BAD_REQUEST, "No user logged in");
    };
    let user = match state.repository.user(user_id) {
        Ok(user) => user,
        Err(e) => return reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    let sessions = state
        .repository
        .sessions_for_user(user_id)
        .unwrap_or_default();

    let body = render_csv(&sessions);
    let filename = format!("attachment; filename=\"{}_focus_data.csv\"", user.username);

    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    )
        .into_response()
}

fn render_csv(sessions: &[SessionRecord]) -> String {
    let mut out = String::from(
        "Date,Start Time,End Time,Total Duration (min),Focus Duration (min),Distraction Duration (min)\n",
    );
    for s in sessions {
        let end = s
            .end_time
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "Active".to_string());
        out.push_str(&format!(
            "{},{},{},{:.1},{:.1},{:.1}\n",
            s.start_time.format("%Y-%m-%d"),
            s.start_time.format("%H:%M:%S"),
            end,
            s.total_duration as f64 / 60.0,
            s.focus_duration as f64 / 60.0,
            s.distraction_duration as f64 / 60.0,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_csv() {
        let start = Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
        let sessions = vec![SessionRecord {
            id: 1,
            user_id: 1,
            start_time: start,
            end_time: Some(start + chrono::Duration::seconds(120)),
            total_duration: 120,
            focus_duration: 110,
            distraction_duration: 10,
            is_active: false,
        }];

        let csv = render_csv(&sessions);
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("Date,Start Time"));
        assert_eq!(lines.next().unwrap(), "2026-08-06,09:00:00,09:02:00,2.0,1.8,0.2");
    }

    #[test]
    fn test_active_session_has_no_end_time() {
        let sessions = vec![SessionRecord {
            id: 1,
            user_id: 1,
            start_time: Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap(),
            end_time: None,
            total_duration: 0,
            focus_duration: 0,
            distraction_duration: 0,
            is_active: true,
        }];

        assert!(render_csv(&sessions).contains(",Active,"));
    }
}
