//! Session duration aggregation
//!
//! Runs once when monitoring stops: freezes total/focus/distraction time on
//! the session from its recorded event stream.

use chrono::{DateTime, Utc};
use storage::{Repository, SessionRecord, StorageError};
use tracing::info;

/// Close the session and freeze its duration totals.
///
/// total = end − start in whole seconds; distraction = sum of recorded event
/// durations (truncated; no event-type weighting, no overlap resolution —
/// concurrent eye/phone events count additively); focus = max(0, total −
/// distraction). Cooldown chaining can push distraction past elapsed time;
/// that is kept as-is. Returns `None` if the session was already closed.
pub fn finalize_session(
    repo: &Repository,
    session_id: i64,
    end_time: DateTime<Utc>,
) -> Result<Option<SessionRecord>, StorageError> {
    let session = repo.session(session_id)?;
    if !session.is_active {
        return Ok(None);
    }

    let total = (end_time - session.start_time).num_seconds().max(0);
    let events = repo.events_for_session(session_id)?;
    let distraction = events.iter().map(|e| e.duration).sum::<f64>() as i64;
    let focus = (total - distraction).max(0);

    info!(session_id, total, focus, distraction, "Finalizing session");
    repo.close_session(session_id, end_time, total, focus, distraction)
        .map(Some)
}
