//! Repository Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info};

/// User record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    /// Daily focus goal (minutes)
    pub daily_goal_minutes: i64,
    /// Sustained closure duration confirming an eye_closed event (seconds)
    pub eye_closure_secs: f64,
}

/// Mutable per-user settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub daily_goal_minutes: Option<i64>,
    pub eye_closure_secs: Option<f64>,
}

/// Monitoring session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Whole seconds, frozen on close
    pub total_duration: i64,
    pub focus_duration: i64,
    pub distraction_duration: i64,
    pub is_active: bool,
}

/// Distraction event record (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub user_id: i64,
    pub session_id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    /// Confirmed interval length (seconds)
    pub duration: f64,
}

/// Repository for data access (in-memory implementation)
pub struct Repository {
    users: Mutex<Vec<UserRecord>>,
    sessions: Mutex<Vec<SessionRecord>>,
    events: Mutex<Vec<EventRecord>>,
    next_user_id: Mutex<i64>,
    next_session_id: Mutex<i64>,
    next_event_id: Mutex<i64>,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory repository");
        Self {
            users: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            next_user_id: Mutex::new(1),
            next_session_id: Mutex::new(1),
            next_event_id: Mutex::new(1),
        }
    }

    // ---- users ----

    /// Get the user with this username, creating one with default settings
    /// if absent.
    pub fn create_or_get_user(&self, username: &str) -> Result<UserRecord, StorageError> {
        let mut users = lock(&self.users)?;
        if let Some(user) = users.iter().find(|u| u.username == username) {
            return Ok(user.clone());
        }

        let mut next_id = lock(&self.next_user_id)?;
        let user = UserRecord {
            id: *next_id,
            username: username.to_string(),
            created_at: Utc::now(),
            daily_goal_minutes: 120,
            eye_closure_secs: 3.0,
        };
        *next_id += 1;
        users.push(user.clone());
        info!(username, user_id = user.id, "User created");
        Ok(user)
    }

    /// Look up a user by id
    pub fn user(&self, user_id: i64) -> Result<UserRecord, StorageError> {
        lock(&self.users)?
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    /// List all users
    pub fn users(&self) -> Result<Vec<UserRecord>, StorageError> {
        Ok(lock(&self.users)?.clone())
    }

    /// Apply settings changes to a user
    pub fn update_settings(
        &self,
        user_id: i64,
        settings: &UserSettings,
    ) -> Result<UserRecord, StorageError> {
        let mut users = lock(&self.users)?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StorageError::NotFound)?;

        if let Some(goal) = settings.daily_goal_minutes {
            user.daily_goal_minutes = goal;
        }
        if let Some(secs) = settings.eye_closure_secs {
            user.eye_closure_secs = secs;
        }
        Ok(user.clone())
    }

    // ---- sessions ----

    /// Reuse the user's active session, or open a new one.
    pub fn open_session(&self, user_id: i64) -> Result<SessionRecord, StorageError> {
        let mut sessions = lock(&self.sessions)?;
        if let Some(session) = sessions.iter().find(|s| s.user_id == user_id && s.is_active) {
            debug!(session_id = session.id, "Reusing active session");
            return Ok(session.clone());
        }

        let mut next_id = lock(&self.next_session_id)?;
        let session = SessionRecord {
            id: *next_id,
            user_id,
            start_time: Utc::now(),
            end_time: None,
            total_duration: 0,
            focus_duration: 0,
            distraction_duration: 0,
            is_active: true,
        };
        *next_id += 1;
        sessions.push(session.clone());
        info!(session_id = session.id, user_id, "Session opened");
        Ok(session)
    }

    /// The active session for a user, if any
    pub fn active_session(&self, user_id: i64) -> Result<Option<SessionRecord>, StorageError> {
        Ok(lock(&self.sessions)?
            .iter()
            .find(|s| s.user_id == user_id && s.is_active)
            .cloned())
    }

    /// Look up a session by id
    pub fn session(&self, session_id: i64) -> Result<SessionRecord, StorageError> {
        lock(&self.sessions)?
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    /// All sessions for a user
    pub fn sessions_for_user(&self, user_id: i64) -> Result<Vec<SessionRecord>, StorageError> {
        Ok(lock(&self.sessions)?
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    /// Sessions for a user starting within [from, to]
    pub fn sessions_between(
        &self,
        user_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        Ok(lock(&self.sessions)?
            .iter()
            .filter(|s| s.user_id == user_id && s.start_time >= from && s.start_time <= to)
            .cloned()
            .collect())
    }

    /// Close a session with frozen duration totals. Fails if unknown;
    /// closing an already-closed session is the caller's no-op to enforce.
    pub fn close_session(
        &self,
        session_id: i64,
        end_time: DateTime<Utc>,
        total_duration: i64,
        focus_duration: i64,
        distraction_duration: i64,
    ) -> Result<SessionRecord, StorageError> {
        let mut sessions = lock(&self.sessions)?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(StorageError::NotFound)?;

        session.end_time = Some(end_time);
        session.total_duration = total_duration;
        session.focus_duration = focus_duration;
        session.distraction_duration = distraction_duration;
        session.is_active = false;
        info!(
            session_id,
            total_duration, focus_duration, distraction_duration, "Session closed"
        );
        Ok(session.clone())
    }

    // ---- events ----

    /// Append a distraction event; returns its assigned id.
    pub fn append_event(
        &self,
        user_id: i64,
        session_id: i64,
        event_type: &str,
        duration: f64,
    ) -> Result<i64, StorageError> {
        let mut events = lock(&self.events)?;
        let mut next_id = lock(&self.next_event_id)?;

        let record = EventRecord {
            id: *next_id,
            user_id,
            session_id,
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            duration,
        };
        *next_id += 1;

        let id = record.id;
        events.push(record);
        debug!(id, event_type, duration, "Event appended");
        Ok(id)
    }

    /// All events recorded for a session
    pub fn events_for_session(&self, session_id: i64) -> Result<Vec<EventRecord>, StorageError> {
        Ok(lock(&self.events)?
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect())
    }

    /// Most recent events for a user within [from, to], newest first
    pub fn recent_events(
        &self,
        user_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<EventRecord>, StorageError> {
        let mut matched: Vec<EventRecord> = lock(&self.events)?
            .iter()
            .filter(|e| e.user_id == user_id && e.timestamp >= from && e.timestamp <= to)
            .cloned()
            .collect();
        matched.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
        matched.truncate(limit);
        Ok(matched)
    }

    /// Bulk user-data reset: delete all sessions and events for a user.
    pub fn reset_user_data(&self, user_id: i64) -> Result<(), StorageError> {
        lock(&self.sessions)?.retain(|s| s.user_id != user_id);
        lock(&self.events)?.retain(|e| e.user_id != user_id);
        info!(user_id, "User data reset");
        Ok(())
    }

    // ---- counts (health reporting) ----

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))
}
