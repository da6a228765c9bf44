//! Storage Layer
//!
//! Persistence for users, sessions, and events with repository pattern.
//! Events are append-only; sessions are created active and closed exactly
//! once with frozen duration totals.

mod repository;

pub use repository::{EventRecord, Repository, SessionRecord, UserRecord, UserSettings};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Record not found")]
    NotFound,
}
