//! API route handlers

pub mod dashboard;
pub mod export;
pub mod monitoring;
pub mod settings;
pub mod users;
