//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Timestamps are stored as RFC 3339 text;
//! row identifiers are allocated atomically with the triggering insert
//! via `RETURNING id`.

pub mod chat;
pub mod message;
pub mod notification;
pub mod pool;
pub mod user;

use chrono::{DateTime, Utc};
use msgr_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Map a sqlx error, turning UNIQUE violations into `Conflict`.
pub(crate) fn map_insert_err(e: sqlx::Error, what: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(format!("{what} already exists"))
        }
        e => RepositoryError::Query(e.to_string()),
    }
}
