//! NotificationRepository trait definition.
//!
//! The queue is append-only from producers and destructively read by its
//! owner: `take` returns the pending message ids and clears them in one
//! statement, so a read can never observe rows it does not also consume.

use msgr_types::error::RepositoryError;

/// Repository trait for per-user pending notifications.
///
/// Implementations live in msgr-infra (e.g., `SqliteNotificationRepository`).
pub trait NotificationRepository: Send + Sync {
    /// Append a notification for a user. Producer hook; the interactive
    /// session itself never calls this.
    fn push(
        &self,
        owner: &str,
        message_id: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Pending message ids for a user, without consuming them.
    fn list(
        &self,
        owner: &str,
    ) -> impl std::future::Future<Output = Result<Vec<i64>, RepositoryError>> + Send;

    /// Destructive read: return the pending message ids and delete them
    /// atomically. A second call returns an empty sequence.
    fn take(
        &self,
        owner: &str,
    ) -> impl std::future::Future<Output = Result<Vec<i64>, RepositoryError>> + Send;
}
