//! Notification queue: list and destructive read.
//!
//! Producers are external to the interactive session; `push` is the hook
//! they use. Reading returns the pending sequence and clears it in one
//! repository operation, so nothing can be consumed twice.

use msgr_types::error::RepositoryError;
use tracing::debug;

use crate::repository::notification::NotificationRepository;

/// Orchestrates the per-user pending notification queue.
pub struct NotificationService<N: NotificationRepository> {
    notifications: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    /// Create a new notification service with the given repository.
    pub fn new(notifications: N) -> Self {
        Self { notifications }
    }

    /// Append a notification for a user (external producer hook).
    pub async fn push(&self, owner: &str, message_id: i64) -> Result<(), RepositoryError> {
        self.notifications.push(owner, message_id).await
    }

    /// Pending message ids without consuming them.
    pub async fn list(&self, owner: &str) -> Result<Vec<i64>, RepositoryError> {
        self.notifications.list(owner).await
    }

    /// Read-and-clear: return the pending message ids and delete them.
    /// An immediately following call returns an empty sequence.
    pub async fn read_all(&self, owner: &str) -> Result<Vec<i64>, RepositoryError> {
        let ids = self.notifications.take(owner).await?;
        debug!(owner, count = ids.len(), "notifications consumed");
        Ok(ids)
    }
}
