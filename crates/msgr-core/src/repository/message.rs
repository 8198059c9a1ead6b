//! MessageRepository trait definition.
//!
//! Covers message CRUD, attachment association, the paginated chat view,
//! and the expiry sweep.

use chrono::{DateTime, Utc};
use msgr_types::error::RepositoryError;
use msgr_types::message::{MediaAttachment, Message, MessageView, NewMessage};

/// Repository trait for messages and media attachments.
///
/// Implementations live in msgr-infra (e.g., `SqliteMessageRepository`).
pub trait MessageRepository: Send + Sync {
    /// Insert a message stamped with the current time, returning the stored
    /// row with its generated identifier.
    fn insert_message(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Fetch a message by id.
    fn get_message(
        &self,
        message_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Replace the text of an existing message.
    ///
    /// Fails with `NotFound` if the message does not exist.
    fn update_body(
        &self,
        message_id: i64,
        body: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a message by id; attachments cascade.
    ///
    /// Fails with `NotFound` if the message does not exist.
    fn delete_message(
        &self,
        message_id: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Associate a media attachment with a message.
    fn add_attachment(
        &self,
        message_id: i64,
        media_type: &str,
        url: &str,
    ) -> impl std::future::Future<Output = Result<MediaAttachment, RepositoryError>> + Send;

    /// One page of a chat's history, newest first, outer-joined against
    /// attachments. Messages without attachments appear once with null
    /// media fields. Callers track the running offset across pages.
    fn view_page(
        &self,
        chat_id: i64,
        offset: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<MessageView>, RepositoryError>> + Send;

    /// Delete every message whose expiry timestamp is set and earlier than
    /// `now`. Returns the number of messages removed.
    fn sweep_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
