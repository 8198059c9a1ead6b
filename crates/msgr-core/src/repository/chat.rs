//! ChatRepository trait definition.
//!
//! Chat creation inserts the chat row and the initiator's membership in one
//! transaction, returning the generated identifier with the insert.

use msgr_types::chat::{Chat, ChatKind, ChatSummary};
use msgr_types::error::RepositoryError;

/// Repository trait for chats and their memberships.
///
/// Implementations live in msgr-infra (e.g., `SqliteChatRepository`).
pub trait ChatRepository: Send + Sync {
    /// Create a chat with the initiator as its first member, in one
    /// transaction. Returns the stored chat.
    fn create_chat(
        &self,
        kind: ChatKind,
        initiator: &str,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Fetch a chat by id.
    fn get_chat(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Insert a membership row.
    ///
    /// Fails with `Conflict` if the login is already a member of this chat.
    fn add_member(
        &self,
        chat_id: i64,
        login: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a membership row from this chat only.
    ///
    /// Fails with `NotFound` if no such membership exists.
    fn remove_member(
        &self,
        chat_id: i64,
        login: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Whether the login is a member of the chat.
    fn is_member(
        &self,
        chat_id: i64,
        login: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete the chat with its memberships and messages, in one
    /// transaction (messages before the chat row for referential
    /// integrity).
    ///
    /// Fails with `NotFound` if the chat does not exist.
    fn delete_chat(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// One row per chat the user belongs to, joined to the latest message
    /// timestamp in that chat, most recent activity first. Chats with no
    /// messages are excluded (inner-join semantics).
    fn list_chats_for(
        &self,
        login: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSummary>, RepositoryError>> + Send;

    /// Member logins of a chat, ordered.
    fn list_members(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
