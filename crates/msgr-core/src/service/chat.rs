//! Chat directory: creation, membership, and listing.
//!
//! Generic over `ChatRepository` and `UserRepository`; the user repository
//! backs the target-existence and block checks on invitations.

use msgr_types::chat::{Chat, ChatKind, ChatSummary};
use msgr_types::error::{ChatError, RepositoryError};
use tracing::info;

use crate::repository::chat::ChatRepository;
use crate::repository::user::UserRepository;

/// Orchestrates chats and their membership sets.
pub struct ChatService<C: ChatRepository, U: UserRepository> {
    chats: C,
    users: U,
}

impl<C: ChatRepository, U: UserRepository> ChatService<C, U> {
    /// Create a new chat service with the given repositories.
    pub fn new(chats: C, users: U) -> Self {
        Self { chats, users }
    }

    /// Start a private chat with the initiator as its first member.
    pub async fn start_chat(&self, initiator: &str) -> Result<Chat, ChatError> {
        let chat = self.chats.create_chat(ChatKind::Private, initiator).await?;
        info!(chat_id = chat.id, initiator, "chat started");
        Ok(chat)
    }

    /// Add a user to a chat.
    ///
    /// The target must be an existing user, must not already be a member,
    /// and must not stand in a block relationship with the chat's
    /// initiator (either direction).
    pub async fn add_member(&self, chat_id: i64, login: &str) -> Result<(), ChatError> {
        let chat = self
            .chats
            .get_chat(chat_id)
            .await?
            .ok_or(ChatError::NotFound)?;

        if self.users.find_user(login).await?.is_none() {
            return Err(ChatError::UnknownUser(login.to_string()));
        }

        if let Some(initiator) = chat.initiator.as_deref()
            && initiator != login
            && (self.users.is_blocked(initiator, login).await?
                || self.users.is_blocked(login, initiator).await?)
        {
            return Err(ChatError::Blocked(login.to_string()));
        }

        match self.chats.add_member(chat_id, login).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::Conflict(_)) => Err(ChatError::AlreadyMember(login.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a member from this chat. Membership rows in other chats are
    /// untouched.
    pub async fn remove_member(&self, chat_id: i64, login: &str) -> Result<(), ChatError> {
        match self.chats.remove_member(chat_id, login).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ChatError::NotAMember(login.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a chat with its memberships and messages.
    pub async fn delete_chat(&self, chat_id: i64) -> Result<(), ChatError> {
        match self.chats.delete_chat(chat_id).await {
            Ok(()) => {
                info!(chat_id, "chat deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ChatError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Chats the user belongs to, most recent activity first.
    pub async fn list_chats(&self, login: &str) -> Result<Vec<ChatSummary>, ChatError> {
        Ok(self.chats.list_chats_for(login).await?)
    }

    /// Member logins of a chat.
    pub async fn list_members(&self, chat_id: i64) -> Result<Vec<String>, ChatError> {
        Ok(self.chats.list_members(chat_id).await?)
    }

    /// Membership pre-check used before entering a chat.
    pub async fn is_member(&self, chat_id: i64, login: &str) -> Result<bool, ChatError> {
        Ok(self.chats.is_member(chat_id, login).await?)
    }
}
