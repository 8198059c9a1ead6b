//! Message store: creation, edit, delete, attachments, paginated view,
//! and the opportunistic expiry sweep.

use chrono::{DateTime, Utc};
use msgr_types::error::{MessageError, RepositoryError};
use msgr_types::message::{MediaAttachment, Message, MessageView, NewMessage};
use tracing::debug;

use crate::repository::message::MessageRepository;

/// Orchestrates message persistence and retrieval for chats.
pub struct MessageService<M: MessageRepository> {
    messages: M,
}

impl<M: MessageRepository> MessageService<M> {
    /// Create a new message service with the given repository.
    pub fn new(messages: M) -> Self {
        Self { messages }
    }

    /// Create a message in a chat, stamped with the current time.
    ///
    /// `expires_at` is `None` on the default path; passing a timestamp
    /// opts the message into self-destruct.
    pub async fn create_message(
        &self,
        chat_id: i64,
        sender: &str,
        body: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Message, MessageError> {
        let new_message = NewMessage {
            chat_id,
            sender_login: sender.to_string(),
            body: body.to_string(),
            expires_at,
        };
        Ok(self.messages.insert_message(&new_message).await?)
    }

    /// Replace the text of a message. Only the original sender may edit.
    pub async fn edit_message(
        &self,
        message_id: i64,
        editor: &str,
        body: &str,
    ) -> Result<(), MessageError> {
        let message = self
            .messages
            .get_message(message_id)
            .await?
            .ok_or(MessageError::NotFound)?;

        if message.sender_login != editor {
            return Err(MessageError::NotSender);
        }

        match self.messages.update_body(message_id, body).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(MessageError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a message by id; its attachments cascade.
    pub async fn delete_message(&self, message_id: i64) -> Result<(), MessageError> {
        match self.messages.delete_message(message_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(MessageError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Associate a media attachment with an existing message.
    pub async fn attach_media(
        &self,
        message_id: i64,
        media_type: &str,
        url: &str,
    ) -> Result<MediaAttachment, MessageError> {
        if self.messages.get_message(message_id).await?.is_none() {
            return Err(MessageError::NotFound);
        }
        Ok(self.messages.add_attachment(message_id, media_type, url).await?)
    }

    /// One page of a chat's history, newest first.
    ///
    /// Sweeps expired messages first, so a self-destructed message can
    /// never appear in the returned page.
    pub async fn view_messages(
        &self,
        chat_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MessageView>, MessageError> {
        let swept = self.messages.sweep_expired(Utc::now()).await?;
        if swept > 0 {
            debug!(swept, "expired messages removed");
        }
        Ok(self.messages.view_page(chat_id, offset, limit).await?)
    }

    /// Remove every message whose expiry is set and earlier than `now`.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, MessageError> {
        Ok(self.messages.sweep_expired(now).await?)
    }
}
