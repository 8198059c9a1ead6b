//! Message, attachment, and message-view types.
//!
//! Messages belong to a chat, carry a creation timestamp, and may carry an
//! optional expiry (self-destruct) timestamp. Once `expires_at` is earlier
//! than the current time the message is eligible for removal by the sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message within a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub sender_login: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Self-destruct timestamp; `None` means the message never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: i64,
    pub sender_login: String,
    pub body: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A media attachment owned by a message. Zero or more per message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub id: i64,
    pub message_id: i64,
    pub media_type: String,
    pub url: String,
}

/// One row of the paginated chat view: a message outer-joined against its
/// attachments. Messages without attachments appear once with both media
/// fields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub sender_login: String,
    pub sent_at: DateTime<Utc>,
    pub body: String,
    pub media_type: Option<String>,
    pub url: Option<String>,
}
