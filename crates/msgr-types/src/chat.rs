//! Chat and membership types.
//!
//! A chat is a conversation with a membership set and an ordered message
//! history. The initiating user is a member from creation; deleting their
//! account orphans the chat (initiator becomes `None`) without destroying it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Kind of a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatKind::Private => write!(f, "private"),
            ChatKind::Group => write!(f, "group"),
        }
    }
}

impl FromStr for ChatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(ChatKind::Private),
            "group" => Ok(ChatKind::Group),
            other => Err(format!("invalid chat kind: '{other}'")),
        }
    }
}

/// A chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
    /// Login of the user who started the chat, `None` once that account
    /// is deleted.
    pub initiator: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One row of a user's chat listing: the chat and its latest message
/// timestamp. Chats with no messages do not appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: i64,
    pub last_activity: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_kind_roundtrip() {
        for kind in [ChatKind::Private, ChatKind::Group] {
            let s = kind.to_string();
            let parsed: ChatKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_chat_kind_serde() {
        let json = serde_json::to_string(&ChatKind::Private).unwrap();
        assert_eq!(json, "\"private\"");
    }

    #[test]
    fn test_chat_serialize_orphaned() {
        let chat = Chat {
            id: 7,
            kind: ChatKind::Private,
            initiator: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&chat).unwrap();
        assert!(json.contains("\"initiator\":null"));
    }
}
