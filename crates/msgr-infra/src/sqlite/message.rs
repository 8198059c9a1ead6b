//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `msgr-core`: message CRUD, media
//! attachments, the paginated newest-first chat view, and the expiry sweep.
//! RFC 3339 text timestamps compare lexicographically, so ordering and the
//! sweep's `<` comparison both work directly in SQL.

use chrono::{DateTime, Utc};
use msgr_core::repository::message::MessageRepository;
use msgr_types::error::RepositoryError;
use msgr_types::message::{MediaAttachment, Message, MessageView, NewMessage};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    chat_id: i64,
    sender_login: String,
    body: String,
    created_at: String,
    expires_at: Option<String>,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            sender_login: row.try_get("sender_login")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: self.id,
            chat_id: self.chat_id,
            sender_login: self.sender_login,
            body: self.body,
            created_at: parse_datetime(&self.created_at)?,
            expires_at: self
                .expires_at
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
        })
    }
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn insert_message(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        let created_at = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO messages (chat_id, sender_login, body, created_at, expires_at)
               VALUES (?, ?, ?, ?, ?) RETURNING id"#,
        )
        .bind(message.chat_id)
        .bind(&message.sender_login)
        .bind(&message.body)
        .bind(format_datetime(&created_at))
        .bind(message.expires_at.as_ref().map(format_datetime))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Message {
            id,
            chat_id: message.chat_id,
            sender_login: message.sender_login.clone(),
            body: message.body.clone(),
            created_at,
            expires_at: message.expires_at,
        })
    }

    async fn get_message(&self, message_id: i64) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(message_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = MessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn update_body(&self, message_id: i64, body: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE messages SET body = ? WHERE id = ?")
            .bind(body)
            .bind(message_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_message(&self, message_id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(message_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn add_attachment(
        &self,
        message_id: i64,
        media_type: &str,
        url: &str,
    ) -> Result<MediaAttachment, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO media_attachments (message_id, media_type, url) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(message_id)
        .bind(media_type)
        .bind(url)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(MediaAttachment {
            id,
            message_id,
            media_type: media_type.to_string(),
            url: url.to_string(),
        })
    }

    async fn view_page(
        &self,
        chat_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MessageView>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT m.sender_login, m.created_at, m.body, a.media_type, a.url
               FROM messages m
               LEFT JOIN media_attachments a ON a.message_id = m.id
               WHERE m.chat_id = ?
               ORDER BY m.created_at DESC, m.id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut views = Vec::with_capacity(rows.len());
        for row in &rows {
            let created_at: String = row
                .try_get("created_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            views.push(MessageView {
                sender_login: row
                    .try_get("sender_login")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                sent_at: parse_datetime(&created_at)?,
                body: row.try_get("body").map_err(|e| RepositoryError::Query(e.to_string()))?,
                media_type: row
                    .try_get("media_type")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                url: row.try_get("url").map_err(|e| RepositoryError::Query(e.to_string()))?,
            });
        }
        Ok(views)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM messages WHERE expires_at IS NOT NULL AND expires_at < ?")
                .bind(format_datetime(&now))
                .execute(&self.pool.writer)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::chat::SqliteChatRepository;
    use crate::sqlite::test_support::test_pool;
    use crate::sqlite::user::SqliteUserRepository;
    use chrono::Duration;
    use msgr_core::repository::chat::ChatRepository;
    use msgr_core::repository::user::UserRepository;
    use msgr_core::service::message::MessageService;
    use msgr_types::chat::ChatKind;
    use msgr_types::error::MessageError;
    use msgr_types::user::NewUser;

    async fn seed_chat(pool: &DatabasePool, initiator: &str) -> i64 {
        let users = SqliteUserRepository::new(pool.clone());
        users
            .create_user(&NewUser {
                login: initiator.to_string(),
                password_hash: "$argon2id$stub".to_string(),
                phone: "555-0100".to_string(),
                status: "".to_string(),
            })
            .await
            .unwrap();
        let chats = SqliteChatRepository::new(pool.clone());
        chats
            .create_chat(ChatKind::Private, initiator)
            .await
            .unwrap()
            .id
    }

    fn plain(chat_id: i64, sender: &str, body: &str) -> NewMessage {
        NewMessage {
            chat_id,
            sender_login: sender.to_string(),
            body: body.to_string(),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_returns_generated_id() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let repo = SqliteMessageRepository::new(pool);

        let first = repo.insert_message(&plain(chat_id, "alice", "one")).await.unwrap();
        let second = repo.insert_message(&plain(chat_id, "alice", "two")).await.unwrap();

        assert!(second.id > first.id);
        assert!(first.expires_at.is_none());

        let fetched = repo.get_message(first.id).await.unwrap().unwrap();
        assert_eq!(fetched.body, "one");
        assert_eq!(fetched.sender_login, "alice");
    }

    #[tokio::test]
    async fn test_update_and_delete_require_existence() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let repo = SqliteMessageRepository::new(pool);

        let msg = repo.insert_message(&plain(chat_id, "alice", "typo")).await.unwrap();

        repo.update_body(msg.id, "fixed").await.unwrap();
        assert_eq!(repo.get_message(msg.id).await.unwrap().unwrap().body, "fixed");

        repo.delete_message(msg.id).await.unwrap();
        assert!(repo.get_message(msg.id).await.unwrap().is_none());

        assert!(matches!(
            repo.update_body(msg.id, "gone").await.unwrap_err(),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            repo.delete_message(msg.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_deleting_message_cascades_attachments() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let repo = SqliteMessageRepository::new(pool.clone());

        let msg = repo.insert_message(&plain(chat_id, "alice", "pic")).await.unwrap();
        repo.add_attachment(msg.id, "image/png", "https://cdn.example/cat.png")
            .await
            .unwrap();

        repo.delete_message(msg.id).await.unwrap();

        let dangling: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM media_attachments WHERE message_id = ?")
                .bind(msg.id)
                .fetch_one(&pool.reader)
                .await
                .unwrap();
        assert_eq!(dangling, 0);
    }

    #[tokio::test]
    async fn test_view_page_outer_joins_attachments() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let repo = SqliteMessageRepository::new(pool);

        repo.insert_message(&plain(chat_id, "alice", "hi")).await.unwrap();
        let media_msg = repo.insert_message(&plain(chat_id, "alice", "look")).await.unwrap();
        repo.add_attachment(media_msg.id, "image/png", "https://cdn.example/cat.png")
            .await
            .unwrap();

        let page = repo.view_page(chat_id, 0, 10).await.unwrap();
        assert_eq!(page.len(), 2);

        // Newest first: the attachment row, then the plain row with null
        // media fields.
        assert_eq!(page[0].body, "look");
        assert_eq!(page[0].media_type.as_deref(), Some("image/png"));
        assert_eq!(page[1].body, "hi");
        assert_eq!(page[1].media_type, None);
        assert_eq!(page[1].url, None);
    }

    #[tokio::test]
    async fn test_pagination_concatenates_without_gaps_or_duplicates() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let repo = SqliteMessageRepository::new(pool);

        for i in 0..25 {
            repo.insert_message(&plain(chat_id, "alice", &format!("m{i:02}")))
                .await
                .unwrap();
        }

        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let page = repo.view_page(chat_id, offset, 10).await.unwrap();
            if page.is_empty() {
                break;
            }
            assert!(page.len() <= 10);
            all.extend(page);
            offset += 10;
        }

        assert_eq!(all.len(), 25);

        // Descending across the whole concatenation, newest first.
        let bodies: Vec<&str> = all.iter().map(|v| v.body.as_str()).collect();
        let expected: Vec<String> = (0..25).rev().map(|i| format!("m{i:02}")).collect();
        assert_eq!(bodies, expected.iter().map(String::as_str).collect::<Vec<_>>());

        for pair in all.windows(2) {
            assert!(pair[0].sent_at >= pair[1].sent_at);
        }
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_only() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let repo = SqliteMessageRepository::new(pool);

        let now = Utc::now();

        let expired = repo
            .insert_message(&NewMessage {
                expires_at: Some(now - Duration::minutes(5)),
                ..plain(chat_id, "alice", "gone soon")
            })
            .await
            .unwrap();
        let future = repo
            .insert_message(&NewMessage {
                expires_at: Some(now + Duration::minutes(5)),
                ..plain(chat_id, "alice", "still here")
            })
            .await
            .unwrap();
        let forever = repo.insert_message(&plain(chat_id, "alice", "no expiry")).await.unwrap();

        let swept = repo.sweep_expired(now).await.unwrap();
        assert_eq!(swept, 1);

        assert!(repo.get_message(expired.id).await.unwrap().is_none());
        assert!(repo.get_message(future.id).await.unwrap().is_some());
        assert!(repo.get_message(forever.id).await.unwrap().is_some());

        // Unexpired messages survive repeated sweeps.
        assert_eq!(repo.sweep_expired(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_two_user_chat_first_page() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;

        let users = SqliteUserRepository::new(pool.clone());
        users
            .create_user(&NewUser {
                login: "bob".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                phone: "555-0101".to_string(),
                status: "".to_string(),
            })
            .await
            .unwrap();
        let chats = SqliteChatRepository::new(pool.clone());
        chats.add_member(chat_id, "bob").await.unwrap();

        let repo = SqliteMessageRepository::new(pool);
        repo.insert_message(&plain(chat_id, "alice", "hi")).await.unwrap();

        // What bob sees on his first page.
        let page = repo.view_page(chat_id, 0, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].sender_login, "alice");
        assert_eq!(page[0].body, "hi");
        assert_eq!(page[0].media_type, None);
        assert_eq!(page[0].url, None);
    }

    // -- Message service wired against the real store --

    #[tokio::test]
    async fn test_edit_is_sender_only() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let service = MessageService::new(SqliteMessageRepository::new(pool));

        let msg = service
            .create_message(chat_id, "alice", "draft", None)
            .await
            .unwrap();

        service.edit_message(msg.id, "alice", "final").await.unwrap();

        let err = service.edit_message(msg.id, "bob", "hijack").await.unwrap_err();
        assert!(matches!(err, MessageError::NotSender));

        let err = service.edit_message(9999, "alice", "x").await.unwrap_err();
        assert!(matches!(err, MessageError::NotFound));
    }

    #[tokio::test]
    async fn test_view_messages_sweeps_first() {
        let pool = test_pool().await;
        let chat_id = seed_chat(&pool, "alice").await;
        let service = MessageService::new(SqliteMessageRepository::new(pool));

        service
            .create_message(
                chat_id,
                "alice",
                "self-destruct",
                Some(Utc::now() - Duration::seconds(1)),
            )
            .await
            .unwrap();
        service.create_message(chat_id, "alice", "hi", None).await.unwrap();

        let page = service.view_messages(chat_id, 0, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].body, "hi");
    }

    #[tokio::test]
    async fn test_attach_media_requires_message() {
        let pool = test_pool().await;
        let _ = seed_chat(&pool, "alice").await;
        let service = MessageService::new(SqliteMessageRepository::new(pool));

        let err = service
            .attach_media(42, "video/mp4", "https://cdn.example/clip.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, MessageError::NotFound));
    }
}
