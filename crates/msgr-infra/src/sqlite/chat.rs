//! SQLite chat repository implementation.
//!
//! Chat creation and deletion are transactional: creation inserts the chat
//! row and the initiator's membership together; deletion removes
//! memberships, then messages, then the chat row.

use chrono::Utc;
use msgr_core::repository::chat::ChatRepository;
use msgr_types::chat::{Chat, ChatKind, ChatSummary};
use msgr_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_insert_err, parse_datetime};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn chat_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Chat, RepositoryError> {
    let kind: String = row
        .try_get("kind")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Chat {
        id: row.try_get("id").map_err(|e| RepositoryError::Query(e.to_string()))?,
        kind: kind
            .parse::<ChatKind>()
            .map_err(RepositoryError::Query)?,
        initiator: row
            .try_get("initiator")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl ChatRepository for SqliteChatRepository {
    async fn create_chat(&self, kind: ChatKind, initiator: &str) -> Result<Chat, RepositoryError> {
        let created_at = Utc::now();

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let chat_id: i64 = sqlx::query_scalar(
            "INSERT INTO chats (kind, initiator, created_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(kind.to_string())
        .bind(initiator)
        .bind(format_datetime(&created_at))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("INSERT INTO chat_members (chat_id, member_login) VALUES (?, ?)")
            .bind(chat_id)
            .bind(initiator)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Chat {
            id: chat_id,
            kind,
            initiator: Some(initiator.to_string()),
            created_at,
        })
    }

    async fn get_chat(&self, chat_id: i64) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(chat_from_row).transpose()
    }

    async fn add_member(&self, chat_id: i64, login: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO chat_members (chat_id, member_login) VALUES (?, ?)")
            .bind(chat_id)
            .bind(login)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| map_insert_err(e, &format!("membership of '{login}'")))?;

        Ok(())
    }

    async fn remove_member(&self, chat_id: i64, login: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_members WHERE chat_id = ? AND member_login = ?")
            .bind(chat_id)
            .bind(login)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn is_member(&self, chat_id: i64, login: &str) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_members WHERE chat_id = ? AND member_login = ?",
        )
        .bind(chat_id)
        .bind(login)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count > 0)
    }

    async fn delete_chat(&self, chat_id: i64) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Memberships, then messages (attachments cascade), then the chat.
        sqlx::query("DELETE FROM chat_members WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("DELETE FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_chats_for(&self, login: &str) -> Result<Vec<ChatSummary>, RepositoryError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            r#"SELECT cm.chat_id, MAX(m.created_at) AS last_activity
               FROM chat_members cm
               JOIN messages m ON m.chat_id = cm.chat_id
               WHERE cm.member_login = ?
               GROUP BY cm.chat_id
               ORDER BY last_activity DESC"#,
        )
        .bind(login)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (chat_id, last_activity) in rows {
            summaries.push(ChatSummary {
                chat_id,
                last_activity: parse_datetime(&last_activity)?,
            });
        }
        Ok(summaries)
    }

    async fn list_members(&self, chat_id: i64) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT member_login FROM chat_members WHERE chat_id = ? ORDER BY member_login",
        )
        .bind(chat_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|(login,)| login).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
