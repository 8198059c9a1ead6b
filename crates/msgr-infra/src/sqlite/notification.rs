//! SQLite notification repository implementation.
//!
//! Notifications are a per-user queue of message ids. Reading is
//! destructive: `take` deletes the rows and returns what was deleted in one
//! statement, so two concurrent readers never see the same notification.

use msgr_core::repository::notification::NotificationRepository;
use msgr_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `NotificationRepository`.
pub struct SqliteNotificationRepository {
    pool: DatabasePool,
}

impl SqliteNotificationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for SqliteNotificationRepository {
    async fn push(&self, owner_login: &str, message_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO notifications (owner_login, message_id) VALUES (?, ?)")
            .bind(owner_login)
            .bind(message_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn list(&self, owner_login: &str) -> Result<Vec<i64>, RepositoryError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT message_id FROM notifications WHERE owner_login = ? ORDER BY id")
                .bind(owner_login)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn take(&self, owner_login: &str) -> Result<Vec<i64>, RepositoryError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "DELETE FROM notifications WHERE owner_login = ? RETURNING message_id",
        )
        .bind(owner_login)
        .fetch_all(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::chat::SqliteChatRepository;
    use crate::sqlite::message::SqliteMessageRepository;
    use crate::sqlite::test_support::test_pool;
    use crate::sqlite::user::SqliteUserRepository;
    use msgr_core::repository::chat::ChatRepository;
    use msgr_core::repository::message::MessageRepository;
    use msgr_core::repository::user::UserRepository;
    use msgr_core::service::notification::NotificationService;
    use msgr_types::chat::ChatKind;
    use msgr_types::message::NewMessage;
    use msgr_types::user::NewUser;

    async fn seed_user(pool: &DatabasePool, login: &str) {
        let users = SqliteUserRepository::new(pool.clone());
        if users.find_user(login).await.unwrap().is_none() {
            users
                .create_user(&NewUser {
                    login: login.to_string(),
                    password_hash: "$argon2id$stub".to_string(),
                    phone: "555-0100".to_string(),
                    status: "".to_string(),
                })
                .await
                .unwrap();
        }
    }

    async fn seed_message(pool: &DatabasePool, sender: &str, body: &str) -> i64 {
        seed_user(pool, sender).await;
        let chats = SqliteChatRepository::new(pool.clone());
        let chat = chats.create_chat(ChatKind::Private, sender).await.unwrap();
        let messages = SqliteMessageRepository::new(pool.clone());
        messages
            .insert_message(&NewMessage {
                chat_id: chat.id,
                sender_login: sender.to_string(),
                body: body.to_string(),
                expires_at: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_take_drains_the_queue() {
        let pool = test_pool().await;
        let first = seed_message(&pool, "alice", "one").await;
        let second = seed_message(&pool, "alice", "two").await;
        seed_user(&pool, "bob").await;
        let repo = SqliteNotificationRepository::new(pool);

        repo.push("bob", first).await.unwrap();
        repo.push("bob", second).await.unwrap();

        assert_eq!(repo.list("bob").await.unwrap(), vec![first, second]);

        let taken = repo.take("bob").await.unwrap();
        assert_eq!(taken, vec![first, second]);

        // The read was destructive.
        assert!(repo.list("bob").await.unwrap().is_empty());
        assert!(repo.take("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_queues_are_per_owner() {
        let pool = test_pool().await;
        let msg = seed_message(&pool, "alice", "hi").await;
        seed_user(&pool, "bob").await;
        seed_user(&pool, "carol").await;
        let repo = SqliteNotificationRepository::new(pool);

        repo.push("bob", msg).await.unwrap();
        repo.push("carol", msg).await.unwrap();

        assert_eq!(repo.take("bob").await.unwrap(), vec![msg]);
        assert_eq!(repo.list("carol").await.unwrap(), vec![msg]);
    }

    #[tokio::test]
    async fn test_deleting_message_drops_its_notifications() {
        let pool = test_pool().await;
        let msg = seed_message(&pool, "alice", "ephemeral").await;
        seed_user(&pool, "bob").await;
        let repo = SqliteNotificationRepository::new(pool.clone());

        repo.push("bob", msg).await.unwrap();

        let messages = SqliteMessageRepository::new(pool);
        messages.delete_message(msg).await.unwrap();

        assert!(repo.list("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_read_all_consumes() {
        let pool = test_pool().await;
        let msg = seed_message(&pool, "alice", "ping").await;
        seed_user(&pool, "bob").await;
        let service = NotificationService::new(SqliteNotificationRepository::new(pool));

        service.push("bob", msg).await.unwrap();
        assert_eq!(service.read_all("bob").await.unwrap(), vec![msg]);
        assert!(service.read_all("bob").await.unwrap().is_empty());
    }
}
