//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `msgr-core` using sqlx with split
//! read/write pools. Account creation allocates the contact list, block
//! list, and user row in a single transaction, reading each generated
//! identifier back with `RETURNING id`.

use chrono::Utc;
use msgr_core::repository::user::UserRepository;
use msgr_types::error::RepositoryError;
use msgr_types::user::{ContactEntry, NewUser, User};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_insert_err, parse_datetime};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct UserRow {
    login: String,
    password_hash: String,
    phone: String,
    status: String,
    contact_list_id: i64,
    block_list_id: i64,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            login: row.try_get("login")?,
            password_hash: row.try_get("password_hash")?,
            phone: row.try_get("phone")?,
            status: row.try_get("status")?,
            contact_list_id: row.try_get("contact_list_id")?,
            block_list_id: row.try_get("block_list_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            login: self.login,
            password_hash: self.password_hash,
            phone: self.phone,
            status: self.status,
            contact_list_id: self.contact_list_id,
            block_list_id: self.block_list_id,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// UserRepository impl
// ---------------------------------------------------------------------------

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let created_at = Utc::now();

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let contact_list_id: i64 =
            sqlx::query_scalar("INSERT INTO lists (kind) VALUES ('contact') RETURNING id")
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let block_list_id: i64 =
            sqlx::query_scalar("INSERT INTO lists (kind) VALUES ('block') RETURNING id")
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO users
               (login, password_hash, phone, status, contact_list_id, block_list_id, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user.login)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.status)
        .bind(contact_list_id)
        .bind(block_list_id)
        .bind(format_datetime(&created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_insert_err(e, &format!("login '{}'", user.login)))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(User {
            login: user.login.clone(),
            password_hash: user.password_hash.clone(),
            phone: user.phone.clone(),
            status: user.status.clone(),
            contact_list_id,
            block_list_id,
            created_at,
        })
    }

    async fn find_user(&self, login: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE login = ?")
            .bind(login)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn delete_user(&self, login: &str) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let lists: Option<(i64, i64)> = sqlx::query_as(
            "SELECT contact_list_id, block_list_id FROM users WHERE login = ?",
        )
        .bind(login)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some((contact_list_id, block_list_id)) = lists else {
            return Err(RepositoryError::NotFound);
        };

        // User row first (it references the lists), then the now-unreferenced
        // lists; their memberships cascade.
        sqlx::query("DELETE FROM users WHERE login = ?")
            .bind(login)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("DELETE FROM lists WHERE id IN (?, ?)")
            .bind(contact_list_id)
            .bind(block_list_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn add_list_member(&self, list_id: i64, member: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO list_members (list_id, member_login) VALUES (?, ?)")
            .bind(list_id)
            .bind(member)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| map_insert_err(e, &format!("membership of '{member}'")))?;

        Ok(())
    }

    async fn list_contacts(&self, owner: &str) -> Result<Vec<ContactEntry>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT lm.member_login, u.status
               FROM list_members lm
               JOIN users owner ON owner.contact_list_id = lm.list_id
               JOIN users u ON u.login = lm.member_login
               WHERE owner.login = ?
               ORDER BY lm.member_login"#,
        )
        .bind(owner)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut contacts = Vec::with_capacity(rows.len());
        for row in &rows {
            contacts.push(ContactEntry {
                login: row.try_get("member_login").map_err(|e| RepositoryError::Query(e.to_string()))?,
                status: row.try_get("status").map_err(|e| RepositoryError::Query(e.to_string()))?,
            });
        }
        Ok(contacts)
    }

    async fn list_blocked(&self, owner: &str) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"SELECT lm.member_login
               FROM list_members lm
               JOIN users owner ON owner.block_list_id = lm.list_id
               WHERE owner.login = ?
               ORDER BY lm.member_login"#,
        )
        .bind(owner)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|(login,)| login).collect())
    }

    async fn is_blocked(&self, owner: &str, target: &str) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*)
               FROM list_members lm
               JOIN users owner ON owner.block_list_id = lm.list_id
               WHERE owner.login = ? AND lm.member_login = ?"#,
        )
        .bind(owner)
        .bind(target)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count > 0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Argon2CredentialHasher;
    use crate::sqlite::test_support::test_pool;
    use msgr_core::service::identity::IdentityService;
    use msgr_types::error::IdentityError;

    fn new_user(login: &str) -> NewUser {
        NewUser {
            login: login.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            phone: "555-0100".to_string(),
            status: "around".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_allocates_two_empty_lists() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());

        let user = repo.create_user(&new_user("alice")).await.unwrap();
        assert_ne!(user.contact_list_id, user.block_list_id);

        let kinds: Vec<(String,)> =
            sqlx::query_as("SELECT kind FROM lists WHERE id IN (?, ?) ORDER BY kind")
                .bind(user.block_list_id)
                .bind(user.contact_list_id)
                .fetch_all(&pool.reader)
                .await
                .unwrap();
        assert_eq!(kinds, vec![("block".to_string(),), ("contact".to_string(),)]);

        assert!(repo.list_contacts("alice").await.unwrap().is_empty());
        assert!(repo.list_blocked("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_login_conflicts() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create_user(&new_user("alice")).await.unwrap();
        let err = repo.create_user(&new_user("alice")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_user_roundtrip() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create_user(&new_user("alice")).await.unwrap();

        let found = repo.find_user("alice").await.unwrap().unwrap();
        assert_eq!(found.login, "alice");
        assert_eq!(found.status, "around");

        assert!(repo.find_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contact_membership_is_a_set() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let alice = repo.create_user(&new_user("alice")).await.unwrap();
        repo.create_user(&new_user("bob")).await.unwrap();

        repo.add_list_member(alice.contact_list_id, "bob").await.unwrap();
        let err = repo
            .add_list_member(alice.contact_list_id, "bob")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let contacts = repo.list_contacts("alice").await.unwrap();
        assert_eq!(
            contacts,
            vec![ContactEntry {
                login: "bob".to_string(),
                status: "around".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_is_blocked_is_directional() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let alice = repo.create_user(&new_user("alice")).await.unwrap();
        repo.create_user(&new_user("mallory")).await.unwrap();

        repo.add_list_member(alice.block_list_id, "mallory").await.unwrap();

        assert!(repo.is_blocked("alice", "mallory").await.unwrap());
        assert!(!repo.is_blocked("mallory", "alice").await.unwrap());

        assert_eq!(repo.list_blocked("alice").await.unwrap(), vec!["mallory"]);
    }

    #[tokio::test]
    async fn test_delete_user_removes_lists_and_memberships() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());

        let alice = repo.create_user(&new_user("alice")).await.unwrap();
        let bob = repo.create_user(&new_user("bob")).await.unwrap();

        // alice lists bob; bob lists alice. Deleting alice must clear both
        // her lists and her membership row in bob's list.
        repo.add_list_member(alice.contact_list_id, "bob").await.unwrap();
        repo.add_list_member(bob.contact_list_id, "alice").await.unwrap();

        repo.delete_user("alice").await.unwrap();

        assert!(repo.find_user("alice").await.unwrap().is_none());
        assert!(repo.list_contacts("bob").await.unwrap().is_empty());

        let orphaned_lists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lists WHERE id IN (?, ?)")
            .bind(alice.contact_list_id)
            .bind(alice.block_list_id)
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(orphaned_lists, 0);

        let dangling: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM list_members WHERE member_login = 'alice'",
        )
        .fetch_one(&pool.reader)
        .await
        .unwrap();
        assert_eq!(dangling, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_user_not_found() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let err = repo.delete_user("ghost").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    // -- Identity service wired against the real store and hasher --

    #[tokio::test]
    async fn test_authenticate_accepts_correct_password_only() {
        let pool = test_pool().await;
        let identity =
            IdentityService::new(SqliteUserRepository::new(pool), Argon2CredentialHasher::new());

        identity
            .create_user("alice", "hunter2", "555-0100", "hi")
            .await
            .unwrap();

        let user = identity.authenticate("alice", "hunter2").await.unwrap();
        assert_eq!(user.login, "alice");
        assert!(user.password_hash.starts_with("$argon2"));

        let err = identity.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, IdentityError::Unauthorized));

        let err = identity.authenticate("ghost", "hunter2").await.unwrap_err();
        assert!(matches!(err, IdentityError::UnknownLogin(_)));
    }

    #[tokio::test]
    async fn test_add_contact_requires_existing_target() {
        let pool = test_pool().await;
        let identity =
            IdentityService::new(SqliteUserRepository::new(pool), Argon2CredentialHasher::new());

        identity
            .create_user("alice", "pw", "555-0100", "")
            .await
            .unwrap();

        let err = identity.add_contact("alice", "ghost").await.unwrap_err();
        assert!(matches!(err, IdentityError::UnknownLogin(login) if login == "ghost"));
    }

    #[tokio::test]
    async fn test_add_contact_twice_reports_already_listed() {
        let pool = test_pool().await;
        let identity =
            IdentityService::new(SqliteUserRepository::new(pool), Argon2CredentialHasher::new());

        identity.create_user("alice", "pw", "1", "").await.unwrap();
        identity.create_user("bob", "pw", "2", "").await.unwrap();

        identity.add_contact("alice", "bob").await.unwrap();
        let err = identity.add_contact("alice", "bob").await.unwrap_err();
        assert!(matches!(err, IdentityError::AlreadyListed { .. }));

        let contacts = identity.list_contacts("alice").await.unwrap();
        assert_eq!(contacts.len(), 1);
    }
}
