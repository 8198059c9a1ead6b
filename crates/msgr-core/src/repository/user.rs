//! UserRepository trait definition.
//!
//! Covers user accounts plus the contact/block list memberships owned by
//! them. Creation is atomic: the two lists and the user row are inserted in
//! a single transaction so the generated list identifiers can never race.

use msgr_types::error::RepositoryError;
use msgr_types::user::{ContactEntry, NewUser, User};

/// Repository trait for user accounts and relationship lists.
///
/// Implementations live in msgr-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Create a user together with an empty contact list and an empty block
    /// list, all in one transaction. Returns the stored user.
    ///
    /// Fails with `Conflict` if the login already exists.
    fn create_user(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Fetch a user by login.
    fn find_user(
        &self,
        login: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Delete a user and their two lists. Memberships referencing the user
    /// cascade; chats they initiated are orphaned, not removed.
    ///
    /// Fails with `NotFound` if the login does not exist.
    fn delete_user(
        &self,
        login: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert a membership row into a list.
    ///
    /// Fails with `Conflict` if the (list, member) pair already exists.
    fn add_list_member(
        &self,
        list_id: i64,
        member: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Contact-list projection joining each member with their status text,
    /// ordered by login.
    fn list_contacts(
        &self,
        owner: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ContactEntry>, RepositoryError>> + Send;

    /// Block-list projection: member logins, ordered.
    fn list_blocked(
        &self,
        owner: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Whether `target` appears on `owner`'s block list.
    fn is_blocked(
        &self,
        owner: &str,
        target: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
