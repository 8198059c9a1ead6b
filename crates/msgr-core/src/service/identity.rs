//! Identity and relationship management.
//!
//! Account creation, authentication, and the contact/block lists. Passwords
//! are hashed through the `CredentialHasher` seam before they reach the
//! repository; the stored credential never leaves this service.

use msgr_types::error::{IdentityError, RepositoryError};
use msgr_types::user::{ContactEntry, ListKind, NewUser, User};
use tracing::info;

use crate::credential::CredentialHasher;
use crate::repository::user::UserRepository;

/// Orchestrates user accounts and contact/block relationships.
pub struct IdentityService<U: UserRepository, H: CredentialHasher> {
    users: U,
    hasher: H,
}

impl<U: UserRepository, H: CredentialHasher> IdentityService<U, H> {
    /// Create a new identity service with the given repository and hasher.
    pub fn new(users: U, hasher: H) -> Self {
        Self { users, hasher }
    }

    /// Access the user repository.
    pub fn users(&self) -> &U {
        &self.users
    }

    /// Create an account: hash the password, then allocate the contact
    /// list, block list, and user row in one transaction.
    pub async fn create_user(
        &self,
        login: &str,
        password: &str,
        phone: &str,
        status: &str,
    ) -> Result<User, IdentityError> {
        let password_hash = self.hasher.hash_password(password)?;
        let new_user = NewUser {
            login: login.to_string(),
            password_hash,
            phone: phone.to_string(),
            status: status.to_string(),
        };

        let user = match self.users.create_user(&new_user).await {
            Ok(user) => user,
            Err(RepositoryError::Conflict(_)) => {
                return Err(IdentityError::LoginTaken(login.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(login, "user created");
        Ok(user)
    }

    /// Check credentials for an existing user.
    ///
    /// Verification is constant-time via the hasher; the error distinguishes
    /// an unknown login from a wrong password, matching the documented
    /// contract.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<User, IdentityError> {
        let user = self
            .users
            .find_user(login)
            .await?
            .ok_or_else(|| IdentityError::UnknownLogin(login.to_string()))?;

        if self.hasher.verify_password(password, &user.password_hash)? {
            info!(login, "login succeeded");
            Ok(user)
        } else {
            Err(IdentityError::Unauthorized)
        }
    }

    /// Add `target` to `owner`'s contact list.
    ///
    /// The target must exist; a duplicate membership is rejected.
    pub async fn add_contact(&self, owner: &str, target: &str) -> Result<(), IdentityError> {
        self.add_to_list(owner, target, ListKind::Contact).await
    }

    /// Add `target` to `owner`'s block list.
    ///
    /// Symmetric to `add_contact`. Blocking does not remove an existing
    /// contact entry.
    pub async fn add_block(&self, owner: &str, target: &str) -> Result<(), IdentityError> {
        self.add_to_list(owner, target, ListKind::Block).await
    }

    async fn add_to_list(
        &self,
        owner: &str,
        target: &str,
        kind: ListKind,
    ) -> Result<(), IdentityError> {
        let owner_user = self
            .users
            .find_user(owner)
            .await?
            .ok_or_else(|| IdentityError::UnknownLogin(owner.to_string()))?;

        if self.users.find_user(target).await?.is_none() {
            return Err(IdentityError::UnknownLogin(target.to_string()));
        }

        let list_id = match kind {
            ListKind::Contact => owner_user.contact_list_id,
            ListKind::Block => owner_user.block_list_id,
        };

        match self.users.add_list_member(list_id, target).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::Conflict(_)) => Err(IdentityError::AlreadyListed {
                login: target.to_string(),
                kind: kind.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Contact-list projection: each contact's login and status text.
    pub async fn list_contacts(&self, owner: &str) -> Result<Vec<ContactEntry>, IdentityError> {
        Ok(self.users.list_contacts(owner).await?)
    }

    /// Block-list projection: blocked logins.
    pub async fn list_blocked(&self, owner: &str) -> Result<Vec<String>, IdentityError> {
        Ok(self.users.list_blocked(owner).await?)
    }

    /// Delete an account. List and chat memberships cascade; chats the
    /// user initiated are orphaned rather than removed.
    pub async fn delete_account(&self, owner: &str) -> Result<(), IdentityError> {
        match self.users.delete_user(owner).await {
            Ok(()) => {
                info!(login = owner, "account deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(IdentityError::UnknownLogin(owner.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
