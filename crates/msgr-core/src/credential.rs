//! Credential hashing seam.
//!
//! The identity service is generic over this trait so msgr-core never
//! depends on a concrete hashing crate. The production implementation
//! (`Argon2CredentialHasher` in msgr-infra) produces salted PHC strings and
//! verifies them in constant time.

use msgr_types::error::IdentityError;

/// Hashes and verifies user passwords.
pub trait CredentialHasher: Send + Sync {
    /// Hash a password into a self-describing, salted credential string.
    fn hash_password(&self, password: &str) -> Result<String, IdentityError>;

    /// Verify a password against a stored credential string.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for malformed stored
    /// credentials or hasher failures.
    fn verify_password(&self, password: &str, stored: &str) -> Result<bool, IdentityError>;
}
