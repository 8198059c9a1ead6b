//! Argon2 password hashing.
//!
//! Passwords are stored as PHC strings (algorithm, parameters, salt and hash
//! in one self-describing value), so parameter upgrades never invalidate
//! existing credentials. Verification is constant-time via the argon2 crate.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use msgr_core::credential::CredentialHasher;
use msgr_types::error::IdentityError;

/// Argon2id hasher with the crate's default parameters.
#[derive(Default)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash_password(&self, password: &str) -> Result<String, IdentityError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::Credential(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, stored: &str) -> Result<bool, IdentityError> {
        let parsed =
            PasswordHash::new(stored).map_err(|e| IdentityError::Credential(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(IdentityError::Credential(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_phc_string() {
        let hasher = Argon2CredentialHasher::new();
        let a = hasher.hash_password("hunter2").unwrap();
        let b = hasher.hash_password("hunter2").unwrap();

        assert!(a.starts_with("$argon2id$"));
        // Fresh salt per hash.
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_accepts_correct_and_rejects_wrong() {
        let hasher = Argon2CredentialHasher::new();
        let stored = hasher.hash_password("hunter2").unwrap();

        assert!(hasher.verify_password("hunter2", &stored).unwrap());
        assert!(!hasher.verify_password("hunter3", &stored).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        let hasher = Argon2CredentialHasher::new();
        let err = hasher.verify_password("hunter2", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, IdentityError::Credential(_)));
    }
}
