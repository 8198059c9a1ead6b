//! Credential hashing.

mod credential;

pub use credential::Argon2CredentialHasher;
