//! Infrastructure implementations for msgr.
//!
//! SQLite-backed repositories (the Store capability), the Argon2 credential
//! hasher, and the config loader. Everything here implements traits defined
//! in msgr-core.

pub mod config;
pub mod crypto;
pub mod sqlite;
