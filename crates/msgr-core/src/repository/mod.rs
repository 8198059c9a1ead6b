//! Repository trait definitions.
//!
//! These traits are the Store capability boundary: msgr-core defines what
//! the persistent store must do, msgr-infra implements it with SQLite.
//! All traits use native async fn in traits (RPITIT, Rust 2024 edition).

pub mod chat;
pub mod message;
pub mod notification;
pub mod user;
