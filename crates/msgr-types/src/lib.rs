//! Shared domain types for msgr.
//!
//! This crate contains the core domain types used across the msgr backend:
//! users and their contact/block lists, chats, messages with attachments,
//! and the associated error taxonomies. Notifications travel as bare
//! message ids.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod message;
pub mod user;
