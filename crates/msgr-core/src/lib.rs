//! Business logic for msgr.
//!
//! Contains the repository trait definitions (implemented in msgr-infra),
//! the domain services orchestrating them, the credential hasher seam, and
//! the session state machine driving the interactive menus.
//!
//! This crate never touches I/O directly: the store and the console are
//! capabilities injected from the outside.

pub mod credential;
pub mod repository;
pub mod service;
pub mod session;
