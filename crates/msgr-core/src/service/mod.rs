//! Domain services orchestrating the repositories.
//!
//! Services are generic over the repository traits (clean architecture:
//! msgr-core never depends on msgr-infra). Each interactive menu choice
//! maps to exactly one service operation.

pub mod chat;
pub mod identity;
pub mod message;
pub mod notification;
