//! User account and contact/block list types.
//!
//! Every user owns exactly two lists, one of each [`ListKind`], allocated at
//! account creation and never shared between users. List membership is a set:
//! the (list, member) pair is unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Kind of a per-user relationship list.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (kind IN ('contact', 'block'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Contact,
    Block,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Contact => write!(f, "contact"),
            ListKind::Block => write!(f, "block"),
        }
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contact" => Ok(ListKind::Contact),
            "block" => Ok(ListKind::Block),
            other => Err(format!("invalid list kind: '{other}'")),
        }
    }
}

/// A registered user account.
///
/// The password is stored as a salted Argon2 PHC string, never in plain text.
/// `contact_list_id` and `block_list_id` reference the two lists created
/// alongside the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: String,
    pub status: String,
    pub contact_list_id: i64,
    pub block_list_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a user account.
///
/// Carries the already-hashed credential; hashing happens in the identity
/// service before the repository is involved.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password_hash: String,
    pub phone: String,
    pub status: String,
}

/// One row of a contact-list projection: the contact's login and their
/// current status text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub login: String,
    pub status: String,
}
