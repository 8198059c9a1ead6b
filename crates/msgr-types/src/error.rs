use thiserror::Error;

/// Errors from repository operations (used by trait definitions in msgr-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to accounts and contact/block relationships.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("login '{0}' already exists")]
    LoginTaken(String),

    #[error("unknown login '{0}'")]
    UnknownLogin(String),

    #[error("invalid credentials")]
    Unauthorized,

    #[error("'{login}' is already on the {kind} list")]
    AlreadyListed { login: String, kind: String },

    #[error("credential error: {0}")]
    Credential(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors related to chat directory operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound,

    #[error("unknown user '{0}'")]
    UnknownUser(String),

    #[error("'{0}' is already a member of this chat")]
    AlreadyMember(String),

    #[error("'{0}' is not a member of this chat")]
    NotAMember(String),

    #[error("cannot add '{0}': a block relationship exists")]
    Blocked(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors related to message operations.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message not found")]
    NotFound,

    #[error("only the original sender may edit a message")]
    NotSender,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
