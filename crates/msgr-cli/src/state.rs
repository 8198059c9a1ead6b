//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the interactive
//! session. Services are generic over repository/hasher traits, but
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use msgr_core::service::chat::ChatService;
use msgr_core::service::identity::IdentityService;
use msgr_core::service::message::MessageService;
use msgr_core::service::notification::NotificationService;
use msgr_infra::config::load_global_config;
use msgr_infra::crypto::Argon2CredentialHasher;
use msgr_infra::sqlite::chat::SqliteChatRepository;
use msgr_infra::sqlite::message::SqliteMessageRepository;
use msgr_infra::sqlite::notification::SqliteNotificationRepository;
use msgr_infra::sqlite::pool::DatabasePool;
use msgr_infra::sqlite::user::SqliteUserRepository;
use msgr_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteIdentityService = IdentityService<SqliteUserRepository, Argon2CredentialHasher>;
pub type ConcreteChatService = ChatService<SqliteChatRepository, SqliteUserRepository>;
pub type ConcreteMessageService = MessageService<SqliteMessageRepository>;
pub type ConcreteNotificationService = NotificationService<SqliteNotificationRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<ConcreteIdentityService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub message_service: Arc<ConcreteMessageService>,
    pub notification_service: Arc<ConcreteNotificationService>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

/// Resolve the data directory: `$MSGR_DATA_DIR`, or `~/.msgr`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MSGR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".msgr")
}

impl AppState {
    /// Initialize the application state: connect to the store, wire services.
    ///
    /// `db_path` overrides the default store location. A connection failure
    /// here is fatal to the session.
    pub async fn init(db_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = match &db_path {
            Some(path) => format!("sqlite://{}?mode=rwc", path.display()),
            None => format!("sqlite://{}?mode=rwc", data_dir.join("msgr.db").display()),
        };
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_global_config(&data_dir).await;

        let identity_service = IdentityService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2CredentialHasher::new(),
        );
        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteUserRepository::new(db_pool.clone()),
        );
        let message_service = MessageService::new(SqliteMessageRepository::new(db_pool.clone()));
        let notification_service =
            NotificationService::new(SqliteNotificationRepository::new(db_pool.clone()));

        Ok(Self {
            identity_service: Arc::new(identity_service),
            chat_service: Arc::new(chat_service),
            message_service: Arc::new(message_service),
            notification_service: Arc::new(notification_service),
            config,
            data_dir,
            db_pool,
        })
    }
}
