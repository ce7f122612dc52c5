//! Application state wiring all services together.
//!
//! Services are generic over repository/hasher/provider traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use leadgate_core::auth::AuthService;
use leadgate_core::conversation::{ConversationEngine, SessionStore};
use leadgate_infra::config::{self, Secrets};
use leadgate_infra::crypto::{Argon2PasswordHasher, JwtTokenService};
use leadgate_infra::llm::OpenAiChatProvider;
use leadgate_infra::speech::GoogleSpeechClient;
use leadgate_infra::sqlite::{
    DatabasePool, SqliteAutoMessageRepository, SqliteLeadRepository, SqliteMetricsRepository,
    SqliteProductRepository, SqliteUserRepository,
};
use leadgate_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2PasswordHasher, JwtTokenService>;

pub type ConcreteConversationEngine =
    ConversationEngine<OpenAiChatProvider, SqliteLeadRepository>;

/// Shared application state holding all services and repositories.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<ConcreteAuthService>,
    pub engine: Arc<ConcreteConversationEngine>,
    pub sessions: Arc<SessionStore>,
    pub leads: Arc<SqliteLeadRepository>,
    pub products: Arc<SqliteProductRepository>,
    pub auto_messages: Arc<SqliteAutoMessageRepository>,
    pub metrics: Arc<SqliteMetricsRepository>,
    pub speech: Arc<GoogleSpeechClient>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config and secrets, connect to
    /// the database, wire services.
    pub async fn init(data_dir_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir_override.unwrap_or_else(config::default_data_dir);

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let app_config = config::load_app_config(&data_dir).await;
        let secrets = Secrets::from_env()?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("leadgate.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Wire the auth service
        let auth = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::default(),
            JwtTokenService::new(
                secrets.jwt_secret.clone(),
                app_config.auth.token_ttl_minutes,
            ),
        );

        // Session store is shared between the engine and the eviction sweep.
        let sessions = Arc::new(SessionStore::new(
            app_config.chat.transcript_cap,
            chrono::Duration::minutes(app_config.chat.session_ttl_minutes),
        ));

        // Wire the conversation engine with its own lead repository handle
        let provider = OpenAiChatProvider::new(&secrets.openai_api_key, &app_config.chat.model);
        let engine = ConversationEngine::new(
            provider,
            SqliteLeadRepository::new(db_pool.clone()),
            Arc::clone(&sessions),
            app_config.chat.clone(),
        );

        let speech = GoogleSpeechClient::new(
            secrets.google_api_key.clone(),
            app_config.speech.clone(),
        );

        Ok(Self {
            auth: Arc::new(auth),
            engine: Arc::new(engine),
            sessions,
            leads: Arc::new(SqliteLeadRepository::new(db_pool.clone())),
            products: Arc::new(SqliteProductRepository::new(db_pool.clone())),
            auto_messages: Arc::new(SqliteAutoMessageRepository::new(db_pool.clone())),
            metrics: Arc::new(SqliteMetricsRepository::new(db_pool.clone())),
            speech: Arc::new(speech),
            config: app_config,
            data_dir,
            db_pool,
        })
    }
}
