mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, MailConfig, PushConfig, SmtpConfig};
pub use repos::Repos;
pub use services::*;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, ManualSys, RealSys};

#[derive(Clone)]
pub struct FestContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailer>,
    pub push: Arc<dyn IPushNotifier>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl FestContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let config = Config::new();

        let mailer: Arc<dyn IMailer> = match (&config.smtp, &config.mail) {
            (Some(smtp), _) => Arc::new(SmtpMailer::new(smtp.clone())?),
            (None, Some(mail)) => Arc::new(HttpRelayMailer::new(mail.clone())),
            (None, None) => Arc::new(DisabledMailer {}),
        };
        let push: Arc<dyn IPushNotifier> = match &config.push {
            Some(push) => Arc::new(PusherClient::new(push.clone())),
            None => Arc::new(DisabledPushNotifier {}),
        };

        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mailer,
            push,
        })
    }

    /// Context backed by in-memory repositories and transports, used when testing
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(InMemoryMailer::new()),
            push: Arc::new(InMemoryPushNotifier::new("test-key", "test-secret")),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<FestContext> {
    FestContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string()?,
    })
    .await
}

fn get_psql_connection_string() -> anyhow::Result<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING).map_err(|_| {
        anyhow::Error::msg(format!(
            "{} env var to be present.",
            PSQL_CONNECTION_STRING
        ))
    })
}

pub async fn run_migration() -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string()?)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    Ok(())
}
