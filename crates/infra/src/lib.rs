mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, ConfigError};
pub use repos::{IReminderRepo, InMemoryReminderRepo, Repos, SqliteReminderRepo};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct RemindBotContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
    /// Held for the whole duration of a sweep so that two sweeps
    /// never run at the same time
    pub sweep_lock: Arc<Mutex<()>>,
}

impl RemindBotContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = Repos::create_sqlite(&config.database_url).await?;
        repos.reminders.initialize().await?;
        let notifier = WhatsAppNotifier::new(
            &config.graph_api_url,
            &config.facebook_token,
            config.notifier_timeout,
        )?;

        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(notifier),
            sweep_lock: Default::default(),
        })
    }

    /// Context with inmemory repos and notifier, used for testing
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::for_testing(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(InMemoryNotifier::new()),
            sweep_lock: Default::default(),
        }
    }

    /// Same as `create_inmemory` but backed by an in-memory sqlite database
    pub async fn create_sqlite_inmemory() -> anyhow::Result<Self> {
        let mut ctx = Self::create_inmemory();
        ctx.repos = Repos::create_sqlite(&ctx.config.database_url).await?;
        ctx.repos.reminders.initialize().await?;
        Ok(ctx)
    }
}

/// Will setup the infrastructure context given the environment.
///
/// Fails if the configuration is incomplete or the reminder store
/// could not be initialized, in which case the process cannot continue.
pub async fn setup_context() -> anyhow::Result<RemindBotContext> {
    let config = Config::new()?;
    RemindBotContext::create(config).await
}
