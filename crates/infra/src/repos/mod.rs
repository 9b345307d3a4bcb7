mod reminder;
mod shared;

pub use reminder::{IReminderRepo, InMemoryReminderRepo, SqliteReminderRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_sqlite(connection_string: &str) -> anyhow::Result<Self> {
        let in_memory = connection_string.contains(":memory:");
        let mut options =
            SqliteConnectOptions::from_str(connection_string)?.create_if_missing(true);
        // Every connection to an in-memory database opens a new database,
        // so the pool has to stick to a single connection.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(5)
        };

        info!("DB CHECKING CONNECTION ...");
        let pool = pool_options.connect_with(options).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            reminders: Arc::new(SqliteReminderRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
