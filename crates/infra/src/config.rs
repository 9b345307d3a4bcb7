use remind_bot_domain::{DueDatePolicy, InvalidSweepScheduleError, RetryPolicy, SweepSchedule};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The `{0}` environment variable has to be set")]
    Missing(&'static str),
    #[error("Invalid `SWEEP_TIMES`: {0}")]
    InvalidSweepTimes(#[from] InvalidSweepScheduleError),
}

/// Immutable configuration snapshot, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Token the messaging provider has to echo back when verifying the webhook
    pub verify_token: String,
    /// Access token for the Graph API used to send messages
    pub facebook_token: String,
    /// When set, inbound webhook events must be signed with this secret
    pub app_secret: Option<String>,
    pub database_url: String,
    /// Base url of the Graph API, e.g. `https://graph.facebook.com/v12.0`
    pub graph_api_url: String,
    /// UTC times of day at which pending reminders are swept
    pub sweep_schedule: SweepSchedule,
    pub due_date_policy: DueDatePolicy,
    pub retry_policy: RetryPolicy,
    /// Upper bound for a single outbound request to the messaging provider.
    /// Also bounds how long a sweep can take per reminder.
    pub notifier_timeout: Duration,
}

const DEFAULT_PORT: usize = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite://reminders.db";
const DEFAULT_GRAPH_API_URL: &str = "https://graph.facebook.com/v12.0";

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let verify_token = required_env("VERIFY_TOKEN")?;
        let facebook_token = required_env("FACEBOOK_TOKEN")?;
        let app_secret = std::env::var("APP_SECRET").ok().filter(|s| !s.is_empty());
        if app_secret.is_none() {
            info!("Did not find APP_SECRET environment variable. Webhook signatures will not be verified.");
        }

        let port = parse_env("PORT", DEFAULT_PORT);
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let graph_api_url = std::env::var("GRAPH_API_URL")
            .unwrap_or_else(|_| DEFAULT_GRAPH_API_URL.into())
            .trim_end_matches('/')
            .to_string();

        let sweep_schedule = match std::env::var("SWEEP_TIMES") {
            Ok(times) => times.parse::<SweepSchedule>()?,
            Err(_) => SweepSchedule::default(),
        };

        let delay_secs = parse_env::<i64>("REMINDER_DELAY_SECS", 0);
        let due_date_policy = DueDatePolicy::from_delay_millis(delay_secs.saturating_mul(1000));

        let default_retry = RetryPolicy::default();
        let retry_policy = RetryPolicy {
            max_attempts: parse_env("MAX_DELIVERY_ATTEMPTS", default_retry.max_attempts),
            backoff_base: parse_env::<i64>("RETRY_BACKOFF_SECS", default_retry.backoff_base / 1000)
                .saturating_mul(1000),
            backoff_max: default_retry.backoff_max,
        };

        let notifier_timeout =
            Duration::from_secs(parse_env::<u64>("NOTIFIER_TIMEOUT_SECS", 10));

        Ok(Self {
            port,
            verify_token,
            facebook_token,
            app_secret,
            database_url,
            graph_api_url,
            sweep_schedule,
            due_date_policy,
            retry_policy,
            notifier_timeout,
        })
    }

    /// Config used by tests, does not read the environment
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            verify_token: "verify-token".into(),
            facebook_token: "facebook-token".into(),
            app_secret: None,
            database_url: "sqlite::memory:".into(),
            graph_api_url: "http://localhost".into(),
            sweep_schedule: SweepSchedule::default(),
            due_date_policy: DueDatePolicy::Immediate,
            retry_policy: RetryPolicy::default(),
            notifier_timeout: Duration::from_secs(5),
        }
    }
}

fn required_env(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    let value = match std::env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                key, value, default
            );
            default
        }
    }
}
