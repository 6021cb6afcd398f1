use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_LEAGUE_ID: &str = "24";
pub const DEFAULT_FBREF_BASE_URL: &str = "https://fbref.com";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_FETCH_DELAY_SECS: u64 = 5;

#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    pub api_base: String,
}

// Keeps the bot token out of logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TelegramConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, "TELEGRAM_TOKEN")?;
        let chat_id = required(&lookup, "TELEGRAM_CHAT_ID")?;
        let api_base = non_empty(lookup("TELEGRAM_API_BASE"))
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());
        Ok(Self {
            token,
            chat_id,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub league_id: String,
    pub fbref_base_url: String,
    pub fetch_delay: Duration,
    pub telegram: TelegramConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram = TelegramConfig::from_lookup(&lookup)?;
        let league_id = non_empty(lookup("GOAL_ALERT_LEAGUE_ID"))
            .unwrap_or_else(|| DEFAULT_LEAGUE_ID.to_string());
        let fbref_base_url = non_empty(lookup("FBREF_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_FBREF_BASE_URL.to_string());
        let fetch_delay_secs = match non_empty(lookup("FETCH_DELAY_SECS")) {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidVar {
                name: "FETCH_DELAY_SECS",
                value: raw,
            })?,
            None => DEFAULT_FETCH_DELAY_SECS,
        };

        Ok(Self {
            league_id,
            fbref_base_url: fbref_base_url.trim_end_matches('/').to_string(),
            fetch_delay: Duration::from_secs(fetch_delay_secs),
            telegram,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key)).ok_or(ConfigError::MissingVar(key))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
