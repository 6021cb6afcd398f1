use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use crate::http_client::http_client;

pub trait Notify {
    fn send(&self, message: &str) -> Result<(), NotifyError>;
}

impl<T: Notify + ?Sized> Notify for &T {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        (**self).send(message)
    }
}

/// Telegram Bot API `sendMessage`, Markdown parse mode.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self { config }
    }

    pub fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.config.api_base, self.config.token)
    }

    pub fn query_params<'a>(&'a self, message: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("chat_id", self.config.chat_id.as_str()),
            ("text", message),
            ("parse_mode", "Markdown"),
        ]
    }
}

impl Notify for TelegramNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let client = http_client().map_err(NotifyError::Client)?;
        debug!(chat_id = %self.config.chat_id, chars = message.len(), "sending telegram message");

        let resp = client
            .get(self.send_message_url())
            .query(&self.query_params(message))
            .send()
            // reqwest errors embed the URL, and the URL embeds the token.
            .map_err(|err| NotifyError::Transport(err.without_url()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Status { status });
        }
        info!(chat_id = %self.config.chat_id, "telegram message delivered");
        Ok(())
    }
}
