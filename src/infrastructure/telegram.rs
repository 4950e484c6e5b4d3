//! Telegram notification delivery

use async_trait::async_trait;
use serde::Serialize;

use crate::shared::errors::NotifyError;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Delivery seam for alerts, one message per run at most
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

/// Bot API client bound to a single chat
pub struct TelegramNotifier {
    http_client: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: TELEGRAM_API_BASE.to_string(),
            bot_token: bot_token.into(),
            chat_id,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let request = SendMessageRequest {
            chat_id: self.chat_id,
            text: message,
            parse_mode: "HTML",
        };

        let response = self.http_client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api { status, body });
        }
        Ok(())
    }
}
