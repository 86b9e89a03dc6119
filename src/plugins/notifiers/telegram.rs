// notifiers/telegram.rs

use crate::plugins::traits::{NotificationEvent, NotifierPlugin};
use crate::utils::error::Degradation;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

pub const CHANNEL: &str = "Telegram";
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends messages through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> Result<Url, Degradation> {
        let invalid = |message: String| Degradation::NotificationTransport {
            channel: CHANNEL.to_string(),
            message,
        };

        let mut url = Url::parse(&self.api_base)
            .map_err(|e| invalid(format!("Invalid API base '{}': {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("API base '{}' cannot take a path", self.api_base)))?
            .pop_if_empty()
            .push(&format!("bot{}", self.bot_token))
            .push("sendMessage");
        Ok(url)
    }

    fn create_payload(&self, event: &NotificationEvent) -> serde_json::Value {
        json!({
            "chat_id": self.chat_id,
            "text": event.message(),
        })
    }
}

#[async_trait]
impl NotifierPlugin for TelegramNotifier {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn notify(&self, event: &NotificationEvent) -> Result<(), Degradation> {
        let url = self.endpoint()?;
        let payload = self.create_payload(event);

        self.client
            .post(url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Degradation::transport(CHANNEL, e))?;

        Ok(())
    }
}
