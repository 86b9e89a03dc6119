use crate::plugins::traits::{NotificationEvent, NotifierPlugin};
use crate::utils::error::Degradation;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub const CHANNEL: &str = "Discord";

/// Posts to a Discord-compatible incoming webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(client: Client, webhook_url: impl Into<String>) -> Self {
        DiscordNotifier {
            client,
            webhook_url: webhook_url.into(),
        }
    }

    fn create_webhook_payload(&self, event: &NotificationEvent) -> serde_json::Value {
        json!({ "content": event.message() })
    }
}

#[async_trait]
impl NotifierPlugin for DiscordNotifier {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn notify(&self, event: &NotificationEvent) -> Result<(), Degradation> {
        let payload = self.create_webhook_payload(event);

        self.client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Degradation::transport(CHANNEL, e))?;

        Ok(())
    }
}
