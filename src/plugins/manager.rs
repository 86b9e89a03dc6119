use reqwest::Client;
use tracing::{info, warn};

use super::notifiers::{DiscordNotifier, TelegramNotifier, discord, telegram};
use super::traits::{NotificationEvent, NotifierPlugin};
use crate::config::NotifierCredentials;
use crate::utils::error::Degradation;

pub type NotifierPluginBox = Box<dyn NotifierPlugin>;

/// A notification channel, either ready to send or missing its credentials.
pub enum Channel {
    Ready(NotifierPluginBox),
    Unconfigured {
        name: String,
        missing: String,
    },
}

impl Channel {
    pub fn name(&self) -> &str {
        match self {
            Channel::Ready(plugin) => plugin.name(),
            Channel::Unconfigured { name, .. } => name,
        }
    }
}

/// Outcome of one dispatch round, per channel.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub sent: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<Degradation>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.sent.len() + self.failed.len()
    }
}

#[derive(Default)]
pub struct PluginManager {
    channels: Vec<Channel>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the Discord and Telegram channels, gating each on its credentials.
    pub fn from_credentials(credentials: &NotifierCredentials, client: Client) -> Self {
        let mut manager = Self::new();

        match &credentials.discord_webhook_url {
            Some(webhook_url) => {
                manager.register(Box::new(DiscordNotifier::new(client.clone(), webhook_url)))
            }
            None => manager.register_unconfigured(discord::CHANNEL, "DISCORD_WEBHOOK_URL"),
        }

        match (&credentials.telegram_bot_token, &credentials.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                let mut notifier = TelegramNotifier::new(client, token, chat_id);
                if let Some(api_base) = &credentials.telegram_api_base {
                    notifier = notifier.with_api_base(api_base);
                }
                manager.register(Box::new(notifier));
            }
            _ => manager
                .register_unconfigured(telegram::CHANNEL, "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID"),
        }

        manager
    }

    pub fn register(&mut self, plugin: NotifierPluginBox) {
        self.channels.push(Channel::Ready(plugin));
    }

    pub fn register_unconfigured(&mut self, name: &str, missing: &str) {
        self.channels.push(Channel::Unconfigured {
            name: name.to_string(),
            missing: missing.to_string(),
        });
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(Channel::name).collect()
    }

    /// Sends `event` through every ready channel in registration order.
    /// Failures are collected, never propagated.
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchReport {
        let mut report = DispatchReport::default();

        for channel in &self.channels {
            match channel {
                Channel::Unconfigured { name, missing } => {
                    info!("{} is not set. Skipping {} notification.", missing, name);
                    report.skipped.push(name.clone());
                }
                Channel::Ready(plugin) => match plugin.notify(event).await {
                    Ok(()) => {
                        info!("Notification sent to {}.", plugin.name());
                        report.sent.push(plugin.name().to_string());
                    }
                    Err(e) => {
                        warn!("Failed to send {} notification: {}", plugin.name(), e);
                        report.failed.push(e);
                    }
                },
            }
        }

        report
    }
}
