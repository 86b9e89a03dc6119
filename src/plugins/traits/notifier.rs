use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LastStatus, StockStatus};
use crate::utils::error::Degradation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub product_url: String,
    pub previous: String,
    pub current: StockStatus,
    pub detected_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn restock(product_url: &str, previous: &LastStatus, current: StockStatus) -> Self {
        Self {
            product_url: product_url.to_string(),
            previous: previous.as_str().to_string(),
            current,
            detected_at: Utc::now(),
        }
    }

    /// Human-readable text shared by every channel.
    pub fn message(&self) -> String {
        format!("Product is back in stock: {}", self.product_url)
    }
}

/// Trait for implementing notification channels (Discord, Telegram, etc.)
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Single attempt, no retry. Transport failures are reported, never fatal.
    async fn notify(&self, event: &NotificationEvent) -> Result<(), Degradation>;
}
