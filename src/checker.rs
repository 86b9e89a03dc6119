use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::{self, LastStatus, StockStatus};
use crate::plugins::{DispatchReport, NotificationEvent, PluginManager};
use crate::prober::StatusProber;
use crate::scraper::PageDriver;
use crate::state::StateStore;
use crate::utils::error::{Degradation, Result};

#[derive(Debug)]
pub struct CheckReport {
    pub previous: LastStatus,
    pub current: StockStatus,
    pub restocked: bool,
    /// `None` when no qualifying transition happened or dispatch was suppressed.
    pub dispatch: Option<DispatchReport>,
    /// Page-side degradations; channel failures live in `dispatch`.
    pub degradations: Vec<Degradation>,
    pub persisted: bool,
    pub checked_at: DateTime<Utc>,
}

/// One full check: load state, open the page, notify on restock, persist.
pub struct StockChecker {
    product_url: String,
    option_labels: Vec<String>,
    store: StateStore,
    plugins: PluginManager,
    dry_run: bool,
}

impl StockChecker {
    pub fn new(
        product_url: impl Into<String>,
        option_labels: Vec<String>,
        store: StateStore,
        plugins: PluginManager,
    ) -> Self {
        Self {
            product_url: product_url.into(),
            option_labels,
            store,
            plugins,
            dry_run: false,
        }
    }

    /// Check and report only: no notifications, no state write.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// `launch` opens the browser session. It runs only after the state file
    /// has been read, and the session is dropped when the check returns.
    pub async fn check_once<D, F>(&self, launch: F) -> Result<CheckReport>
    where
        D: PageDriver,
        F: FnOnce() -> Result<D>,
    {
        info!("Checking product page: {}", self.product_url);

        let previous = self.store.load()?;
        let prober = StatusProber::new(launch()?, self.option_labels.clone());
        let outcome = prober.probe(&self.product_url).await?;
        let current = outcome.status;

        info!("Previous status: {}", previous);
        info!("Current status: {}", current);

        let restocked = models::is_restock(&previous, current);

        if self.dry_run {
            info!(
                "Dry run: restock={}, skipping notifications and state write",
                restocked
            );
            return Ok(CheckReport {
                previous,
                current,
                restocked,
                dispatch: None,
                degradations: outcome.degradations,
                persisted: false,
                checked_at: Utc::now(),
            });
        }

        let dispatch = if restocked {
            let event = NotificationEvent::restock(&self.product_url, &previous, current);
            Some(self.plugins.dispatch(&event).await)
        } else {
            None
        };

        self.store.save(current)?;

        Ok(CheckReport {
            previous,
            current,
            restocked,
            dispatch,
            degradations: outcome.degradations,
            persisted: true,
            checked_at: Utc::now(),
        })
    }
}
