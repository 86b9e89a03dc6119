use tracing::{debug, info, warn};

use crate::element_finder::{ElementHandle, NameMatch};
use crate::models::StockStatus;
use crate::scraper::PageDriver;
use crate::utils::error::{AppError, Degradation, Result};

const BUTTON_ROLE: &str = "button";
const ADD_TO_CART_LABEL: &str = "add to cart";

/// Result of one page visit.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub status: StockStatus,
    /// Non-fatal problems hit along the way.
    pub degradations: Vec<Degradation>,
}

/// Visits the product page, picks the variant and reads the add-to-cart state.
pub struct StatusProber<D> {
    driver: D,
    option_labels: Vec<String>,
}

impl<D: PageDriver> StatusProber<D> {
    pub fn new(driver: D, option_labels: Vec<String>) -> Self {
        Self {
            driver,
            option_labels,
        }
    }

    /// Only navigation failures are fatal. Anything that goes wrong while
    /// selecting options or reading the add-to-cart control degrades the
    /// result instead.
    pub async fn probe(&self, product_url: &str) -> Result<ProbeOutcome> {
        self.driver.navigate(product_url).await?;

        let mut degradations = Vec::new();
        for label in &self.option_labels {
            if let Err(degraded) = self.select_option(label).await {
                warn!("{}.", degraded);
                degradations.push(degraded);
            }
        }

        let status = match self.add_to_cart_disabled().await {
            Ok(true) => StockStatus::OutOfStock,
            Ok(false) => StockStatus::InStock,
            Err(degraded) => {
                warn!("{}.", degraded);
                degradations.push(degraded);
                StockStatus::Unknown
            }
        };

        Ok(ProbeOutcome {
            status,
            degradations,
        })
    }

    /// Clicks the first button named `label`, falling back to exact text.
    async fn select_option(&self, label: &str) -> std::result::Result<(), Degradation> {
        let failed = |e: AppError| Degradation::SelectionFailed {
            label: label.to_string(),
            message: e.to_string(),
        };

        let mut found = self
            .driver
            .find_by_role(BUTTON_ROLE, &NameMatch::exact(label))
            .await
            .map_err(failed)?;
        if found.is_empty() {
            found = self.driver.find_by_text(label).await.map_err(failed)?;
        }

        let Some(first) = found.first() else {
            return Err(Degradation::SelectionNotFound {
                label: label.to_string(),
            });
        };

        self.driver.click(first).await.map_err(failed)?;
        info!("Selected option '{}'", label);
        Ok(())
    }

    async fn add_to_cart_disabled(&self) -> std::result::Result<bool, Degradation> {
        let unreadable = |e: AppError| Degradation::AddToCartUnreadable {
            message: e.to_string(),
        };

        let matches: Vec<ElementHandle> = self
            .driver
            .find_by_role(BUTTON_ROLE, &NameMatch::contains_ignore_case(ADD_TO_CART_LABEL))
            .await
            .map_err(unreadable)?;

        let Some(first) = matches.first() else {
            return Err(Degradation::AddToCartNotFound);
        };
        if matches.len() > 1 {
            debug!("{} add-to-cart controls found, using the first", matches.len());
        }

        self.driver.is_disabled(first).await.map_err(unreadable)
    }
}
