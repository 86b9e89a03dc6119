use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::de::DeserializeOwned;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::config::BrowserConfig;
use crate::element_finder::{
    self, ElementHandle, NameMatch, disabled_script, exact_text_script, role_candidates_script,
};
use crate::utils::error::{AppError, Result};

/// Browser capabilities the prober relies on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` and wait for the page to settle.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Elements with `role` whose accessible name satisfies `name`.
    async fn find_by_role(&self, role: &str, name: &NameMatch) -> Result<Vec<ElementHandle>>;

    /// Innermost elements whose visible text is exactly `text`.
    async fn find_by_text(&self, text: &str) -> Result<Vec<ElementHandle>>;

    async fn click(&self, element: &ElementHandle) -> Result<()>;

    async fn is_disabled(&self, element: &ElementHandle) -> Result<bool>;
}

/// A single headless Chrome session with one tab.
///
/// The Chrome process lives exactly as long as this value, so dropping it
/// closes the browser on every exit path.
pub struct ChromeDriver {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false) // Often needed in containerized environments
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("Failed to create tab: {}", e)))?;

        if let Some(user_agent) = &config.user_agent {
            tab.set_user_agent(user_agent, None, None)
                .map_err(|e| AppError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        debug!("Browser session started");
        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    /// Run a script that returns `JSON.stringify(...)` and decode the result.
    fn evaluate_json<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| AppError::Driver(format!("Script evaluation failed: {}", e)))?;

        let raw = result
            .value
            .as_ref()
            .and_then(|value| value.as_str())
            .ok_or_else(|| AppError::Driver("Script returned no JSON payload".to_string()))?;

        serde_json::from_str(raw)
            .map_err(|e| AppError::Driver(format!("Failed to parse script result: {}", e)))
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| AppError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn find_by_role(&self, role: &str, name: &NameMatch) -> Result<Vec<ElementHandle>> {
        let script = role_candidates_script(&element_finder::role_selector(role));
        let candidates: Vec<ElementHandle> = self.evaluate_json(&script)?;
        debug!("{} candidate(s) with role {}", candidates.len(), role);

        Ok(candidates
            .into_iter()
            .filter(|candidate| name.matches(&candidate.name))
            .collect())
    }

    async fn find_by_text(&self, text: &str) -> Result<Vec<ElementHandle>> {
        self.evaluate_json(&exact_text_script(text))
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        self.tab
            .find_element(&element.selector())
            .and_then(|found| found.click().map(|_| ()))
            .map_err(|e| AppError::Driver(format!("Failed to click '{}': {}", element.name, e)))
    }

    async fn is_disabled(&self, element: &ElementHandle) -> Result<bool> {
        let disabled: Option<bool> = self.evaluate_json(&disabled_script(element))?;
        disabled.ok_or_else(|| {
            AppError::Driver(format!("Element '{}' detached from page", element.name))
        })
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            debug!("Tab close on shutdown failed: {}", e);
        }
        debug!("Browser session closed");
    }
}
