use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::utils::error::{AppError, Result};

pub const ENV_PREFIX: &str = "STOCK_WATCHER";
const REQUIRED_KEYS: &[&str] = &["product_url"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub product_url: String,
    #[serde(default = "default_size_label")]
    pub size_label: String,
    #[serde(default = "default_color_label")]
    pub color_label: String,
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default)]
    pub chrome_path: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            user_agent: None,
        }
    }
}

fn default_size_label() -> String {
    "Small".to_string()
}

fn default_color_label() -> String {
    "Matte Black".to_string()
}

fn default_headless() -> bool {
    true
}

/// Per-channel secrets read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct NotifierCredentials {
    pub discord_webhook_url: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: Option<String>,
}

impl NotifierCredentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            discord_webhook_url: get("DISCORD_WEBHOOK_URL"),
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            telegram_api_base: get("TELEGRAM_API_BASE"),
        }
    }
}

impl WatcherConfig {
    pub fn option_labels(&self) -> Vec<String> {
        vec![self.size_label.clone(), self.color_label.clone()]
    }

    /// Load from `path`, layered with `STOCK_WATCHER_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from(path, Environment::with_prefix(ENV_PREFIX))?;

        if config.browser.chrome_path.is_none() {
            config.browser.chrome_path = env::var("CHROME_PATH").ok();
        }

        Ok(config)
    }

    pub(crate) fn load_from(path: &Path, environment: Environment) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::ConfigMissing {
                path: path.to_path_buf(),
            });
        }

        let malformed = |e: ConfigError| AppError::ConfigMalformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut file = File::from(path).required(true);
        if !has_known_extension(path) {
            file = file.format(FileFormat::Json);
        }

        let settings = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()
            .map_err(malformed)?;

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| matches!(settings.get_string(key), Err(ConfigError::NotFound(_))))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::ConfigIncomplete { missing });
        }

        settings.try_deserialize().map_err(malformed)
    }
}

/// Files without one of these extensions are read as JSON.
const KNOWN_EXTENSIONS: &[&str] = &["json", "json5", "toml", "yaml", "yml", "ini", "ron"];

fn has_known_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| KNOWN_EXTENSIONS.contains(&ext))
}
