use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the whole run.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required file: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("Invalid configuration in {}: {message}", path.display())]
    ConfigMalformed { path: PathBuf, message: String },

    #[error("Missing config keys: {}", missing.join(", "))]
    ConfigIncomplete { missing: Vec<String> },

    #[error("Invalid JSON in {}: {source}", path.display())]
    StateMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write state file {}: {source}", path.display())]
    StateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Page interaction failed: {0}")]
    Driver(String),
}

/// Errors that degrade a run without aborting it.
#[derive(Error, Debug)]
pub enum Degradation {
    #[error("Could not find option labeled '{label}'")]
    SelectionNotFound { label: String },

    #[error("Could not select option '{label}': {message}")]
    SelectionFailed { label: String, message: String },

    #[error("Add to cart button not found")]
    AddToCartNotFound,

    #[error("Could not read add to cart button: {message}")]
    AddToCartUnreadable { message: String },

    #[error("{channel} notification failed: {message}")]
    NotificationTransport { channel: String, message: String },
}

impl Degradation {
    pub fn transport(channel: &str, err: reqwest::Error) -> Self {
        Degradation::NotificationTransport {
            channel: channel.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
