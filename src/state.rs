use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{LastStatus, StockStatus};
use crate::utils::error::{AppError, Result};

const STATUS_KEY: &str = "last_status";

/// Single-scalar store for the most recently observed stock status.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is a first run and reads as `unknown`.
    pub fn load(&self) -> Result<LastStatus> {
        if !self.path.exists() {
            debug!("No state file at {}, assuming first run", self.path.display());
            return Ok(LastStatus::default());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let data: Value =
            serde_json::from_str(&contents).map_err(|source| AppError::StateMalformed {
                path: self.path.clone(),
                source,
            })?;

        let Value::Object(map) = data else {
            return Err(AppError::StateMalformed {
                path: self.path.clone(),
                source: serde::de::Error::custom("expected a JSON object"),
            });
        };

        let last = match map.get(STATUS_KEY) {
            None | Some(Value::Null) => LastStatus::default(),
            Some(Value::String(raw)) => LastStatus::new(raw.as_str()),
            Some(other) => LastStatus::new(other.to_string()),
        };
        Ok(last)
    }

    /// Overwrites the stored value, `unknown` included.
    pub fn save(&self, status: StockStatus) -> Result<()> {
        let body = json!({ "last_status": status.as_str() });
        let text = serde_json::to_string_pretty(&body).map_err(|e| AppError::StateWrite {
            path: self.path.clone(),
            source: e.into(),
        })?;

        std::fs::write(&self.path, text).map_err(|source| AppError::StateWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved state {} to {}", status, self.path.display());
        Ok(())
    }
}
