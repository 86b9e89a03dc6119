use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stock state of the monitored variant as observed on one page visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Unknown,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(StockStatus::InStock),
            "out_of_stock" => Ok(StockStatus::OutOfStock),
            "unknown" => Ok(StockStatus::Unknown),
            other => Err(format!("unrecognized stock status: {}", other)),
        }
    }
}

/// The raw `last_status` value read back from the state file.
///
/// Values are kept verbatim; a string outside the three known statuses is
/// carried through untouched and simply never matches a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastStatus(String);

impl LastStatus {
    pub fn new(raw: impl Into<String>) -> Self {
        LastStatus(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn status(&self) -> Option<StockStatus> {
        self.0.parse().ok()
    }
}

impl Default for LastStatus {
    fn default() -> Self {
        LastStatus::from(StockStatus::Unknown)
    }
}

impl From<StockStatus> for LastStatus {
    fn from(status: StockStatus) -> Self {
        LastStatus(status.as_str().to_string())
    }
}

impl fmt::Display for LastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Only an `out_of_stock -> in_stock` transition is worth announcing.
pub fn should_notify(previous: StockStatus, current: StockStatus) -> bool {
    matches!(
        (previous, current),
        (StockStatus::OutOfStock, StockStatus::InStock)
    )
}

/// Transition check against a recorded value that may not be a known status.
pub fn is_restock(previous: &LastStatus, current: StockStatus) -> bool {
    previous
        .status()
        .is_some_and(|previous| should_notify(previous, current))
}
