pub mod checker;
pub mod config;
pub mod element_finder;
pub mod models;
pub mod plugins;
pub mod prober;
pub mod scraper;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use checker::{CheckReport, StockChecker};
pub use config::{NotifierCredentials, WatcherConfig};
pub use models::{LastStatus, StockStatus, should_notify};
pub use utils::error::{AppError, Degradation};

pub type Result<T> = std::result::Result<T, AppError>;
