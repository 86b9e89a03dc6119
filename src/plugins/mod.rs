pub mod traits;
pub mod manager;
pub mod notifiers;

pub use manager::{DispatchReport, PluginManager};
pub use traits::{NotificationEvent, NotifierPlugin};
