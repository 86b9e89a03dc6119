pub mod notifier;

pub use notifier::{NotificationEvent, NotifierPlugin};
