//! Shopping cart state: the store, its collaborator traits and its outcomes.

pub mod errors;
pub mod notifier;
pub mod ports;
pub mod store;

pub use errors::CartError;
pub use notifier::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use store::{CartDeps, CartStore, UpdateProductAmount};
