//! Shared application state: UI preferences, notifications, and the
//! realtime connection mirror.
//!
//! The store is an explicitly constructed, cheaply cloneable container.
//! Consumers receive a handle by injection; there are no globals. Mutations
//! broadcast [`StoreEvent`]s so long-lived tasks can react without polling.

pub mod preferences;
pub mod store;

pub use preferences::{Preferences, PreferencesFile, PriceRange, Theme, TimeRange};
pub use store::{AppStore, StoreEvent, UPDATE_TAG_CAPACITY};
