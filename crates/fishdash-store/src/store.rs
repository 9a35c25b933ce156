//! The store proper.

use crate::preferences::{Preferences, PreferencesFile, PriceRange, Theme, TimeRange};
use fishdash_core::{ConnectionStatus, Notification};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;
use uuid::Uuid;

/// Bound on the recent-update debug ring.
pub const UPDATE_TAG_CAPACITY: usize = 20;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events broadcast after each mutating store operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    ConnectionChanged(ConnectionStatus),
    NotificationAdded(Notification),
    RealTimeToggled(bool),
    PreferencesChanged,
}

struct StoreInner {
    preferences: Preferences,
    selected_fish_types: Vec<u64>,
    notifications: Vec<Notification>,
    connection_status: ConnectionStatus,
    last_update_ms: Option<i64>,
    update_tags: VecDeque<String>,
}

impl StoreInner {
    fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            selected_fish_types: Vec::new(),
            notifications: Vec::new(),
            connection_status: ConnectionStatus::Disconnected,
            last_update_ms: None,
            update_tags: VecDeque::with_capacity(UPDATE_TAG_CAPACITY),
        }
    }
}

/// Cheaply cloneable handle to the shared application state.
///
/// Connection status, last-update timestamp, and the update-tag ring are
/// written only by the realtime service; everything else is open to any
/// holder of the handle.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<RwLock<StoreInner>>,
    events: broadcast::Sender<StoreEvent>,
    persist: Option<Arc<PreferencesFile>>,
}

impl AppStore {
    /// In-memory store with default preferences.
    pub fn new() -> Self {
        Self::from_parts(Preferences::default(), None)
    }

    /// Store backed by a preferences file in `state_dir`. Saved preferences
    /// are loaded now; every preference change writes back.
    pub fn with_persistence(state_dir: impl AsRef<Path>) -> Self {
        let file = PreferencesFile::new(state_dir);
        let preferences = file.load();
        Self::from_parts(preferences, Some(Arc::new(file)))
    }

    fn from_parts(preferences: Preferences, persist: Option<Arc<PreferencesFile>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(StoreInner::new(preferences))),
            events,
            persist,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    fn save_preferences(&self, preferences: &Preferences) {
        if let Some(file) = &self.persist {
            if let Err(err) = file.save(preferences) {
                warn!(error = %err, "failed to save preferences");
            }
        }
    }

    /// Apply a preference mutation, persist, and emit PreferencesChanged.
    fn update_preferences(&self, apply: impl FnOnce(&mut Preferences)) {
        let snapshot = {
            let mut inner = self.inner.write();
            apply(&mut inner.preferences);
            inner.preferences.clone()
        };
        self.save_preferences(&snapshot);
        self.emit(StoreEvent::PreferencesChanged);
    }

    // --- preferences ---

    pub fn preferences(&self) -> Preferences {
        self.inner.read().preferences.clone()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.update_preferences(|p| p.theme = theme);
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.update_preferences(|p| p.sidebar_collapsed = collapsed);
    }

    pub fn set_time_range(&self, range: TimeRange) {
        self.update_preferences(|p| p.selected_time_range = range);
    }

    pub fn set_selected_location(&self, location: impl Into<String>) {
        let location = location.into();
        self.update_preferences(|p| p.selected_location = location);
    }

    pub fn set_refresh_interval_ms(&self, interval_ms: u64) {
        self.update_preferences(|p| p.refresh_interval_ms = interval_ms);
    }

    pub fn set_confidence_threshold(&self, threshold: f64) {
        self.update_preferences(|p| p.confidence_threshold = threshold);
    }

    pub fn set_price_range(&self, range: PriceRange) {
        self.update_preferences(|p| p.price_range = range);
    }

    pub fn real_time_enabled(&self) -> bool {
        self.inner.read().preferences.real_time_enabled
    }

    /// Flip the realtime flag; returns the new value.
    pub fn toggle_real_time(&self) -> bool {
        let (enabled, snapshot) = {
            let mut inner = self.inner.write();
            inner.preferences.real_time_enabled = !inner.preferences.real_time_enabled;
            (
                inner.preferences.real_time_enabled,
                inner.preferences.clone(),
            )
        };
        self.save_preferences(&snapshot);
        self.emit(StoreEvent::RealTimeToggled(enabled));
        enabled
    }

    /// Session-only fish type filter.
    pub fn selected_fish_types(&self) -> Vec<u64> {
        self.inner.read().selected_fish_types.clone()
    }

    pub fn set_selected_fish_types(&self, fish_types: Vec<u64>) {
        self.inner.write().selected_fish_types = fish_types;
    }

    // --- notifications ---

    pub fn add_notification(&self, notification: Notification) {
        {
            let mut inner = self.inner.write();
            inner.notifications.push(notification.clone());
        }
        self.emit(StoreEvent::NotificationAdded(notification));
    }

    pub fn remove_notification(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write();
        let before = inner.notifications.len();
        inner.notifications.retain(|n| n.id != id);
        inner.notifications.len() != before
    }

    pub fn clear_notifications(&self) {
        self.inner.write().notifications.clear();
    }

    /// Notifications in insertion order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.read().notifications.clone()
    }

    /// Drop notifications whose display window has passed. Returns how many
    /// were removed. Persistent notifications (duration 0) are kept.
    pub fn prune_expired_notifications(&self, now_ms: i64) -> usize {
        let mut inner = self.inner.write();
        let before = inner.notifications.len();
        inner.notifications.retain(|n| !n.is_expired(now_ms));
        before - inner.notifications.len()
    }

    // --- realtime mirror ---

    pub fn connection_status(&self) -> ConnectionStatus {
        self.inner.read().connection_status
    }

    pub fn set_connection_status(&self, status: ConnectionStatus) {
        let changed = {
            let mut inner = self.inner.write();
            let changed = inner.connection_status != status;
            inner.connection_status = status;
            changed
        };
        if changed {
            self.emit(StoreEvent::ConnectionChanged(status));
        }
    }

    pub fn last_update_ms(&self) -> Option<i64> {
        self.inner.read().last_update_ms
    }

    /// Record an inbound realtime update: timestamp plus a tag in the
    /// bounded debug ring.
    pub fn record_update(&self, tag: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.last_update_ms = Some(chrono::Utc::now().timestamp_millis());
        if inner.update_tags.len() == UPDATE_TAG_CAPACITY {
            inner.update_tags.pop_front();
        }
        inner.update_tags.push_back(tag.into());
    }

    /// Recent update tags, oldest first.
    pub fn recent_updates(&self) -> Vec<String> {
        self.inner.read().update_tags.iter().cloned().collect()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishdash_core::NotificationKind;

    #[test]
    fn test_defaults() {
        let store = AppStore::new();
        assert_eq!(store.connection_status(), ConnectionStatus::Disconnected);
        assert!(store.real_time_enabled());
        assert!(store.notifications().is_empty());
        assert!(store.last_update_ms().is_none());
    }

    #[test]
    fn test_notifications_keep_insertion_order() {
        let store = AppStore::new();
        store.add_notification(Notification::new(NotificationKind::Info, "first"));
        store.add_notification(Notification::new(NotificationKind::Error, "second"));

        let titles: Vec<_> = store
            .notifications()
            .iter()
            .map(|n| n.title.clone())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_remove_notification_by_id() {
        let store = AppStore::new();
        let keep = Notification::new(NotificationKind::Info, "keep");
        let drop = Notification::new(NotificationKind::Info, "drop");
        let drop_id = drop.id;
        store.add_notification(keep);
        store.add_notification(drop);

        assert!(store.remove_notification(drop_id));
        assert!(!store.remove_notification(drop_id));
        assert_eq!(store.notifications().len(), 1);
    }

    #[test]
    fn test_prune_keeps_persistent_notifications() {
        let store = AppStore::new();
        let transient = Notification::new(NotificationKind::Info, "transient");
        let now = transient.timestamp_ms;
        store.add_notification(transient);
        store.add_notification(
            Notification::new(NotificationKind::Error, "sticky").with_duration_ms(0),
        );

        let removed = store.prune_expired_notifications(now + 10_000);
        assert_eq!(removed, 1);
        assert_eq!(store.notifications()[0].title, "sticky");
    }

    #[test]
    fn test_toggle_real_time_flips_and_emits() {
        let store = AppStore::new();
        let mut events = store.subscribe();

        assert!(!store.toggle_real_time());
        assert!(!store.real_time_enabled());
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::RealTimeToggled(false)
        );

        assert!(store.toggle_real_time());
        assert_eq!(events.try_recv().unwrap(), StoreEvent::RealTimeToggled(true));
    }

    #[test]
    fn test_connection_status_emits_only_on_change() {
        let store = AppStore::new();
        let mut events = store.subscribe();

        store.set_connection_status(ConnectionStatus::Connected);
        store.set_connection_status(ConnectionStatus::Connected);
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::ConnectionChanged(ConnectionStatus::Connected)
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_update_tag_ring_is_bounded() {
        let store = AppStore::new();
        for i in 0..(UPDATE_TAG_CAPACITY + 5) {
            store.record_update(format!("update-{i}"));
        }
        let tags = store.recent_updates();
        assert_eq!(tags.len(), UPDATE_TAG_CAPACITY);
        assert_eq!(tags[0], "update-5");
        assert!(store.last_update_ms().is_some());
    }

    #[test]
    fn test_preference_setters_emit_changed() {
        let store = AppStore::new();
        let mut events = store.subscribe();

        store.set_theme(Theme::Dark);
        store.set_time_range(TimeRange::Week);
        assert_eq!(events.try_recv().unwrap(), StoreEvent::PreferencesChanged);
        assert_eq!(events.try_recv().unwrap(), StoreEvent::PreferencesChanged);

        let prefs = store.preferences();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.selected_time_range, TimeRange::Week);
    }

    #[test]
    fn test_persisted_preferences_survive_restart() {
        let dir = tempfile::tempdir().unwrap();

        let store = AppStore::with_persistence(dir.path());
        store.set_theme(Theme::Dark);
        store.toggle_real_time();
        drop(store);

        let reopened = AppStore::with_persistence(dir.path());
        let prefs = reopened.preferences();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(!prefs.real_time_enabled);
        // Session state did not persist.
        assert!(reopened.notifications().is_empty());
        assert_eq!(reopened.connection_status(), ConnectionStatus::Disconnected);
    }
}
