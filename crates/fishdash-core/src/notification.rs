//! Transient user-facing notifications.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display duration (ms).
pub const DEFAULT_DURATION_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient notification. Ids are generated, never reused; insertion
/// order defines display order. `duration_ms == 0` means persistent
/// (dismissed manually only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    pub timestamp_ms: i64,
    pub duration_ms: u64,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: None,
            timestamp_ms: Utc::now().timestamp_millis(),
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Whether this notification should be removed at `now_ms`.
    /// Persistent notifications (duration 0) never expire.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.duration_ms > 0 && now_ms >= self.timestamp_ms + self.duration_ms as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_within_one_tick() {
        // 100+ notifications in a tight loop must not collide even when the
        // millisecond clock does not advance between calls.
        let ids: HashSet<Uuid> = (0..200)
            .map(|_| Notification::new(NotificationKind::Info, "burst").id)
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_expiry() {
        let n = Notification::new(NotificationKind::Info, "t");
        assert!(!n.is_expired(n.timestamp_ms));
        assert!(!n.is_expired(n.timestamp_ms + 4_999));
        assert!(n.is_expired(n.timestamp_ms + 5_000));
    }

    #[test]
    fn test_persistent_never_expires() {
        let n = Notification::new(NotificationKind::Error, "t").with_duration_ms(0);
        assert!(!n.is_expired(n.timestamp_ms + i64::MAX / 2));
    }
}
