//! Persisted user preferences.
//!
//! A small subset of store state survives restarts: theme, dashboard
//! settings, and the realtime toggle. Saved as JSON under the fixed
//! namespace `fisheries-dashboard-store`. Notifications and connection
//! state are session-only and never written here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// File stem for the preferences file inside the state directory.
pub const STORE_NAMESPACE: &str = "fisheries-dashboard-store";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Dashboard lookback window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }
}

/// Inclusive price filter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10_000.0,
        }
    }
}

/// The persisted preference set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub selected_time_range: TimeRange,
    pub selected_location: String,
    pub real_time_enabled: bool,
    pub refresh_interval_ms: u64,
    pub confidence_threshold: f64,
    pub price_range: PriceRange,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            sidebar_collapsed: false,
            selected_time_range: TimeRange::default(),
            selected_location: "all".to_string(),
            real_time_enabled: true,
            refresh_interval_ms: 30_000,
            confidence_threshold: 0.7,
            price_range: PriceRange::default(),
        }
    }
}

/// Reads and writes the preferences file.
pub struct PreferencesFile {
    path: PathBuf,
}

impl PreferencesFile {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(format!("{STORE_NAMESPACE}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved preferences. A missing or corrupt file falls back to
    /// defaults; corruption is logged, never fatal.
    pub fn load(&self) -> Preferences {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(preferences) => preferences,
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "corrupt preferences file, using defaults");
                    Preferences::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read preferences, using defaults");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(preferences)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, Theme::System);
        assert!(!prefs.sidebar_collapsed);
        assert_eq!(prefs.selected_time_range, TimeRange::Month);
        assert_eq!(prefs.selected_location, "all");
        assert!(prefs.real_time_enabled);
        assert_eq!(prefs.refresh_interval_ms, 30_000);
        assert!((prefs.confidence_threshold - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_time_range_serializes_as_short_form() {
        assert_eq!(serde_json::to_string(&TimeRange::Week).unwrap(), "\"7d\"");
        assert_eq!(serde_json::to_string(&TimeRange::Year).unwrap(), "\"1y\"");
        let parsed: TimeRange = serde_json::from_str("\"90d\"").unwrap();
        assert_eq!(parsed, TimeRange::Quarter);
        assert_eq!(parsed.days(), 90);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file = PreferencesFile::new(dir.path());

        let mut prefs = Preferences::default();
        prefs.theme = Theme::Dark;
        prefs.selected_time_range = TimeRange::Week;
        prefs.real_time_enabled = false;
        file.save(&prefs).unwrap();

        assert_eq!(file.load(), prefs);
        assert!(file.path().ends_with("fisheries-dashboard-store.json"));
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = PreferencesFile::new(dir.path());
        assert_eq!(file.load(), Preferences::default());
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = PreferencesFile::new(dir.path());
        std::fs::write(file.path(), "{not valid json").unwrap();
        assert_eq!(file.load(), Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let file = PreferencesFile::new(dir.path());
        std::fs::write(file.path(), r#"{"theme": "dark"}"#).unwrap();
        let prefs = file.load();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.refresh_interval_ms, 30_000);
    }
}
