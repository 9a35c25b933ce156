//! Application configuration.
//!
//! Loaded from a TOML file (`FISHDASH_CONFIG` or `config/default.toml`),
//! with `FISHDASH_API_URL` / `FISHDASH_WS_URL` environment overrides on top.

use crate::error::{AppError, AppResult};
use fishdash_realtime::RealtimeConfig;
use serde::Deserialize;
use std::path::Path;

/// Per-family cache stale times (ms). Mirrors how quickly each resource
/// actually changes: order flow in seconds, weather in hours.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaleTimes {
    pub dashboard_stats_ms: u64,
    pub revenue_ms: u64,
    pub fish_sales_ms: u64,
    pub pending_orders_ms: u64,
    pub transactions_ms: u64,
    pub pricing_ms: u64,
    pub users_ms: u64,
    pub blog_ms: u64,
    pub fish_types_ms: u64,
    pub weather_ms: u64,
}

impl Default for StaleTimes {
    fn default() -> Self {
        Self {
            dashboard_stats_ms: 30_000,
            revenue_ms: 300_000,
            fish_sales_ms: 300_000,
            pending_orders_ms: 15_000,
            transactions_ms: 120_000,
            pricing_ms: 120_000,
            users_ms: 300_000,
            blog_ms: 300_000,
            fish_types_ms: 600_000,
            weather_ms: 7_200_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default tracing filter directives. `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info,fishdash=debug".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the REST API.
    pub api_base_url: String,
    /// Directory for persisted preferences.
    pub state_dir: String,
    pub stale_times: StaleTimes,
    pub realtime: RealtimeConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            state_dir: ".fishdash".to_string(),
            stale_times: StaleTimes::default(),
            realtime: RealtimeConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Path of the config file, from `FISHDASH_CONFIG` or the default.
    pub fn path() -> String {
        std::env::var("FISHDASH_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string())
    }

    /// Load from [`AppConfig::path`], then apply environment overrides.
    /// A missing file means defaults; the second value reports whether the
    /// file was read, so the caller can log the fallback once the
    /// subscriber is up.
    pub fn load() -> AppResult<(Self, bool)> {
        let config_path = Self::path();
        let (mut config, found) = if Path::new(&config_path).exists() {
            (Self::from_file(&config_path)?, true)
        } else {
            (Self::default(), false)
        };
        config.apply_env();
        Ok((config, found))
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FISHDASH_API_URL") {
            self.api_base_url = url;
        }
        if let Ok(url) = std::env::var("FISHDASH_WS_URL") {
            self.realtime.url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.stale_times.pending_orders_ms, 15_000);
        assert_eq!(config.stale_times.weather_ms, 7_200_000);
        assert_eq!(config.realtime.max_reconnect_attempts, 5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            api_base_url = "https://api.example.lk"

            [stale_times]
            weather_ms = 60000

            [realtime]
            url = "wss://api.example.lk/ws"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.example.lk");
        assert_eq!(config.stale_times.weather_ms, 60_000);
        // Unspecified fields keep their defaults.
        assert_eq!(config.stale_times.pricing_ms, 120_000);
        assert_eq!(config.realtime.url, "wss://api.example.lk/ws");
        assert_eq!(config.realtime.heartbeat_interval_ms, 30_000);
        assert_eq!(config.telemetry.log_level, "info,fishdash=debug");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(&path, "state_dir = \"/var/lib/fishdash\"\n").unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.state_dir, "/var/lib/fishdash");

        assert!(AppConfig::from_file("/nonexistent/app.toml").is_err());
    }

    #[test]
    fn test_load_reports_whether_file_was_read() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("absent.toml");
        std::env::set_var("FISHDASH_CONFIG", &missing);
        let (config, found) = AppConfig::load().unwrap();
        assert!(!found);
        assert_eq!(config.api_base_url, "http://localhost:8000");

        let present = dir.path().join("app.toml");
        std::fs::write(&present, "api_base_url = \"https://api.example.lk\"\n").unwrap();
        std::env::set_var("FISHDASH_CONFIG", &present);
        let (config, found) = AppConfig::load().unwrap();
        assert!(found);
        assert_eq!(config.api_base_url, "https://api.example.lk");

        std::env::remove_var("FISHDASH_CONFIG");
    }
}
