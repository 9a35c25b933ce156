//! Connection configuration and backoff policy.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// WebSocket URL of the push endpoint.
    pub url: String,
    /// Automatic reconnection attempts before giving up.
    pub max_reconnect_attempts: u32,
    /// Base delay for exponential backoff.
    pub reconnect_base_delay_ms: u64,
    /// Ceiling for the backoff delay.
    pub reconnect_max_delay_ms: u64,
    /// Heartbeat ping cadence while connected.
    pub heartbeat_interval_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8000/ws".to_string(),
            max_reconnect_attempts: 5,
            reconnect_base_delay_ms: 1_000,
            reconnect_max_delay_ms: 30_000,
            heartbeat_interval_ms: 30_000,
        }
    }
}

/// Delay before reconnect attempt number `attempts` (zero-based):
/// `min(base * 2^attempts, max)`.
pub fn backoff_delay(config: &RealtimeConfig, attempts: u32) -> Duration {
    let exponent = attempts.min(16);
    let delay = config
        .reconnect_base_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(config.reconnect_max_delay_ms);
    Duration::from_millis(delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.reconnect_base_delay_ms, 1_000);
        assert_eq!(config.reconnect_max_delay_ms, 30_000);
        assert_eq!(config.heartbeat_interval_ms, 30_000);
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let config = RealtimeConfig::default();
        let delays: Vec<u64> = (0..6)
            .map(|n| backoff_delay(&config, n).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 16_000, 30_000]);
        assert_eq!(backoff_delay(&config, 30), Duration::from_millis(30_000));
    }
}
