//! Derived statistics over raw API arrays.
//!
//! Every function here is pure and total: empty input yields the documented
//! zero-default, never an error. Functions that classify a first-vs-last
//! trend compare records in input order — callers that want a chronological
//! trend must sort by date before calling (no sorting happens here).

pub mod pricing;
pub mod weather;

use serde::{Deserialize, Serialize};

pub use pricing::{average_confidence, price_stats, trend_by_fish, FishTrend, PriceStats};
pub use weather::{
    fishing_conditions, weather_alerts, weather_averages, weather_extremes, weather_patterns,
    weather_trends, AlertKind, FishingCondition, WeatherAlert, WeatherAverages, WeatherExtremes,
    WeatherTrends,
};

/// First-vs-last movement classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        };
        f.write_str(s)
    }
}

/// Round to 2 decimal places.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to 1 decimal place.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Lossy decimal-to-float conversion for display statistics.
pub(crate) fn dec_f64(d: rust_decimal::Decimal) -> f64 {
    d.to_string().parse::<f64>().unwrap_or(0.0)
}
