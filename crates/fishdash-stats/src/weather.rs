//! Weather-derived statistics: alerts, averages, trends, and patterns.

use crate::{dec_f64, round1, Trend};
use fishdash_core::{AlertLevel, WeatherForecast};
use serde::{Deserialize, Serialize};

/// Wind speed thresholds (km/h).
const WIND_ALERT_KMH: f64 = 25.0;
const WIND_SEVERE_KMH: f64 = 35.0;
/// Precipitation thresholds (mm).
const RAIN_ALERT_MM: f64 = 50.0;
const RAIN_SEVERE_MM: f64 = 100.0;
/// Comfortable temperature band (deg C); alerts fire outside it.
const TEMP_LOW_C: f64 = 15.0;
const TEMP_HIGH_C: f64 = 35.0;
const TEMP_SEVERE_LOW_C: f64 = 10.0;
const TEMP_SEVERE_HIGH_C: f64 = 40.0;
/// A day counts as rainy above this precipitation (mm).
const RAINY_DAY_MM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Wind,
    Rain,
    Temperature,
}

/// One threshold breach on an upcoming forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub kind: AlertKind,
    pub severity: AlertLevel,
    pub message: String,
    pub location: String,
    pub date: String,
}

/// Evaluate alert thresholds over the first 3 forecast entries.
///
/// Each threshold is independent: one forecast day can produce up to three
/// alerts (wind, rain, temperature).
pub fn weather_alerts(forecasts: &[WeatherForecast]) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();

    for forecast in forecasts.iter().take(3) {
        let temp = dec_f64(forecast.temperature_mean);
        let wind = dec_f64(forecast.wind_speed_max);
        let precipitation = dec_f64(forecast.precipitation_sum);

        if wind > WIND_ALERT_KMH {
            alerts.push(WeatherAlert {
                kind: AlertKind::Wind,
                severity: if wind > WIND_SEVERE_KMH {
                    AlertLevel::Severe
                } else {
                    AlertLevel::Moderate
                },
                message: format!("High winds expected: {wind:.1} km/h"),
                location: forecast.location.clone(),
                date: forecast.forecast_date.clone(),
            });
        }

        if precipitation > RAIN_ALERT_MM {
            alerts.push(WeatherAlert {
                kind: AlertKind::Rain,
                severity: if precipitation > RAIN_SEVERE_MM {
                    AlertLevel::Severe
                } else {
                    AlertLevel::Moderate
                },
                message: format!("Heavy rainfall expected: {precipitation:.1} mm"),
                location: forecast.location.clone(),
                date: forecast.forecast_date.clone(),
            });
        }

        if temp > TEMP_HIGH_C || temp < TEMP_LOW_C {
            alerts.push(WeatherAlert {
                kind: AlertKind::Temperature,
                severity: if temp > TEMP_SEVERE_HIGH_C || temp < TEMP_SEVERE_LOW_C {
                    AlertLevel::Severe
                } else {
                    AlertLevel::Moderate
                },
                message: format!("Extreme temperature: {temp:.1}\u{b0}C"),
                location: forecast.location.clone(),
                date: forecast.forecast_date.clone(),
            });
        }
    }

    alerts
}

/// Mean temperature/wind/humidity and total precipitation, 1 decimal place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherAverages {
    pub avg_temperature: f64,
    pub avg_wind_speed: f64,
    pub avg_humidity: f64,
    pub total_precipitation: f64,
}

pub fn weather_averages(forecasts: &[WeatherForecast]) -> WeatherAverages {
    if forecasts.is_empty() {
        return WeatherAverages::default();
    }

    let n = forecasts.len() as f64;
    let temp: f64 = forecasts.iter().map(|f| dec_f64(f.temperature_mean)).sum();
    let wind: f64 = forecasts.iter().map(|f| dec_f64(f.wind_speed_max)).sum();
    let humidity: f64 = forecasts.iter().map(|f| dec_f64(f.humidity_mean)).sum();
    let precipitation: f64 = forecasts.iter().map(|f| dec_f64(f.precipitation_sum)).sum();

    WeatherAverages {
        avg_temperature: round1(temp / n),
        avg_wind_speed: round1(wind / n),
        avg_humidity: round1(humidity / n),
        total_precipitation: round1(precipitation),
    }
}

/// First-vs-last movement per measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherTrends {
    pub temperature: Trend,
    pub wind: Trend,
    pub precipitation: Trend,
}

impl Default for WeatherTrends {
    fn default() -> Self {
        Self {
            temperature: Trend::Stable,
            wind: Trend::Stable,
            precipitation: Trend::Stable,
        }
    }
}

fn delta_trend(delta: f64, threshold: f64) -> Trend {
    if delta > threshold {
        Trend::Increasing
    } else if delta < -threshold {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Classify first-vs-last deltas in input order. Thresholds: 2 deg C,
/// 5 km/h wind, 10 mm precipitation. Fewer than two entries is all-stable.
pub fn weather_trends(forecasts: &[WeatherForecast]) -> WeatherTrends {
    if forecasts.len() < 2 {
        return WeatherTrends::default();
    }

    let first = &forecasts[0];
    let last = &forecasts[forecasts.len() - 1];

    WeatherTrends {
        temperature: delta_trend(
            dec_f64(last.temperature_mean) - dec_f64(first.temperature_mean),
            2.0,
        ),
        wind: delta_trend(dec_f64(last.wind_speed_max) - dec_f64(first.wind_speed_max), 5.0),
        precipitation: delta_trend(
            dec_f64(last.precipitation_sum) - dec_f64(first.precipitation_sum),
            10.0,
        ),
    }
}

/// Min/max extraction across the forecast window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherExtremes {
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub max_wind_speed: f64,
    pub max_precipitation: f64,
}

pub fn weather_extremes(forecasts: &[WeatherForecast]) -> Option<WeatherExtremes> {
    if forecasts.is_empty() {
        return None;
    }

    let temps: Vec<f64> = forecasts.iter().map(|f| dec_f64(f.temperature_mean)).collect();
    let winds: Vec<f64> = forecasts.iter().map(|f| dec_f64(f.wind_speed_max)).collect();
    let rains: Vec<f64> = forecasts.iter().map(|f| dec_f64(f.precipitation_sum)).collect();

    let fold_max = |v: &[f64]| v.iter().copied().fold(f64::MIN, f64::max);
    let fold_min = |v: &[f64]| v.iter().copied().fold(f64::MAX, f64::min);

    Some(WeatherExtremes {
        max_temperature: fold_max(&temps),
        min_temperature: fold_min(&temps),
        max_wind_speed: fold_max(&winds),
        max_precipitation: fold_max(&rains),
    })
}

/// Identify simple multi-day patterns: consecutive rainy streaks (>= 3 days
/// above 5 mm) and a wide temperature range (> 10 deg C).
pub fn weather_patterns(forecasts: &[WeatherForecast]) -> Vec<String> {
    let mut patterns = Vec::new();

    let mut streak = 0usize;
    let mut max_streak = 0usize;
    for forecast in forecasts {
        if dec_f64(forecast.precipitation_sum) > RAINY_DAY_MM {
            streak += 1;
            max_streak = max_streak.max(streak);
        } else {
            streak = 0;
        }
    }
    if max_streak >= 3 {
        patterns.push(format!("{max_streak} consecutive rainy days expected"));
    }

    if let Some(extremes) = weather_extremes(forecasts) {
        let range = extremes.max_temperature - extremes.min_temperature;
        if range > 10.0 {
            patterns.push(format!(
                "Large temperature variation: {range:.1}\u{b0}C range"
            ));
        }
    }

    patterns
}

/// Fishing condition classification for a location summary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FishingCondition {
    Good,
    Fair,
    Poor,
}

pub fn fishing_conditions(forecast: &WeatherForecast) -> FishingCondition {
    let wind = dec_f64(forecast.wind_speed_max);
    let precipitation = dec_f64(forecast.precipitation_sum);

    if wind > 25.0 || precipitation > 30.0 {
        FishingCondition::Poor
    } else if wind > 15.0 || precipitation > 10.0 {
        FishingCondition::Fair
    } else {
        FishingCondition::Good
    }
}
