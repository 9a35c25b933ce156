//! Weather forecast domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily forecast for a coastal location. Measurements travel as
/// decimal strings on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub id: u64,
    pub forecast_date: String,
    pub location: String,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    /// Mean 2m air temperature, degrees Celsius.
    #[serde(rename = "temperature2mMean", with = "rust_decimal::serde::str")]
    pub temperature_mean: Decimal,
    /// Maximum 10m wind speed, km/h.
    #[serde(rename = "windSpeed10mMax", with = "rust_decimal::serde::str")]
    pub wind_speed_max: Decimal,
    /// Total precipitation, mm.
    #[serde(rename = "precipitationSum", with = "rust_decimal::serde::str")]
    pub precipitation_sum: Decimal,
    /// Mean 2m relative humidity, percent.
    #[serde(rename = "relativeHumidity2mMean", with = "rust_decimal::serde::str")]
    pub humidity_mean: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_forecast_decodes_wire_names() {
        let json = r#"{
            "id": 1,
            "forecastDate": "2026-08-23",
            "location": "Negombo",
            "temperature2mMean": "29.4",
            "windSpeed10mMax": "18.2",
            "precipitationSum": "3.5",
            "relativeHumidity2mMean": "81.0"
        }"#;
        let f: WeatherForecast = serde_json::from_str(json).unwrap();
        assert_eq!(f.location, "Negombo");
        assert_eq!(f.temperature_mean, dec!(29.4));
        assert_eq!(f.wind_speed_max, dec!(18.2));
    }
}
