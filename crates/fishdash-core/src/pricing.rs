//! Fish type and pricing domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market demand classification for a price record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketDemand {
    Low,
    Medium,
    High,
}

/// A fish species sold through the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishType {
    pub id: u64,
    pub fish_name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub average_shelf_life_hours: Option<u32>,
    #[serde(default)]
    pub is_active: bool,
}

/// One observed (or backfilled) daily price for a fish type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub id: u64,
    pub fish_type_id: u64,
    pub price_date: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub retail_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub wholesale_price: Decimal,
    pub market_demand_level: MarketDemand,
    pub supply_availability: u32,
    #[serde(default)]
    pub is_actual: bool,
    #[serde(default)]
    pub fish_type: Option<FishType>,
}

/// A model-generated price prediction with a confidence score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePrediction {
    pub id: u64,
    pub fish_type_id: u64,
    pub prediction_date: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub retail_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub wholesale_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub confidence: Decimal,
    #[serde(default)]
    pub fish_type: Option<FishType>,
}

/// Request body for `POST /pricing/actual`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddActualPriceRequest {
    pub fish_type_id: u64,
    pub price_date: String,
    pub retail_price: f64,
    pub wholesale_price: f64,
    pub market_demand_level: MarketDemand,
    pub supply_availability: u32,
}
