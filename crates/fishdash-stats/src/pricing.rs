//! Price statistics: averages, variability, and trend classification.

use crate::{dec_f64, round2, Trend};
use fishdash_core::{PricePrediction, PriceRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics over a list of price records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    /// Mean retail price, 2 decimal places.
    pub average_retail_price: f64,
    /// Mean wholesale price, 2 decimal places.
    pub average_wholesale_price: f64,
    /// Coefficient of variation of the retail price as a percentage
    /// (stddev / mean x 100), 2 decimal places. 0 for a single record.
    pub price_variability: f64,
    /// First-vs-last classification in input order.
    pub trend: Trend,
}

impl Default for PriceStats {
    fn default() -> Self {
        Self {
            average_retail_price: 0.0,
            average_wholesale_price: 0.0,
            price_variability: 0.0,
            trend: Trend::Stable,
        }
    }
}

/// Compute price statistics over records in input order.
///
/// The trend compares the first and last records as given: increasing when
/// `last >= first * 1.05`, decreasing when `last <= first * 0.95`, stable
/// otherwise. Sort by price date first if you want a chronological trend.
pub fn price_stats(records: &[PriceRecord]) -> PriceStats {
    if records.is_empty() {
        return PriceStats::default();
    }

    let retail: Vec<f64> = records.iter().map(|r| dec_f64(r.retail_price)).collect();
    let wholesale: Vec<f64> = records.iter().map(|r| dec_f64(r.wholesale_price)).collect();

    let n = retail.len() as f64;
    let avg_retail = retail.iter().sum::<f64>() / n;
    let avg_wholesale = wholesale.iter().sum::<f64>() / n;

    // Population standard deviation of the retail series.
    let variance = retail
        .iter()
        .map(|p| (p - avg_retail).powi(2))
        .sum::<f64>()
        / n;
    let variability = if avg_retail == 0.0 {
        0.0
    } else {
        variance.sqrt() / avg_retail * 100.0
    };

    let first = retail[0];
    let last = retail[retail.len() - 1];
    let trend = if last >= first * 1.05 {
        Trend::Increasing
    } else if last <= first * 0.95 {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    PriceStats {
        average_retail_price: round2(avg_retail),
        average_wholesale_price: round2(avg_wholesale),
        price_variability: round2(variability),
        trend,
    }
}

/// Mean prediction confidence, 2 decimal places. 0 for empty input.
pub fn average_confidence(predictions: &[PricePrediction]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let total: f64 = predictions.iter().map(|p| dec_f64(p.confidence)).sum();
    round2(total / predictions.len() as f64)
}

/// Per-fish-type trend row for the analysis table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishTrend {
    pub fish_type_id: u64,
    pub fish_name: String,
    pub stats: PriceStats,
    pub data_points: usize,
    pub latest_price: f64,
    pub oldest_price: f64,
}

/// Group records by fish type, sort each group chronologically, and compute
/// per-fish statistics. Output is ordered by fish type id.
pub fn trend_by_fish(records: &[PriceRecord]) -> Vec<FishTrend> {
    let mut groups: BTreeMap<u64, Vec<&PriceRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.fish_type_id).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(fish_type_id, mut group)| {
            // ISO dates sort correctly as strings.
            group.sort_by(|a, b| a.price_date.cmp(&b.price_date));
            let sorted: Vec<PriceRecord> = group.iter().map(|r| (*r).clone()).collect();
            let fish_name = sorted
                .iter()
                .find_map(|r| r.fish_type.as_ref().map(|f| f.fish_name.clone()))
                .unwrap_or_else(|| "Unknown".to_string());
            let stats = price_stats(&sorted);
            FishTrend {
                fish_type_id,
                fish_name,
                data_points: sorted.len(),
                latest_price: dec_f64(sorted[sorted.len() - 1].retail_price),
                oldest_price: dec_f64(sorted[0].retail_price),
                stats,
            }
        })
        .collect()
}
