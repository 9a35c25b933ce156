//! Dashboard aggregate types returned by the stats endpoints.

use serde::{Deserialize, Serialize};

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub revenue_growth: f64,
    pub new_customers: u64,
    pub active_accounts: u64,
    pub active_accounts_growth: f64,
    pub ongoing_trucks: u32,
}

/// Month-over-month revenue comparison point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueData {
    pub month: String,
    pub current_year: f64,
    pub previous_year: f64,
}

/// Monthly fish sales point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishSalesData {
    pub month: String,
    pub sales: f64,
}
