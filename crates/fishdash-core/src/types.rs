//! REST envelope and query parameter types.

use serde::{Deserialize, Serialize};

/// Standard response wrapper used by every REST endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

/// Page/limit query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Query parameters for price history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceHistoryParams {
    /// Restrict to a single fish type. None fetches all types.
    pub fish_type_id: Option<u64>,
    /// Lookback window in days. None uses the server default (30).
    pub days: Option<u32>,
}

/// Query parameters for weather forecasts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherParams {
    pub location: Option<String>,
    /// Forecast horizon in days. None uses the server default (7).
    pub days: Option<u32>,
}

/// Query parameters for blog listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogParams {
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_roundtrip() {
        let json = r#"{
            "success": true,
            "data": [1, 2, 3],
            "pagination": {"page": 1, "limit": 10, "total": 3, "pages": 1}
        }"#;
        let resp: ApiResponse<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data, vec![1, 2, 3]);
        assert_eq!(resp.pagination.unwrap().total, 3);
        assert!(resp.message.is_none());
    }

    #[test]
    fn test_envelope_with_errors() {
        let json = r#"{"success": false, "data": null, "errors": ["bad input"]}"#;
        let resp: ApiResponse<Option<u32>> = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.errors.unwrap(), vec!["bad input".to_string()]);
    }
}
