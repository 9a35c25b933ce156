//! The REST client.

use crate::error::{ApiError, ApiResult};
use fishdash_core::{
    AddActualPriceRequest, ApiResponse, BlogParams, BlogPost, CreateOrderRequest, DashboardStats,
    FishSalesData, FishType, Order, PageParams, Pagination, PriceHistoryParams, PricePrediction,
    PriceRecord, RevenueData, Truck, User, WeatherForecast, WeatherParams,
};
use fishdash_core::OrderStatus;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry budget for idempotent GETs.
const MAX_GET_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 1_000;
const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

/// Client for the fisheries management REST API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against `base_url` (e.g. "http://localhost:8000").
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn retry_delay(attempt: u32) -> Duration {
        let exp = RETRY_BASE_DELAY_MS.saturating_mul(1u64 << attempt.min(16));
        Duration::from_millis(exp.min(RETRY_MAX_DELAY_MS))
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<(T, Option<Pagination>)> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode_envelope(response).await
    }

    /// GET with bounded retry on transport and 5xx errors. 4xx responses and
    /// malformed bodies fail immediately.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<(T, Option<Pagination>)> {
        let mut attempt = 0;
        loop {
            match self.get_once(path, query).await {
                Ok(result) => return Ok(result),
                Err(err) if attempt < MAX_GET_RETRIES && err.is_retryable() => {
                    let delay = Self::retry_delay(attempt);
                    warn!(path, attempt, delay_ms = delay.as_millis() as u64, error = %err, "GET failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// POST a JSON body. Never retried: the caller owns mutation retry policy.
    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let (data, _) = decode_envelope(response).await?;
        Ok(data)
    }

    // --- dashboard ---

    pub async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        Ok(self.get("/dashboard/stats", &[]).await?.0)
    }

    pub async fn revenue_data(&self) -> ApiResult<Vec<RevenueData>> {
        Ok(self.get("/dashboard/revenue", &[]).await?.0)
    }

    pub async fn truck_locations(&self) -> ApiResult<Vec<Truck>> {
        Ok(self.get("/dashboard/trucks", &[]).await?.0)
    }

    pub async fn fish_sales(&self) -> ApiResult<Vec<FishSalesData>> {
        Ok(self.get("/dashboard/fish-sales", &[]).await?.0)
    }

    // --- orders ---

    pub async fn pending_orders(&self, params: PageParams) -> ApiResult<Page<Order>> {
        let query = page_query(params);
        let (items, pagination) = self.get("/orders/pending", &query).await?;
        Ok(Page { items, pagination })
    }

    pub async fn latest_transactions(&self, params: PageParams) -> ApiResult<Page<Order>> {
        let query = page_query(params);
        let (items, pagination) = self.get("/orders/transactions/latest", &query).await?;
        Ok(Page { items, pagination })
    }

    pub async fn order(&self, id: u64) -> ApiResult<Order> {
        Ok(self.get(&format!("/orders/{id}"), &[]).await?.0)
    }

    pub async fn create_order(&self, request: &CreateOrderRequest) -> ApiResult<Order> {
        debug!(items = request.order_items.len(), "creating order");
        self.post("/orders", request).await
    }

    pub async fn update_order_status(&self, id: u64, status: OrderStatus) -> ApiResult<Order> {
        self.post(
            &format!("/orders/{id}/status"),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    // --- pricing ---

    pub async fn price_history(&self, params: PriceHistoryParams) -> ApiResult<Vec<PriceRecord>> {
        let mut query = Vec::new();
        if let Some(id) = params.fish_type_id {
            query.push(("fishTypeId", id.to_string()));
        }
        if let Some(days) = params.days {
            query.push(("days", days.to_string()));
        }
        Ok(self.get("/pricing/history", &query).await?.0)
    }

    pub async fn current_prices(
        &self,
        fish_type_id: Option<u64>,
    ) -> ApiResult<Vec<PricePrediction>> {
        let mut query = Vec::new();
        if let Some(id) = fish_type_id {
            query.push(("fishTypeId", id.to_string()));
        }
        Ok(self.get("/pricing/current", &query).await?.0)
    }

    pub async fn add_actual_price(
        &self,
        request: &AddActualPriceRequest,
    ) -> ApiResult<PriceRecord> {
        self.post("/pricing/actual", request).await
    }

    // --- users ---

    pub async fn users(&self, params: PageParams) -> ApiResult<Page<User>> {
        let query = page_query(params);
        let (items, pagination) = self.get("/users", &query).await?;
        Ok(Page { items, pagination })
    }

    pub async fn user(&self, id: u64) -> ApiResult<User> {
        Ok(self.get(&format!("/users/{id}"), &[]).await?.0)
    }

    // --- blog ---

    pub async fn blog_posts(&self, params: &BlogParams) -> ApiResult<Page<BlogPost>> {
        let mut query = Vec::new();
        if let Some(category) = &params.category {
            query.push(("category", category.clone()));
        }
        if let Some(page) = params.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        let (items, pagination) = self.get("/blog", &query).await?;
        Ok(Page { items, pagination })
    }

    pub async fn blog_post(&self, slug: &str) -> ApiResult<BlogPost> {
        Ok(self.get(&format!("/blog/{slug}"), &[]).await?.0)
    }

    // --- fish types ---

    pub async fn fish_types(&self) -> ApiResult<Vec<FishType>> {
        Ok(self.get("/fish-types", &[]).await?.0)
    }

    // --- weather ---

    pub async fn weather_forecasts(
        &self,
        params: &WeatherParams,
    ) -> ApiResult<Vec<WeatherForecast>> {
        let mut query = Vec::new();
        if let Some(location) = &params.location {
            query.push(("location", location.clone()));
        }
        if let Some(days) = params.days {
            query.push(("days", days.to_string()));
        }
        Ok(self.get("/weather/forecasts", &query).await?.0)
    }

    /// Ask the server to pull fresh forecasts from its upstream provider.
    pub async fn refresh_weather(&self) -> ApiResult<Vec<WeatherForecast>> {
        self.post("/weather/refresh", &serde_json::json!({})).await
    }

    // --- system ---

    pub async fn health(&self) -> ApiResult<serde_json::Value> {
        Ok(self.get("/health", &[]).await?.0)
    }
}

fn page_query(params: PageParams) -> Vec<(&'static str, String)> {
    vec![
        ("page", params.page.to_string()),
        ("limit", params.limit.to_string()),
    ]
}

async fn decode_envelope<T: DeserializeOwned>(
    response: Response,
) -> ApiResult<(T, Option<Pagination>)> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    unwrap_envelope(body)
}

/// Unpack the `{ success, data, message, errors, pagination }` envelope.
fn unwrap_envelope<T: DeserializeOwned>(
    body: serde_json::Value,
) -> ApiResult<(T, Option<Pagination>)> {
    let envelope: ApiResponse<serde_json::Value> =
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    if !envelope.success {
        let detail = envelope
            .message
            .or_else(|| envelope.errors.map(|errors| errors.join("; ")))
            .unwrap_or_else(|| "request failed".to_string());
        return Err(ApiError::Api(detail));
    }

    let data = serde_json::from_value(envelope.data).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok((data, envelope.pagination))
}
