//! Typed query and mutation layer over the cache.
//!
//! Every read routes through [`QueryCache::fetch`] with the configured
//! stale time, so repeated calls within the window hit the cache and
//! realtime invalidations refresh entries in the background. Mutations go
//! straight to the API and then invalidate the families they touched.
//!
//! [`QueryCache::fetch`]: fishdash_cache::QueryCache::fetch

use crate::config::StaleTimes;
use crate::error::{AppError, AppResult};
use fishdash_api::{ApiClient, ApiResult, Page};
use fishdash_cache::{
    CacheError, FetchFuture, QueryCache, QueryFetcher, QueryKey, ResourceFamily,
};
use fishdash_core::{
    AddActualPriceRequest, BlogParams, BlogPost, CreateOrderRequest, DashboardStats, FishSalesData,
    FishType, Notification, NotificationKind, Order, OrderStatus, PageParams, PriceHistoryParams,
    PricePrediction, PriceRecord, RevenueData, Truck, User, WeatherForecast, WeatherParams,
};
use fishdash_stats::{
    price_stats, trend_by_fish, weather_alerts, weather_averages, weather_extremes,
    weather_patterns, weather_trends, FishTrend, PriceStats, WeatherAlert, WeatherAverages,
    WeatherExtremes, WeatherTrends,
};
use fishdash_store::AppStore;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Price history plus the derived statistics the analysis views need.
#[derive(Debug, Clone)]
pub struct PriceAnalysis {
    /// Records sorted by price date.
    pub records: Vec<PriceRecord>,
    pub stats: PriceStats,
    pub by_fish: Vec<FishTrend>,
}

/// Forecasts plus every derived weather summary.
#[derive(Debug, Clone)]
pub struct WeatherOverview {
    pub forecasts: Vec<WeatherForecast>,
    pub alerts: Vec<WeatherAlert>,
    pub averages: WeatherAverages,
    pub trends: WeatherTrends,
    pub extremes: Option<WeatherExtremes>,
    pub patterns: Vec<String>,
}

/// The dashboard's data access layer.
#[derive(Clone)]
pub struct DashboardService {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    store: AppStore,
    stale: StaleTimes,
}

/// Wrap an API call as a stored cache fetcher.
fn fetcher<T, Fut>(
    api: Arc<ApiClient>,
    call: impl Fn(Arc<ApiClient>) -> Fut + Send + Sync + 'static,
) -> QueryFetcher
where
    T: Serialize,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    Arc::new(move || {
        let fut = call(api.clone());
        let boxed: FetchFuture = Box::pin(async move {
            let value = fut.await.map_err(|e| CacheError::Fetch(e.to_string()))?;
            serde_json::to_value(value).map_err(CacheError::Decode)
        });
        boxed
    })
}

fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_string().parse::<f64>().unwrap_or(0.0)
}

/// Keep only predictions at or above the confidence threshold.
fn filter_by_confidence(
    predictions: Vec<PricePrediction>,
    threshold: f64,
) -> Vec<PricePrediction> {
    predictions
        .into_iter()
        .filter(|p| decimal_to_f64(p.confidence) >= threshold)
        .collect()
}

impl DashboardService {
    pub fn new(
        api: Arc<ApiClient>,
        cache: Arc<QueryCache>,
        store: AppStore,
        stale: StaleTimes,
    ) -> Self {
        Self {
            api,
            cache,
            store,
            stale,
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        key: QueryKey,
        stale_time_ms: u64,
        fetcher: QueryFetcher,
    ) -> AppResult<T> {
        let value = self.cache.fetch(key, stale_time_ms, fetcher).await?;
        serde_json::from_value(value).map_err(|e| AppError::Cache(CacheError::Decode(e)))
    }

    // --- dashboard queries ---

    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        self.query(
            QueryKey::new(ResourceFamily::Dashboard, ["stats"]),
            self.stale.dashboard_stats_ms,
            fetcher(self.api.clone(), |api| async move {
                api.dashboard_stats().await
            }),
        )
        .await
    }

    pub async fn revenue_data(&self) -> AppResult<Vec<RevenueData>> {
        self.query(
            QueryKey::new(ResourceFamily::Dashboard, ["revenue"]),
            self.stale.revenue_ms,
            fetcher(self.api.clone(), |api| async move {
                api.revenue_data().await
            }),
        )
        .await
    }

    pub async fn truck_locations(&self) -> AppResult<Vec<Truck>> {
        self.query(
            QueryKey::new(ResourceFamily::Dashboard, ["trucks"]),
            self.stale.dashboard_stats_ms,
            fetcher(self.api.clone(), |api| async move {
                api.truck_locations().await
            }),
        )
        .await
    }

    pub async fn fish_sales(&self) -> AppResult<Vec<FishSalesData>> {
        self.query(
            QueryKey::new(ResourceFamily::Dashboard, ["fish-sales"]),
            self.stale.fish_sales_ms,
            fetcher(self.api.clone(), |api| async move { api.fish_sales().await }),
        )
        .await
    }

    // --- order queries ---

    pub async fn pending_orders(&self, params: PageParams) -> AppResult<Page<Order>> {
        self.query(
            QueryKey::new(
                ResourceFamily::Orders,
                [
                    "pending".to_string(),
                    params.page.to_string(),
                    params.limit.to_string(),
                ],
            ),
            self.stale.pending_orders_ms,
            fetcher(self.api.clone(), move |api| async move {
                api.pending_orders(params).await
            }),
        )
        .await
    }

    pub async fn latest_transactions(&self, params: PageParams) -> AppResult<Page<Order>> {
        self.query(
            QueryKey::new(
                ResourceFamily::Orders,
                [
                    "transactions".to_string(),
                    params.page.to_string(),
                    params.limit.to_string(),
                ],
            ),
            self.stale.transactions_ms,
            fetcher(self.api.clone(), move |api| async move {
                api.latest_transactions(params).await
            }),
        )
        .await
    }

    pub async fn order(&self, id: u64) -> AppResult<Order> {
        self.query(
            order_detail_key(id),
            self.stale.transactions_ms,
            fetcher(self.api.clone(), move |api| async move {
                api.order(id).await
            }),
        )
        .await
    }

    // --- pricing queries ---

    pub async fn price_history(&self, params: PriceHistoryParams) -> AppResult<Vec<PriceRecord>> {
        let mut segments = vec!["history".to_string()];
        if let Some(id) = params.fish_type_id {
            segments.push(format!("fish={id}"));
        }
        if let Some(days) = params.days {
            segments.push(format!("days={days}"));
        }
        self.query(
            QueryKey::new(ResourceFamily::Pricing, segments),
            self.stale.pricing_ms,
            fetcher(self.api.clone(), move |api| async move {
                api.price_history(params).await
            }),
        )
        .await
    }

    /// Current predictions, filtered by the store's confidence threshold.
    /// The unfiltered list stays in the cache so a threshold change does not
    /// refetch.
    pub async fn predictions(&self, fish_type_id: Option<u64>) -> AppResult<Vec<PricePrediction>> {
        let mut segments = vec!["current".to_string()];
        if let Some(id) = fish_type_id {
            segments.push(format!("fish={id}"));
        }
        let all: Vec<PricePrediction> = self
            .query(
                QueryKey::new(ResourceFamily::Pricing, segments),
                self.stale.pricing_ms,
                fetcher(self.api.clone(), move |api| async move {
                    api.current_prices(fish_type_id).await
                }),
            )
            .await?;
        let threshold = self.store.preferences().confidence_threshold;
        Ok(filter_by_confidence(all, threshold))
    }

    /// Price history sorted by date, with summary and per-fish statistics.
    pub async fn price_analysis(&self, params: PriceHistoryParams) -> AppResult<PriceAnalysis> {
        let mut records = self.price_history(params).await?;
        records.sort_by(|a, b| a.price_date.cmp(&b.price_date));
        let stats = price_stats(&records);
        let by_fish = trend_by_fish(&records);
        Ok(PriceAnalysis {
            records,
            stats,
            by_fish,
        })
    }

    // --- user and content queries ---

    pub async fn users(&self, params: PageParams) -> AppResult<Page<User>> {
        self.query(
            QueryKey::new(
                ResourceFamily::Users,
                [params.page.to_string(), params.limit.to_string()],
            ),
            self.stale.users_ms,
            fetcher(self.api.clone(), move |api| async move {
                api.users(params).await
            }),
        )
        .await
    }

    pub async fn user(&self, id: u64) -> AppResult<User> {
        self.query(
            QueryKey::new(ResourceFamily::Users, [id.to_string()]),
            self.stale.users_ms,
            fetcher(self.api.clone(), move |api| async move { api.user(id).await }),
        )
        .await
    }

    pub async fn blog_posts(&self, params: &BlogParams) -> AppResult<Page<BlogPost>> {
        let mut segments = Vec::new();
        if let Some(category) = &params.category {
            segments.push(format!("category={category}"));
        }
        if let Some(page) = params.page {
            segments.push(format!("page={page}"));
        }
        if let Some(limit) = params.limit {
            segments.push(format!("limit={limit}"));
        }
        let params = params.clone();
        self.query(
            QueryKey::new(ResourceFamily::Blog, segments),
            self.stale.blog_ms,
            fetcher(self.api.clone(), move |api| {
                let params = params.clone();
                async move { api.blog_posts(&params).await }
            }),
        )
        .await
    }

    pub async fn blog_post(&self, slug: &str) -> AppResult<BlogPost> {
        let slug = slug.to_string();
        self.query(
            QueryKey::new(ResourceFamily::Blog, [slug.clone()]),
            self.stale.blog_ms,
            fetcher(self.api.clone(), move |api| {
                let slug = slug.clone();
                async move { api.blog_post(&slug).await }
            }),
        )
        .await
    }

    pub async fn fish_types(&self) -> AppResult<Vec<FishType>> {
        self.query(
            QueryKey::of(ResourceFamily::FishTypes),
            self.stale.fish_types_ms,
            fetcher(self.api.clone(), |api| async move { api.fish_types().await }),
        )
        .await
    }

    // --- weather queries ---

    pub async fn weather_forecasts(
        &self,
        params: &WeatherParams,
    ) -> AppResult<Vec<WeatherForecast>> {
        let mut segments = Vec::new();
        if let Some(location) = &params.location {
            segments.push(format!("location={location}"));
        }
        if let Some(days) = params.days {
            segments.push(format!("days={days}"));
        }
        let params = params.clone();
        self.query(
            QueryKey::new(ResourceFamily::Weather, segments),
            self.stale.weather_ms,
            fetcher(self.api.clone(), move |api| {
                let params = params.clone();
                async move { api.weather_forecasts(&params).await }
            }),
        )
        .await
    }

    /// Forecasts plus alerts, averages, trends, extremes, and patterns.
    pub async fn weather_overview(&self, params: &WeatherParams) -> AppResult<WeatherOverview> {
        let forecasts = self.weather_forecasts(params).await?;
        Ok(WeatherOverview {
            alerts: weather_alerts(&forecasts),
            averages: weather_averages(&forecasts),
            trends: weather_trends(&forecasts),
            extremes: weather_extremes(&forecasts),
            patterns: weather_patterns(&forecasts),
            forecasts,
        })
    }

    // --- mutations ---

    /// Create an order. Success invalidates orders and dashboard data and
    /// notifies; failure notifies and propagates the error.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> AppResult<Order> {
        match self.api.create_order(request).await {
            Ok(order) => {
                info!(order_id = order.id, "order created");
                self.cache.invalidate(ResourceFamily::Orders);
                self.cache.invalidate(ResourceFamily::Dashboard);
                self.store.add_notification(
                    Notification::new(NotificationKind::Success, "Order Created")
                        .with_message(format!("Order #{} created", order.id)),
                );
                Ok(order)
            }
            Err(err) => {
                self.store.add_notification(
                    Notification::new(NotificationKind::Error, "Order Failed")
                        .with_message(err.to_string()),
                );
                Err(err.into())
            }
        }
    }

    /// Record an actual market price and refresh pricing data.
    pub async fn add_actual_price(&self, request: &AddActualPriceRequest) -> AppResult<PriceRecord> {
        let record = self.api.add_actual_price(request).await?;
        self.cache.invalidate(ResourceFamily::Pricing);
        Ok(record)
    }

    /// Trigger a server-side weather refresh and drop cached forecasts.
    pub async fn refresh_weather(&self) -> AppResult<Vec<WeatherForecast>> {
        let forecasts = self.api.refresh_weather().await?;
        self.cache.invalidate(ResourceFamily::Weather);
        Ok(forecasts)
    }

    /// Change an order's status with an optimistic cache write: the cached
    /// order detail shows the new status immediately; a failed request
    /// restores the snapshot exactly and notifies. Either way the entry
    /// settles against the server with a background refetch.
    pub async fn update_order_status(&self, id: u64, status: OrderStatus) -> AppResult<Order> {
        let key = order_detail_key(id);
        let snapshot = self.cache.get(&key).and_then(|cached| {
            let predicted = predict_order_status(cached.value, status)?;
            self.cache.optimistic_update(&key, predicted)
        });

        match self.api.update_order_status(id, status).await {
            Ok(order) => {
                self.cache.settle(&key);
                self.cache.invalidate(ResourceFamily::Orders);
                self.cache.invalidate(ResourceFamily::Dashboard);
                Ok(order)
            }
            Err(err) => {
                if let Some(snapshot) = snapshot {
                    self.cache.rollback(snapshot);
                }
                self.cache.settle(&key);
                self.cache.invalidate(ResourceFamily::Orders);
                self.store.add_notification(
                    Notification::new(NotificationKind::Error, "Order Update Failed")
                        .with_message(err.to_string()),
                );
                Err(err.into())
            }
        }
    }
}

fn order_detail_key(id: u64) -> QueryKey {
    QueryKey::new(ResourceFamily::Orders, ["detail".to_string(), id.to_string()])
}

/// Build the predicted cached value for an order status change. None when
/// the cached value does not decode as an order.
fn predict_order_status(value: serde_json::Value, status: OrderStatus) -> Option<serde_json::Value> {
    let mut order: Order = serde_json::from_value(value).ok()?;
    order.status = status;
    serde_json::to_value(order).ok()
}
