//! Core domain types for the fisheries dashboard client.
//!
//! Everything here mirrors the backend wire format: camelCase JSON fields,
//! money and measurement values encoded as decimal strings, and a closed
//! tagged union for real-time push events.

pub mod content;
pub mod dashboard;
pub mod fleet;
pub mod notification;
pub mod order;
pub mod pricing;
pub mod types;
pub mod update;
pub mod weather;

pub use content::{BlogCategory, BlogPost, User};
pub use dashboard::{DashboardStats, FishSalesData, RevenueData};
pub use fleet::{Driver, Truck, TruckStatus};
pub use notification::{Notification, NotificationKind};
pub use order::{CreateOrderItem, CreateOrderRequest, Order, OrderItem, OrderStatus};
pub use pricing::{AddActualPriceRequest, FishType, MarketDemand, PricePrediction, PriceRecord};
pub use types::{ApiResponse, BlogParams, PageParams, Pagination, PriceHistoryParams, WeatherParams};
pub use update::{
    AlertLevel, ConnectionStatus, NewOrderPayload, OrderStatusPayload, PriceUpdatePayload,
    RealTimeUpdate, TruckStatusPayload, UpdateKind, WeatherUpdatePayload,
};
pub use weather::WeatherForecast;
