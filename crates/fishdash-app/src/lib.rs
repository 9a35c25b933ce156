//! Application assembly: configuration, logging, the dashboard service
//! layer, and the run loop wiring cache, store, and realtime together.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use app::Application;
pub use config::{AppConfig, StaleTimes, TelemetryConfig};
pub use error::{AppError, AppResult};
pub use logging::init_logging;
pub use service::{DashboardService, PriceAnalysis, WeatherOverview};
