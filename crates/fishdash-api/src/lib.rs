//! HTTP client for the fisheries management REST API.
//!
//! All endpoints live under `/api/v1` and wrap their payloads in the
//! standard response envelope. GETs are retried a bounded number of times on
//! transport and server errors; mutations are never retried here.

pub mod client;
pub mod error;

pub use client::{ApiClient, Page};
pub use error::{ApiError, ApiResult};
