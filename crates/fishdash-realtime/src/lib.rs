//! WebSocket real-time update service.
//!
//! Maintains a single push connection to the backend:
//! - automatic reconnection with exponential backoff (bounded attempts)
//! - heartbeat ping while connected
//! - typed event dispatch into cache invalidations and notifications
//!
//! Connection status is mirrored into the app store; event dispatch happens
//! strictly in arrival order.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod service;

pub use config::{backoff_delay, RealtimeConfig};
pub use error::{RealtimeError, RealtimeResult};
pub use service::RealtimeService;

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
