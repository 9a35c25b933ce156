//! Typed event dispatch: one inbound update becomes cache invalidations
//! plus, for the noteworthy ones, a user notification.

use fishdash_cache::{QueryCache, ResourceFamily};
use fishdash_core::{AlertLevel, Notification, NotificationKind, RealTimeUpdate, UpdateKind};
use fishdash_store::AppStore;
use std::sync::Arc;
use tracing::debug;

/// Price changes at or below this magnitude (percent) are not surfaced.
const PRICE_ALERT_THRESHOLD_PCT: f64 = 5.0;

/// Duration for severe weather notifications.
const WEATHER_ALERT_DURATION_MS: u64 = 10_000;

/// Apply one update: invalidations first (synchronously marked), then the
/// notification. Callers must invoke this in frame arrival order.
pub fn dispatch_update(update: &RealTimeUpdate, cache: &Arc<QueryCache>, store: &AppStore) {
    debug!(tag = %update.tag(), "dispatching realtime update");
    match &update.kind {
        UpdateKind::OrderStatusChanged(payload) => {
            cache.invalidate(ResourceFamily::Orders);
            cache.invalidate(ResourceFamily::Dashboard);
            store.add_notification(
                Notification::new(NotificationKind::Info, "Order Update").with_message(format!(
                    "Order #{} is now {}",
                    payload.order_id, payload.status
                )),
            );
        }
        UpdateKind::NewOrder(payload) => {
            cache.invalidate(ResourceFamily::Orders);
            cache.invalidate(ResourceFamily::Dashboard);
            store.add_notification(
                Notification::new(NotificationKind::Success, "New Order").with_message(format!(
                    "Order #{} received - Total: LKR {:.2}",
                    payload.order_id, payload.total_amount
                )),
            );
        }
        UpdateKind::PriceUpdated(payload) => {
            cache.invalidate(ResourceFamily::Pricing);
            if payload.price_change.abs() > PRICE_ALERT_THRESHOLD_PCT {
                store.add_notification(
                    Notification::new(NotificationKind::Warning, "Price Alert").with_message(
                        format!(
                            "{} price changed by {:+.1}%",
                            payload.fish_name, payload.price_change
                        ),
                    ),
                );
            }
        }
        UpdateKind::TruckStatusChanged(payload) => {
            cache.invalidate(ResourceFamily::Dashboard);
            store.add_notification(
                Notification::new(NotificationKind::Info, "Fleet Update").with_message(format!(
                    "Truck {} is now {}",
                    payload.license_plate, payload.status
                )),
            );
        }
        UpdateKind::WeatherUpdated(payload) => {
            cache.invalidate(ResourceFamily::Weather);
            if payload.alert_level == AlertLevel::Severe {
                store.add_notification(
                    Notification::new(NotificationKind::Warning, "Severe Weather Alert")
                        .with_message(format!("Severe weather conditions in {}", payload.location))
                        .with_duration_ms(WEATHER_ALERT_DURATION_MS),
                );
            }
        }
    }
}
