//! Real-time push event types.
//!
//! Inbound frames on the push channel decode as [`RealTimeUpdate`]: a closed
//! tagged union over `type` with a type-specific `data` payload and an
//! epoch-millisecond timestamp. Unknown event types fail to decode — the
//! dispatch table stays exhaustive at compile time.

use crate::fleet::TruckStatus;
use crate::order::OrderStatus;
use serde::{Deserialize, Serialize};

/// Connection state of the push channel, mirrored into the UI store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Reconnecting,
}

/// Weather alert level carried by `weather_updated` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusPayload {
    pub order_id: u64,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderPayload {
    pub order_id: u64,
    /// Order total in LKR, for the notification text only.
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdatePayload {
    pub fish_name: String,
    /// Percent change against the previous price. Sign carries direction.
    pub price_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckStatusPayload {
    pub license_plate: String,
    pub status: TruckStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherUpdatePayload {
    pub location: String,
    pub alert_level: AlertLevel,
}

/// Event kind with its typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum UpdateKind {
    OrderStatusChanged(OrderStatusPayload),
    NewOrder(NewOrderPayload),
    PriceUpdated(PriceUpdatePayload),
    TruckStatusChanged(TruckStatusPayload),
    WeatherUpdated(WeatherUpdatePayload),
}

/// A single inbound push event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeUpdate {
    #[serde(flatten)]
    pub kind: UpdateKind,
    /// Producer timestamp, epoch milliseconds.
    pub timestamp: i64,
}

impl RealTimeUpdate {
    /// Decode a raw text frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Short tag for the debug ring, e.g. `new_order:1724400000000`.
    pub fn tag(&self) -> String {
        let name = match self.kind {
            UpdateKind::OrderStatusChanged(_) => "order_status_changed",
            UpdateKind::NewOrder(_) => "new_order",
            UpdateKind::PriceUpdated(_) => "price_updated",
            UpdateKind::TruckStatusChanged(_) => "truck_status_changed",
            UpdateKind::WeatherUpdated(_) => "weather_updated",
        };
        format!("{}:{}", name, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_new_order() {
        let frame = r#"{
            "type": "new_order",
            "data": {"orderId": 101, "totalAmount": 5400.0},
            "timestamp": 1724400000000
        }"#;
        let update = RealTimeUpdate::decode(frame).unwrap();
        match update.kind {
            UpdateKind::NewOrder(ref p) => {
                assert_eq!(p.order_id, 101);
                assert!((p.total_amount - 5400.0).abs() < f64::EPSILON);
            }
            _ => panic!("wrong variant"),
        }
        assert_eq!(update.tag(), "new_order:1724400000000");
    }

    #[test]
    fn test_decode_weather_alert() {
        let frame = r#"{
            "type": "weather_updated",
            "data": {"location": "Galle", "alertLevel": "severe"},
            "timestamp": 1
        }"#;
        let update = RealTimeUpdate::decode(frame).unwrap();
        match update.kind {
            UpdateKind::WeatherUpdated(ref p) => assert_eq!(p.alert_level, AlertLevel::Severe),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let frame = r#"{"type": "fleet_exploded", "data": {}, "timestamp": 1}"#;
        assert!(RealTimeUpdate::decode(frame).is_err());
    }

    #[test]
    fn test_malformed_payload_rejected() {
        // Right tag, wrong payload shape.
        let frame = r#"{"type": "new_order", "data": {"orderId": "nope"}, "timestamp": 1}"#;
        assert!(RealTimeUpdate::decode(frame).is_err());
    }
}
