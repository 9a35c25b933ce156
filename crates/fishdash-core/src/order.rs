//! Order domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Scheduled,
    InProgress,
    Delivered,
    Completed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A single line item on an order. Quantities and prices travel as
/// decimal strings on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: u64,
    pub fish_type_id: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity_kg: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub order_date: String,
    pub delivery_date: String,
    #[serde(default)]
    pub delivery_time_slot: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub delivery_fee: Option<Decimal>,
    pub status: OrderStatus,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

/// Line item for order creation (plain numbers, not wire strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub fish_type_id: u64,
    pub quantity_kg: f64,
    pub unit_price: f64,
}

/// Request body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: u64,
    pub delivery_date: String,
    pub delivery_time_slot: String,
    pub delivery_address: String,
    pub order_items: Vec<CreateOrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_decodes_wire_format() {
        let json = r#"{
            "id": 42,
            "userId": 7,
            "orderDate": "2026-08-01",
            "deliveryDate": "2026-08-02",
            "totalAmount": "1250.50",
            "status": "in_progress",
            "orderItems": [
                {"id": 1, "fishTypeId": 3, "quantityKg": "12.5", "unitPrice": "100.04", "subtotal": "1250.50"}
            ]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, 42);
        assert_eq!(order.total_amount, dec!(1250.50));
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.order_items.len(), 1);
        assert_eq!(order.order_items[0].quantity_kg, dec!(12.5));
        assert!(order.delivery_fee.is_none());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let json = r#"{
            "id": 1, "userId": 1, "orderDate": "d", "deliveryDate": "d",
            "totalAmount": "1", "status": "teleported"
        }"#;
        assert!(serde_json::from_str::<Order>(json).is_err());
    }

    #[test]
    fn test_create_request_serializes_camel_case() {
        let req = CreateOrderRequest {
            user_id: 1,
            delivery_date: "2026-08-02".to_string(),
            delivery_time_slot: "08:00-10:00".to_string(),
            delivery_address: "12 Harbour Rd".to_string(),
            order_items: vec![CreateOrderItem {
                fish_type_id: 3,
                quantity_kg: 5.0,
                unit_price: 90.0,
            }],
            special_instructions: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("deliveryTimeSlot").is_some());
        assert!(json.get("specialInstructions").is_none());
    }
}
