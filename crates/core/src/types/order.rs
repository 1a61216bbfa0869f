//! Order and checkout wire types.
//!
//! Checkout submits a [`CheckoutRequest`] to `POST /api/checkout/` and gets
//! back a [`CheckoutReceipt`]. The back-office reads full [`Order`] records
//! from `/api/orders/`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, UserId};
use super::status::OrderStatus;
use super::user::User;

/// One line of a checkout submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Body of `POST /api/checkout/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: UserId,
    pub items: Vec<CheckoutItem>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
}

/// Response of `POST /api/checkout/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    /// Human-facing order reference, e.g. `ORD-20260830-3FA2B1`.
    pub order_uid: String,
    pub total: Decimal,
    pub status: OrderStatus,
}

/// One fulfilled line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub qty: u32,
    /// Line subtotal (unit price times qty) as computed by the backend.
    pub subtotal: Decimal,
}

/// A placed order as returned by `/api/orders/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_uid: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub customer: User,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
}

/// Body of `PUT /api/orders/{id}` (status transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_request_wire_shape() {
        let request = CheckoutRequest {
            user_id: UserId::new(4),
            items: vec![CheckoutItem {
                product_id: ProductId::new(12),
                qty: 2,
            }],
            customer_name: "Asha Rao".to_owned(),
            customer_phone: "9000000000".to_owned(),
            customer_address: "12 Loom Street".to_owned(),
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["user_id"], 4);
        assert_eq!(value["items"][0]["product_id"], 12);
        assert_eq!(value["items"][0]["qty"], 2);
    }

    #[test]
    fn test_receipt_deserializes() {
        let receipt: CheckoutReceipt = serde_json::from_str(
            r#"{"order_uid": "ORD-20260830-3FA2B1", "total": 260.0, "status": "pending"}"#,
        )
        .expect("deserialize");
        assert_eq!(receipt.order_uid, "ORD-20260830-3FA2B1");
        assert_eq!(receipt.status, OrderStatus::Pending);
        assert_eq!(receipt.total, Decimal::new(260, 0));
    }
}
