use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItemEntry, to_major_units};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Option<Vec<OrderItemEntry>>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderOut {
    pub id: i64,
    pub buyer_id: i64,
    pub items: Vec<OrderItemEntry>,
    pub total_amount: f64,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderOut {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            buyer_id: order.buyer_id,
            items: order.items.0,
            total_amount: to_major_units(order.total_minor),
            status: order.status,
            payment_method: order.payment_method,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: OrderOut,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_spent: f64,
}
