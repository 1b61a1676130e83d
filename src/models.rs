use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Farmer {
    pub id: i64,
    pub user_id: Uuid,
    pub farm_name: String,
    pub location: String,
    pub phone_number: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Buyer {
    pub id: i64,
    pub user_id: Uuid,
    pub delivery_address: Option<String>,
    pub preferred_contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Animal {
    pub id: i64,
    pub farmer_id: i64,
    pub species: String,
    pub breed: Option<String>,
    pub age_months: Option<i32>,
    pub weight_kg: Option<f32>,
    pub price_minor: i64,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized line-item snapshot stored inside `orders.items`; not a live
/// join against `animals`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemEntry {
    pub animal_id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    pub items: Json<Vec<OrderItemEntry>>,
    pub total_minor: i64,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WishlistItem {
    pub id: i64,
    pub user_id: Uuid,
    pub animal_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Currency amounts are stored as integer minor units (cents) and exposed on
/// the wire as 2-decimal numbers.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn to_major_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_round_half_up() {
        assert_eq!(to_minor_units(185000.0), 18_500_000);
        assert_eq!(to_minor_units(0.015), 2);
        assert_eq!(to_minor_units(12.34), 1234);
    }

    #[test]
    fn major_units_keep_two_decimals() {
        assert_eq!(to_major_units(18_500_000), 185000.0);
        assert_eq!(to_major_units(1234), 12.34);
        assert_eq!(to_major_units(0), 0.0);
    }

    #[test]
    fn round_trips_for_wire_amounts() {
        for amount in [0.0, 0.01, 185000.0, 99.99] {
            assert_eq!(to_major_units(to_minor_units(amount)), amount);
        }
    }
}
