use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Animal, to_major_units};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddWishlistRequest {
    pub animal_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnimalOut {
    pub id: i64,
    pub species: String,
    pub breed: Option<String>,
    pub age_months: Option<i32>,
    pub weight_kg: Option<f32>,
    pub price: f64,
    pub status: String,
    pub image_url: Option<String>,
}

impl From<Animal> for AnimalOut {
    fn from(animal: Animal) -> Self {
        Self {
            id: animal.id,
            species: animal.species,
            breed: animal.breed,
            age_months: animal.age_months,
            weight_kg: animal.weight_kg,
            price: to_major_units(animal.price_minor),
            status: animal.status,
            image_url: animal.image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistItemOut {
    pub id: i64,
    pub user_id: Uuid,
    pub animal_id: i64,
    pub animal: AnimalOut,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddWishlistResponse {
    pub message: String,
    pub item: WishlistItemOut,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveWishlistResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistCheckResponse {
    pub in_wishlist: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistCountResponse {
    pub count: i64,
}
