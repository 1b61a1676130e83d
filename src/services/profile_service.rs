use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppResult,
    models::{Buyer, Farmer},
};

// Role profiles are created by registration only; these lookups never
// create anything. `None` means "no profile of that role", which read
// endpoints treat as an empty result set.

pub async fn locate_buyer(pool: &DbPool, user_id: Uuid) -> AppResult<Option<Buyer>> {
    let buyer = sqlx::query_as::<_, Buyer>("SELECT * FROM buyers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(buyer)
}

pub async fn locate_farmer(pool: &DbPool, user_id: Uuid) -> AppResult<Option<Farmer>> {
    let farmer = sqlx::query_as::<_, Farmer>("SELECT * FROM farmers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(farmer)
}
