use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    db::DbPool,
    dto::wishlist::{AddWishlistRequest, AnimalOut, WishlistItemOut},
    error::{AppError, AppResult, is_unique_violation},
    middleware::auth::AuthUser,
    models::{Animal, WishlistItem, to_major_units},
};

// The wishlist is scoped by user id directly (no role profile in between);
// the (user_id, animal_id) unique constraint is the authoritative guard
// behind the idempotent-add policy.

#[derive(Debug, sqlx::FromRow)]
struct WishlistRow {
    item_id: i64,
    user_id: Uuid,
    animal_id: i64,
    added_at: DateTime<Utc>,
    species: String,
    breed: Option<String>,
    age_months: Option<i32>,
    weight_kg: Option<f32>,
    price_minor: i64,
    status: String,
    image_url: Option<String>,
}

impl From<WishlistRow> for WishlistItemOut {
    fn from(row: WishlistRow) -> Self {
        Self {
            id: row.item_id,
            user_id: row.user_id,
            animal_id: row.animal_id,
            animal: AnimalOut {
                id: row.animal_id,
                species: row.species,
                breed: row.breed,
                age_months: row.age_months,
                weight_kg: row.weight_kg,
                price: to_major_units(row.price_minor),
                status: row.status,
                image_url: row.image_url,
            },
            created_at: row.added_at,
        }
    }
}

pub async fn list_wishlist(pool: &DbPool, user: &AuthUser) -> AppResult<Vec<WishlistItemOut>> {
    let rows = sqlx::query_as::<_, WishlistRow>(
        r#"
        SELECT w.id AS item_id, w.user_id, w.animal_id, w.created_at AS added_at,
               a.species, a.breed, a.age_months, a.weight_kg, a.price_minor, a.status, a.image_url
        FROM wishlists w
        JOIN animals a ON a.id = w.animal_id
        WHERE w.user_id = $1
        ORDER BY w.id
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(WishlistItemOut::from).collect())
}

pub struct AddOutcome {
    pub created: bool,
    pub item: WishlistItemOut,
}

pub async fn add_to_wishlist(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddWishlistRequest,
) -> AppResult<AddOutcome> {
    let animal_id = payload
        .animal_id
        .ok_or_else(|| AppError::BadRequest("Missing required field: animal_id".into()))?;

    let existing: Option<WishlistItem> =
        sqlx::query_as("SELECT * FROM wishlists WHERE user_id = $1 AND animal_id = $2")
            .bind(user.user_id)
            .bind(animal_id)
            .fetch_optional(pool)
            .await?;

    let (created, item_id) = if let Some(item) = existing {
        (false, item.id)
    } else {
        let inserted = sqlx::query_as::<_, WishlistItem>(
            r#"
            INSERT INTO wishlists (user_id, animal_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user.user_id)
        .bind(animal_id)
        .fetch_one(pool)
        .await;

        match inserted {
            Ok(item) => (true, item.id),
            // Lost the insert race: the pair now exists, which is still success.
            Err(err) if is_unique_violation(&err) => {
                let item: WishlistItem =
                    sqlx::query_as("SELECT * FROM wishlists WHERE user_id = $1 AND animal_id = $2")
                        .bind(user.user_id)
                        .bind(animal_id)
                        .fetch_one(pool)
                        .await?;
                (false, item.id)
            }
            Err(err) => return Err(err.into()),
        }
    };

    let item = fetch_item(pool, item_id).await?;

    if created
        && let Err(err) = log_audit(
            pool,
            Some(user.user_id),
            AuditAction::WishlistAdd,
            Some(serde_json::json!({ "animal_id": animal_id })),
        )
        .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(AddOutcome { created, item })
}

pub async fn remove_from_wishlist(pool: &DbPool, user: &AuthUser, item_id: i64) -> AppResult<()> {
    // Delete filters on both id and owner in one statement; absent and
    // not-owned are indistinguishable.
    let result = sqlx::query("DELETE FROM wishlists WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Wishlist item not found or access denied".into(),
        ));
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        AuditAction::WishlistRemove,
        Some(serde_json::json!({ "item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

pub async fn check_in_wishlist(pool: &DbPool, user: &AuthUser, animal_id: i64) -> AppResult<bool> {
    let in_wishlist: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM wishlists WHERE user_id = $1 AND animal_id = $2)",
    )
    .bind(user.user_id)
    .bind(animal_id)
    .fetch_one(pool)
    .await?;

    Ok(in_wishlist)
}

pub async fn wishlist_count(pool: &DbPool, user: &AuthUser) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wishlists WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

async fn fetch_item(pool: &DbPool, item_id: i64) -> AppResult<WishlistItemOut> {
    let item: WishlistItem = sqlx::query_as("SELECT * FROM wishlists WHERE id = $1")
        .bind(item_id)
        .fetch_one(pool)
        .await?;

    // The FK guarantees the animal row exists.
    let animal: Animal = sqlx::query_as("SELECT * FROM animals WHERE id = $1")
        .bind(item.animal_id)
        .fetch_one(pool)
        .await?;

    Ok(WishlistItemOut {
        id: item.id,
        user_id: item.user_id,
        animal_id: item.animal_id,
        animal: AnimalOut::from(animal),
        created_at: item.created_at,
    })
}
