use sqlx::types::Json;

use crate::{
    audit::{AuditAction, log_audit},
    db::DbPool,
    dto::orders::{CreateOrderRequest, CreateOrderResponse, OrderOut, OrderStats},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, to_major_units, to_minor_units},
    services::profile_service::locate_buyer,
};

// Orders are scoped through the Buyer profile id, never the raw user id:
// every query predicate carries buyer_id resolved from the caller's
// identity, so ownership holds by construction.

pub async fn list_my_orders(pool: &DbPool, user: &AuthUser) -> AppResult<Vec<OrderOut>> {
    let buyer = locate_buyer(pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No buyer profile found for this user".into()))?;

    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY id")
        .bind(buyer.id)
        .fetch_all(pool)
        .await?;

    Ok(orders.into_iter().map(OrderOut::from).collect())
}

pub async fn create_order(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<CreateOrderResponse> {
    let buyer = locate_buyer(pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No buyer profile found for this user".into()))?;

    let (items, total_amount) = match (payload.items, payload.total_amount) {
        (Some(items), Some(total_amount)) => (items, total_amount),
        _ => {
            return Err(AppError::BadRequest(
                "Missing required fields: items, total_amount".into(),
            ));
        }
    };

    let status = payload.status.unwrap_or_else(|| "paid".into());
    let payment_method = payload.payment_method.unwrap_or_else(|| "mpesa".into());

    // buyer_id comes from the resolved profile; any owner id in the payload
    // is ignored.
    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (buyer_id, items, total_minor, status, payment_method)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(buyer.id)
    .bind(Json(&items))
    .bind(to_minor_units(total_amount))
    .bind(status)
    .bind(payment_method)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        AuditAction::OrderCreate,
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(CreateOrderResponse {
        message: "Order created successfully".into(),
        order: OrderOut::from(order),
    })
}

pub async fn get_order(pool: &DbPool, user: &AuthUser, order_id: i64) -> AppResult<OrderOut> {
    let buyer = locate_buyer(pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No buyer profile found for this user".into()))?;

    // One predicate-qualified query: "doesn't exist" and "exists but not
    // yours" are the same outcome.
    let order =
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND buyer_id = $2")
            .bind(order_id)
            .bind(buyer.id)
            .fetch_optional(pool)
            .await?;

    match order {
        Some(o) => Ok(OrderOut::from(o)),
        None => Err(AppError::NotFound("Order not found or access denied".into())),
    }
}

/// A user without a Buyer profile gets a zero-valued aggregate, not an error.
pub async fn order_stats(pool: &DbPool, user: &AuthUser) -> AppResult<OrderStats> {
    let buyer = match locate_buyer(pool, user.user_id).await? {
        Some(b) => b,
        None => {
            return Ok(OrderStats {
                total_orders: 0,
                total_spent: 0.0,
            });
        }
    };

    let (total_orders, total_minor): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(total_minor), 0)::BIGINT FROM orders WHERE buyer_id = $1",
    )
    .bind(buyer.id)
    .fetch_one(pool)
    .await?;

    Ok(OrderStats {
        total_orders,
        total_spent: to_major_units(total_minor),
    })
}
