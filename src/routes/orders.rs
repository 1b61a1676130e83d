use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    db::DbPool,
    dto::orders::{CreateOrderRequest, CreateOrderResponse, OrderOut, OrderStats},
    error::AppResult,
    middleware::auth::AuthUser,
    services::order_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/stats", get(order_stats))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders scoped to the caller", body = [OrderOut]),
        (status = 404, description = "No buyer profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<Vec<OrderOut>>> {
    let orders = order_service::list_my_orders(&pool, &user).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Missing items or total_amount"),
        (status = 404, description = "No buyer profile")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<CreateOrderResponse>)> {
    let resp = order_service::create_order(&pool, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/stats",
    responses(
        (status = 200, description = "Order aggregate for the caller", body = OrderStats)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn order_stats(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<OrderStats>> {
    let stats = order_service::order_stats(&pool, &user).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order", body = OrderOut),
        (status = 404, description = "Not found or not owned")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderOut>> {
    let order = order_service::get_order(&pool, &user, id).await?;
    Ok(Json(order))
}
