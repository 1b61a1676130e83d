use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};

use crate::{
    db::DbPool,
    dto::wishlist::{
        AddWishlistRequest, AddWishlistResponse, RemoveWishlistResponse, WishlistCheckResponse,
        WishlistCountResponse, WishlistItemOut,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    services::wishlist_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(list_wishlist).post(add_to_wishlist))
        .route("/count", get(wishlist_count))
        .route("/check/{animal_id}", get(check_in_wishlist))
        .route("/{item_id}", delete(remove_from_wishlist))
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    responses(
        (status = 200, description = "Wishlist entries with nested animal", body = [WishlistItemOut]),
        (status = 400, description = "Malformed identity")
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn list_wishlist(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<Vec<WishlistItemOut>>> {
    let items = wishlist_service::list_wishlist(&pool, &user).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/wishlist",
    request_body = AddWishlistRequest,
    responses(
        (status = 201, description = "Added to wishlist", body = AddWishlistResponse),
        (status = 200, description = "Already in wishlist", body = AddWishlistResponse),
        (status = 400, description = "Missing animal_id")
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<AddWishlistRequest>,
) -> AppResult<(StatusCode, Json<AddWishlistResponse>)> {
    let outcome = wishlist_service::add_to_wishlist(&pool, &user, payload).await?;
    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Added to wishlist")
    } else {
        (StatusCode::OK, "Item already in wishlist")
    };
    Ok((
        status,
        Json(AddWishlistResponse {
            message: message.into(),
            item: outcome.item,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/{item_id}",
    params(
        ("item_id" = i64, Path, description = "Wishlist entry ID")
    ),
    responses(
        (status = 200, description = "Removed from wishlist", body = RemoveWishlistResponse),
        (status = 404, description = "Not found or not owned")
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(item_id): Path<i64>,
) -> AppResult<Json<RemoveWishlistResponse>> {
    wishlist_service::remove_from_wishlist(&pool, &user, item_id).await?;
    Ok(Json(RemoveWishlistResponse {
        message: "Removed from wishlist".into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/wishlist/check/{animal_id}",
    params(
        ("animal_id" = i64, Path, description = "Animal ID")
    ),
    responses(
        (status = 200, description = "Membership flag", body = WishlistCheckResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn check_in_wishlist(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(animal_id): Path<i64>,
) -> AppResult<Json<WishlistCheckResponse>> {
    let in_wishlist = wishlist_service::check_in_wishlist(&pool, &user, animal_id).await?;
    Ok(Json(WishlistCheckResponse { in_wishlist }))
}

#[utoipa::path(
    get,
    path = "/api/wishlist/count",
    responses(
        (status = 200, description = "Wishlist size", body = WishlistCountResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn wishlist_count(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<WishlistCountResponse>> {
    let count = wishlist_service::wishlist_count(&pool, &user).await?;
    Ok(Json(WishlistCountResponse { count }))
}
