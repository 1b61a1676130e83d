use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
            UserOut,
        },
        orders::{CreateOrderRequest, CreateOrderResponse, OrderOut, OrderStats},
        wishlist::{
            AddWishlistRequest, AddWishlistResponse, AnimalOut, RemoveWishlistResponse,
            WishlistCheckResponse, WishlistCountResponse, WishlistItemOut,
        },
    },
    models::OrderItemEntry,
    routes::{auth, health, orders, wishlist},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        orders::list_orders,
        orders::create_order,
        orders::order_stats,
        orders::get_order,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        wishlist::check_in_wishlist,
        wishlist::wishlist_count
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UserOut,
            CurrentUserResponse,
            CreateOrderRequest,
            CreateOrderResponse,
            OrderOut,
            OrderStats,
            OrderItemEntry,
            AddWishlistRequest,
            AddWishlistResponse,
            RemoveWishlistResponse,
            WishlistCheckResponse,
            WishlistCountResponse,
            WishlistItemOut,
            AnimalOut,
            health::HealthData
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login, and current user"),
        (name = "Orders", description = "Buyer-scoped order endpoints"),
        (name = "Wishlist", description = "User-scoped wishlist endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
