use livestock_market_api::{
    db::{DbPool, create_pool},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        orders::CreateOrderRequest,
        wishlist::AddWishlistRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::OrderItemEntry,
    services::{auth_service, order_service, profile_service, wishlist_service},
};
use uuid::Uuid;

// Integration tests against a real database; they skip themselves when no
// database is configured. Emails and phone numbers carry a per-test random
// tag so tests can run in parallel and across repeated runs without
// truncation.

async fn test_pool() -> anyhow::Result<Option<DbPool>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
            );
            return Ok(None);
        }
    };

    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Some(pool))
}

fn tag() -> String {
    Uuid::new_v4().simple().to_string()
}

fn buyer_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.into()),
        password: Some("pw123456".into()),
        role: Some("buyer".into()),
        full_name: None,
        phone_number: None,
        location: None,
        farm_name: None,
        delivery_address: None,
        preferred_contact: None,
    }
}

fn farmer_request(email: &str, phone: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.into()),
        password: Some("pw123456".into()),
        role: Some("farmer".into()),
        full_name: Some("Test Farmer".into()),
        phone_number: phone.map(Into::into),
        location: Some("Nakuru".into()),
        farm_name: Some("Test Farm".into()),
        delivery_address: None,
        preferred_contact: None,
    }
}

async fn register_buyer(pool: &DbPool, email: &str) -> anyhow::Result<AuthUser> {
    let resp = auth_service::register_user(pool, buyer_request(email)).await?;
    Ok(AuthUser {
        user_id: resp.user_id,
        role: "buyer".into(),
    })
}

async fn seed_animal(pool: &DbPool, suffix: &str) -> anyhow::Result<i64> {
    let user_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, 'seed', 'farmer')",
    )
    .bind(user_id)
    .bind(format!("seed-farmer-{suffix}@example.com"))
    .execute(pool)
    .await?;

    let (farmer_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO farmers (user_id, farm_name, location, phone_number)
        VALUES ($1, 'Seed Farm', 'Eldoret', $2)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(format!("+254-{suffix}"))
    .fetch_one(pool)
    .await?;

    let (animal_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO animals (farmer_id, species, breed, price_minor)
        VALUES ($1, 'Cow', 'Friesian', 18500000)
        RETURNING id
        "#,
    )
    .bind(farmer_id)
    .fetch_one(pool)
    .await?;

    Ok(animal_id)
}

#[tokio::test]
async fn buyer_registration_login_order_and_stats_flow() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let email = format!("b-{}@x.com", tag());
    let user = register_buyer(&pool, &email).await?;

    let login = auth_service::login_user(
        &pool,
        LoginRequest {
            email: email.clone(),
            password: "pw123456".into(),
        },
    )
    .await?;
    assert_eq!(login.message, "Login successful");
    assert!(!login.access_token.is_empty());
    assert_eq!(login.user.email, email);
    assert_eq!(login.user.role, "buyer");

    let created = order_service::create_order(
        &pool,
        &user,
        CreateOrderRequest {
            items: Some(vec![OrderItemEntry {
                animal_id: 1,
                name: "Cow".into(),
                price: 185000.0,
            }]),
            total_amount: Some(185000.0),
            status: None,
            payment_method: None,
        },
    )
    .await?;
    assert_eq!(created.order.total_amount, 185000.0);
    assert_eq!(created.order.status, "paid");
    assert_eq!(created.order.payment_method, "mpesa");

    let orders = order_service::list_my_orders(&pool, &user).await?;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, created.order.id);

    let fetched = order_service::get_order(&pool, &user, created.order.id).await?;
    assert_eq!(fetched.items.len(), 1);
    assert_eq!(fetched.items[0].name, "Cow");

    let stats = order_service::order_stats(&pool, &user).await?;
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_spent, 185000.0);

    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let email = format!("login-{}@x.com", tag());
    register_buyer(&pool, &email).await?;

    let wrong_password = auth_service::login_user(
        &pool,
        LoginRequest {
            email: email.clone(),
            password: "not-the-password".into(),
        },
    )
    .await;
    let unknown_email = auth_service::login_user(
        &pool,
        LoginRequest {
            email: format!("nobody-{}@x.com", tag()),
            password: "pw123456".into(),
        },
    )
    .await;

    let msg_a = match wrong_password {
        Err(err @ AppError::InvalidCredentials) => err.to_string(),
        other => panic!("expected InvalidCredentials, got {other:?}"),
    };
    let msg_b = match unknown_email {
        Err(err @ AppError::InvalidCredentials) => err.to_string(),
        other => panic!("expected InvalidCredentials, got {other:?}"),
    };
    assert_eq!(msg_a, msg_b);

    Ok(())
}

#[tokio::test]
async fn current_user_returns_profile_or_not_found() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let email = format!("me-{}@x.com", tag());
    let user = register_buyer(&pool, &email).await?;

    let me = auth_service::current_user(&pool, &user).await?;
    assert_eq!(me.id, user.user_id);
    assert_eq!(me.email, email);
    assert_eq!(me.role, "buyer");
    assert!(me.created_at <= chrono::Utc::now());

    // A well-formed identity whose user row is gone is a hard 404.
    let ghost = AuthUser {
        user_id: Uuid::new_v4(),
        role: "buyer".into(),
    };
    let missing = auth_service::current_user(&pool, &ghost).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn orders_are_isolated_between_buyers() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let t = tag();
    let user_a = register_buyer(&pool, &format!("a-{t}@x.com")).await?;
    let user_b = register_buyer(&pool, &format!("b-{t}@x.com")).await?;

    let created = order_service::create_order(
        &pool,
        &user_a,
        CreateOrderRequest {
            items: Some(vec![OrderItemEntry {
                animal_id: 7,
                name: "Goat".into(),
                price: 12000.0,
            }]),
            total_amount: Some(12000.0),
            status: None,
            payment_method: None,
        },
    )
    .await?;

    // B supplying A's real order id must look exactly like a missing order.
    let foreign = order_service::get_order(&pool, &user_b, created.order.id).await;
    let missing = order_service::get_order(&pool, &user_b, i64::MAX).await;

    let foreign_msg = match foreign {
        Err(err @ AppError::NotFound(_)) => err.to_string(),
        other => panic!("expected NotFound for foreign order, got {other:?}"),
    };
    let missing_msg = match missing {
        Err(err @ AppError::NotFound(_)) => err.to_string(),
        other => panic!("expected NotFound for missing order, got {other:?}"),
    };
    assert_eq!(foreign_msg, missing_msg);

    let b_orders = order_service::list_my_orders(&pool, &user_b).await?;
    assert!(b_orders.is_empty());

    Ok(())
}

#[tokio::test]
async fn duplicate_email_registration_conflicts_without_residue() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let email = format!("dup-{}@x.com", tag());
    register_buyer(&pool, &email).await?;

    let second = auth_service::register_user(&pool, buyer_request(&email)).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn farmer_registration_missing_fields_rolls_back_completely() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let t = tag();
    let email = format!("f-{t}@x.com");

    let result = auth_service::register_user(&pool, farmer_request(&email, None)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // The aborted attempt must leave no User row behind.
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 0);

    // And the same email registers cleanly afterwards.
    let phone = format!("+254-f-{t}");
    let resp = auth_service::register_user(&pool, farmer_request(&email, Some(&phone))).await?;
    assert_eq!(resp.message, "Farmer registered successfully");

    let profile = profile_service::locate_farmer(&pool, resp.user_id).await?;
    let profile = profile.expect("farmer profile created with the user");
    assert_eq!(profile.phone_number, phone);
    assert!(!profile.is_verified);

    Ok(())
}

#[tokio::test]
async fn farmer_phone_number_must_be_unique() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let t = tag();
    let phone = format!("+254-p-{t}");
    auth_service::register_user(&pool, farmer_request(&format!("p1-{t}@x.com"), Some(&phone)))
        .await?;

    let email_b = format!("p2-{t}@x.com");
    let second = auth_service::register_user(&pool, farmer_request(&email_b, Some(&phone))).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // Rollback: the conflicting attempt committed nothing.
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email_b)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn wishlist_add_is_idempotent_and_isolated() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let t = tag();
    let animal_id = seed_animal(&pool, &t).await?;
    let user_a = register_buyer(&pool, &format!("wa-{t}@x.com")).await?;
    let user_b = register_buyer(&pool, &format!("wb-{t}@x.com")).await?;

    let first = wishlist_service::add_to_wishlist(
        &pool,
        &user_a,
        AddWishlistRequest {
            animal_id: Some(animal_id),
        },
    )
    .await?;
    assert!(first.created);
    assert_eq!(first.item.animal.species, "Cow");

    let second = wishlist_service::add_to_wishlist(
        &pool,
        &user_a,
        AddWishlistRequest {
            animal_id: Some(animal_id),
        },
    )
    .await?;
    assert!(!second.created);
    assert_eq!(second.item.id, first.item.id);

    assert_eq!(wishlist_service::wishlist_count(&pool, &user_a).await?, 1);
    assert!(wishlist_service::check_in_wishlist(&pool, &user_a, animal_id).await?);
    assert!(!wishlist_service::check_in_wishlist(&pool, &user_b, animal_id).await?);

    let listed = wishlist_service::list_wishlist(&pool, &user_a).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].animal.price, 185000.0);

    // B cannot delete A's entry, and the failure matches a nonexistent id.
    let foreign = wishlist_service::remove_from_wishlist(&pool, &user_b, first.item.id).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    wishlist_service::remove_from_wishlist(&pool, &user_a, first.item.id).await?;
    assert_eq!(wishlist_service::wishlist_count(&pool, &user_a).await?, 0);

    Ok(())
}

#[tokio::test]
async fn order_stats_without_buyer_profile_is_zero() -> anyhow::Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let t = tag();
    let resp = auth_service::register_user(
        &pool,
        farmer_request(&format!("z-{t}@x.com"), Some(&format!("+254-z-{t}"))),
    )
    .await?;
    let farmer = AuthUser {
        user_id: resp.user_id,
        role: "farmer".into(),
    };

    let stats = order_service::order_stats(&pool, &farmer).await?;
    assert_eq!(stats.total_orders, 0);
    assert_eq!(stats.total_spent, 0.0);

    // Listing is a hard 404 without the profile, per the endpoint contract.
    let listed = order_service::list_my_orders(&pool, &farmer).await;
    assert!(matches!(listed, Err(AppError::NotFound(_))));

    Ok(())
}
