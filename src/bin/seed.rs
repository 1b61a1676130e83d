use livestock_market_api::{
    config::AppConfig,
    db::create_pool,
    services::auth_service::hash_password,
};
use uuid::Uuid;

// Dev seed: a verified farmer plus a handful of animals. Animal rows have no
// public creation endpoint, so this stands in for the admin path.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let farmer_id = ensure_farmer(
        &pool,
        "farmer@example.com",
        "farmer123",
        "Green Pastures",
        "Nakuru",
        "+254700000001",
    )
    .await?;
    seed_animals(&pool, farmer_id).await?;

    println!("Seed completed. Farmer profile ID: {farmer_id}");
    Ok(())
}

async fn ensure_farmer(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    farm_name: &str,
    location: &str,
    phone_number: &str,
) -> anyhow::Result<i64> {
    let password_hash = hash_password(password)?;

    let user_id: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role, location)
        VALUES ($1, $2, $3, 'farmer', $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(location)
    .fetch_optional(pool)
    .await?;

    let user_id = match user_id {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    let farmer_id: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO farmers (user_id, farm_name, location, phone_number, is_verified)
        VALUES ($1, $2, $3, $4, TRUE)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(farm_name)
    .bind(location)
    .bind(phone_number)
    .fetch_optional(pool)
    .await?;

    let farmer_id = match farmer_id {
        Some((id,)) => id,
        None => {
            let existing: (i64,) = sqlx::query_as("SELECT id FROM farmers WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured farmer {email} ({farm_name})");
    Ok(farmer_id)
}

async fn seed_animals(pool: &sqlx::PgPool, farmer_id: i64) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM animals WHERE farmer_id = $1")
        .bind(farmer_id)
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        println!("Animals already seeded");
        return Ok(());
    }

    // (species, breed, age months, weight kg, price in minor units)
    let animals = vec![
        ("Cow", "Friesian", 30, 420.0_f32, 18_500_000_i64),
        ("Cow", "Boran", 24, 380.0, 14_000_000),
        ("Goat", "Galla", 12, 35.0, 1_200_000),
        ("Sheep", "Dorper", 10, 40.0, 1_500_000),
    ];

    for (species, breed, age_months, weight_kg, price_minor) in animals {
        sqlx::query(
            r#"
            INSERT INTO animals (farmer_id, species, breed, age_months, weight_kg, price_minor)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(farmer_id)
        .bind(species)
        .bind(breed)
        .bind(age_months)
        .bind(weight_kg)
        .bind(price_minor)
        .execute(pool)
        .await?;
    }

    println!("Seeded animals");
    Ok(())
}
