use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    db::DbPool,
    dto::auth::{
        Claims, CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest,
        RegisterResponse, UserOut,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
};

/// Registration creates the User row and its role profile inside one
/// transaction; any validation or conflict failure drops the transaction,
/// so a User without a profile is never observable.
pub async fn register_user(pool: &DbPool, payload: RegisterRequest) -> AppResult<RegisterResponse> {
    let (email, password, role) = match (&payload.email, &payload.password, &payload.role) {
        (Some(email), Some(password), Some(role)) => (email.clone(), password.clone(), role.clone()),
        _ => {
            return Err(AppError::BadRequest(
                "Missing email, password, or role".into(),
            ));
        }
    };

    let role = role.to_lowercase();
    if role != "farmer" && role != "buyer" {
        return Err(AppError::BadRequest(
            "Invalid role. Must be 'farmer' or 'buyer'".into(),
        ));
    }

    // Fast-path check; the unique constraint on users.email is authoritative.
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&password)?;

    let mut txn = pool.begin().await?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role, full_name, phone_number, location)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_str())
    .bind(password_hash)
    .bind(role.as_str())
    .bind(payload.full_name.as_deref())
    .bind(payload.phone_number.as_deref())
    .bind(payload.location.as_deref())
    .fetch_one(&mut *txn)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Email already registered"))?;

    if role == "farmer" {
        let (farm_name, location, phone_number) = match (
            &payload.farm_name,
            &payload.location,
            &payload.phone_number,
        ) {
            (Some(farm_name), Some(location), Some(phone_number)) => {
                (farm_name.clone(), location.clone(), phone_number.clone())
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Farmers require farm_name, location, and phone_number".into(),
                ));
            }
        };

        let phone_taken: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM farmers WHERE phone_number = $1")
                .bind(phone_number.as_str())
                .fetch_optional(&mut *txn)
                .await?;
        if phone_taken.is_some() {
            return Err(AppError::Conflict("Phone number already registered".into()));
        }

        sqlx::query(
            r#"
            INSERT INTO farmers (user_id, farm_name, location, phone_number)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(farm_name)
        .bind(location)
        .bind(phone_number)
        .execute(&mut *txn)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Phone number already registered"))?;
    } else {
        sqlx::query(
            r#"
            INSERT INTO buyers (user_id, delivery_address, preferred_contact)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id)
        .bind(payload.delivery_address.as_deref())
        .bind(payload.preferred_contact.as_deref())
        .execute(&mut *txn)
        .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        AuditAction::UserRegister,
        Some(serde_json::json!({ "user_id": user.id, "role": role })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let label = if role == "farmer" { "Farmer" } else { "Buyer" };
    Ok(RegisterResponse {
        message: format!("{label} registered successfully"),
        user_id: user.id,
    })
}

/// Unknown email and wrong password are indistinguishable on purpose.
pub async fn login_user(pool: &DbPool, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::InvalidCredentials),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::InvalidCredentials);
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        AuditAction::UserLogin,
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(LoginResponse {
        message: "Login successful".into(),
        access_token: token,
        user: UserOut::from(&user),
    })
}

pub async fn current_user(pool: &DbPool, user: &AuthUser) -> AppResult<CurrentUserResponse> {
    let row: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(u) => Ok(CurrentUserResponse::from(&u)),
        None => Err(AppError::NotFound("User not found".into())),
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}
