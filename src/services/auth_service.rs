use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::ActiveModel as UserActive,
    error::{AppError, AppResult},
    middleware::auth::ROLE_USER,
    models::User,
    response::{ApiResponse, Meta},
    services::{role_service, user_service},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn issue_token(
    config: &AppConfig,
    user_id: Uuid,
    username: &str,
    roles: Vec<String>,
) -> AppResult<String> {
    let expiration = Duration::try_hours(config.jwt_ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        roles,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let username = payload.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::BadRequest("username is required".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if user_service::find_by_username(&state.orm, &username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username is already taken".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let txn = state.orm.begin().await?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let role = role_service::ensure_role(&txn, ROLE_USER).await?;
    user_service::grant_role(&txn, user.id, role.id).await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(ApiResponse::success(
        "User created",
        User::from_entity(user, vec![role.name]),
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let user = user_service::find_by_username(&state.orm, username.trim()).await?;

    let user = match user {
        Some(u) if verify_password(&password, &u.password_hash) => u,
        _ => return Err(AppError::BadRequest("Invalid username or password".into())),
    };

    let roles = user_service::role_names(&state.orm, user.id).await?;
    let token = issue_token(&state.config, user.id, &user.username, roles)?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            token_type: "Bearer".into(),
            expires_in: state.config.jwt_ttl_hours.saturating_mul(3600),
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_token;

    fn config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "unit-test-secret".into(),
            jwt_ttl_hours: 1,
            upload_dir: "uploads".into(),
            allowed_origins: vec![],
        }
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("perfume123").unwrap();
        assert!(verify_password("perfume123", &hash));
        assert!(!verify_password("perfume124", &hash));
        assert!(!verify_password("perfume123", "not-a-hash"));
    }

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let cfg = config();
        let id = Uuid::new_v4();
        let token = issue_token(&cfg, id, "ana", vec!["ADMIN".into()]).unwrap();

        let user = decode_token(&token, &cfg.jwt_secret).unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.username, "ana");
        assert!(user.is_admin());

        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn oversized_ttl_is_an_error_not_a_panic() {
        let cfg = AppConfig {
            jwt_ttl_hours: i64::MAX,
            ..config()
        };
        assert!(matches!(
            issue_token(&cfg, Uuid::new_v4(), "ana", vec![]),
            Err(AppError::Internal(_))
        ));
    }
}
