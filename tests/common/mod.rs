#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::Utc;
use perfume_store_api::{
    config::{AppConfig, default_origins},
    db::{create_orm_conn, run_migrations},
    entity::{perfumes, users},
    middleware::auth::AuthUser,
    routes::create_app,
    services::{auth_service::issue_token, role_service, user_service},
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh state on an in-memory SQLite database unless `TEST_DATABASE_URL` points elsewhere.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let database_url =
        std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let upload_dir = std::env::temp_dir().join(format!("perfume-store-test-{}", Uuid::new_v4()));
    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: TEST_SECRET.into(),
        jwt_ttl_hours: 1,
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        allowed_origins: default_origins(),
    };
    Ok(AppState::new(orm, config))
}

pub struct TestUser {
    pub auth: AuthUser,
    pub token: String,
}

/// Inserts a user holding `roles` and signs a token for it. The password hash is a
/// placeholder, so these accounts cannot log in.
pub async fn create_user(state: &AppState, roles: &[&str]) -> anyhow::Result<TestUser> {
    let username = format!("user-{}", Uuid::new_v4().simple());
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.clone()),
        password_hash: Set("placeholder".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    let mut names = Vec::new();
    for role in roles {
        let role = role_service::ensure_role(&state.orm, role).await?;
        user_service::grant_role(&state.orm, user.id, role.id).await?;
        names.push(role.name);
    }

    let token = issue_token(&state.config, user.id, &username, names.clone())?;
    Ok(TestUser {
        auth: AuthUser {
            user_id: user.id,
            username,
            roles: names,
        },
        token,
    })
}

pub async fn create_perfume(
    state: &AppState,
    name: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<perfumes::Model> {
    let perfume = perfumes::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        brand: Set("Maison Test".into()),
        description: Set(None),
        price: Set(price),
        stock: Set(stock),
        image_url: Set(None),
        published: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(perfume)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<TestResponse> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Ok(TestResponse {
        status,
        headers,
        body,
    })
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("valid request")
}

pub const BOUNDARY: &str = "perfume-store-boundary";

pub fn multipart_request(
    uri: &str,
    token: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("valid request")
}

pub fn app(state: &AppState) -> Router {
    create_app(state.clone())
}
