use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderName, Request, Response, StatusCode, Uri},
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    cors::build_cors,
    error::AppError,
    response::ApiResponse,
    state::AppState,
};

pub mod auth;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod perfumes;
pub mod roles;
pub mod uploads;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_IN_FLIGHT_REQUESTS: usize = 100;

// State is bound once, in `create_app`.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/perfumes", perfumes::router())
        .nest("/roles", roles::router())
        .nest("/users", users::router())
        .nest("/orders", orders::router())
        .nest("/auth", auth::router())
        .nest("/api/upload", uploads::router())
}

fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

/// The whole application: API routes, stored files, docs and the middleware stack.
pub fn create_app(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id(request)
            )
        })
        .on_request(|request: &Request<_>, _span: &tracing::Span| {
            tracing::info!(
                request_id = %request_id(request),
                method = %request.method(),
                uri = %request.uri(),
                "request started"
            );
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    let cors = build_cors(&state.config.allowed_origins);
    let stored_files = ServeDir::new(state.files.root());

    Router::new()
        .route("/health", get(health::health_check))
        .merge(create_api_router())
        .nest_service("/uploads", stored_files)
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let err = AppError::NotFound(uri.path().to_string());
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path(), "error": err.to_string() }),
        None,
    );
    (err.status(), Json(body))
}
