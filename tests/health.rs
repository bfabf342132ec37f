mod common;

use axum::{extract::State, http::StatusCode};
use perfume_store_api::{routes::health::health_check, state::AppState};

use common::{app, empty_request, send, setup_state};

#[tokio::test]
async fn health_check_returns_ok() -> anyhow::Result<()> {
    let state: AppState = setup_state().await?;
    let response = health_check(State(state)).await?;
    assert_eq!(response.0.message, "Health check");
    assert!(response.0.data.is_some());
    Ok(())
}

#[tokio::test]
async fn health_route_and_unknown_paths() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let app = app(&state);

    let res = send(&app, empty_request("GET", "/health", None)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "ok");
    assert!(res.headers.contains_key("x-request-id"));

    let res = send(&app, empty_request("GET", "/no-such-page", None)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["data"]["path"], "/no-such-page");
    Ok(())
}
