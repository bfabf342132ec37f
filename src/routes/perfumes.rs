use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::perfumes::{CreatePerfumeRequest, PerfumeList, StockUpdateRequest, UpdatePerfumeRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Perfume,
    response::ApiResponse,
    routes::params::Pagination,
    services::perfume_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_perfumes).post(create_perfume))
        .route("/pageable", get(list_perfumes_page))
        .route(
            "/{id}",
            get(get_perfume).put(update_perfume).delete(delete_perfume),
        )
        .route("/{id}/publish", put(toggle_publish))
        .route("/{id}/stock", put(update_stock))
}

#[utoipa::path(
    get,
    path = "/perfumes",
    responses(
        (status = 200, description = "List all perfumes", body = ApiResponse<PerfumeList>)
    ),
    tag = "Perfumes"
)]
pub async fn list_perfumes(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PerfumeList>>> {
    let resp = perfume_service::list_perfumes(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/perfumes/pageable",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Page of perfumes", body = ApiResponse<PerfumeList>)
    ),
    tag = "Perfumes"
)]
pub async fn list_perfumes_page(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PerfumeList>>> {
    let resp = perfume_service::list_perfumes_page(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/perfumes/{id}",
    params(
        ("id" = Uuid, Path, description = "Perfume ID")
    ),
    responses(
        (status = 200, description = "Get perfume", body = ApiResponse<Perfume>),
        (status = 404, description = "Perfume not found"),
    ),
    tag = "Perfumes"
)]
pub async fn get_perfume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Perfume>>> {
    let resp = perfume_service::get_perfume(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/perfumes",
    request_body = CreatePerfumeRequest,
    responses(
        (status = 201, description = "Create perfume", body = ApiResponse<Perfume>),
        (status = 400, description = "Invalid perfume"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Perfumes"
)]
pub async fn create_perfume(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePerfumeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Perfume>>)> {
    let resp = perfume_service::create_perfume(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/perfumes/{id}",
    params(
        ("id" = Uuid, Path, description = "Perfume ID")
    ),
    request_body = UpdatePerfumeRequest,
    responses(
        (status = 200, description = "Updated perfume", body = ApiResponse<Perfume>),
        (status = 400, description = "Invalid perfume"),
        (status = 404, description = "Perfume not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Perfumes"
)]
pub async fn update_perfume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePerfumeRequest>,
) -> AppResult<Json<ApiResponse<Perfume>>> {
    let resp = perfume_service::update_perfume(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/perfumes/{id}",
    params(
        ("id" = Uuid, Path, description = "Perfume ID")
    ),
    responses(
        (status = 204, description = "Deleted perfume"),
        (status = 400, description = "Perfume is referenced by orders"),
        (status = 404, description = "Perfume not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Perfumes"
)]
pub async fn delete_perfume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    perfume_service::delete_perfume(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/perfumes/{id}/publish",
    params(
        ("id" = Uuid, Path, description = "Perfume ID")
    ),
    responses(
        (status = 200, description = "Toggled published flag", body = ApiResponse<Perfume>),
        (status = 404, description = "Perfume not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Perfumes"
)]
pub async fn toggle_publish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Perfume>>> {
    let resp = perfume_service::toggle_publish(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/perfumes/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Perfume ID")
    ),
    request_body = StockUpdateRequest,
    responses(
        (status = 200, description = "Stock decremented", body = ApiResponse<Perfume>),
        (status = 400, description = "Insufficient stock"),
        (status = 404, description = "Perfume not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Perfumes"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockUpdateRequest>,
) -> AppResult<Json<ApiResponse<Perfume>>> {
    let resp = perfume_service::update_stock(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
