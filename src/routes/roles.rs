use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::roles::{RoleList, RoleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Role,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::role_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/pageable", get(list_roles_page))
        .route("/{id}", get(get_role).put(update_role).delete(delete_role))
}

#[utoipa::path(
    get,
    path = "/roles",
    responses(
        (status = 200, description = "List roles", body = ApiResponse<RoleList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn list_roles(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RoleList>>> {
    let resp = role_service::list_roles(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/roles/pageable",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Page of roles", body = ApiResponse<RoleList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn list_roles_page(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<RoleList>>> {
    let resp = role_service::list_roles_page(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Get role", body = ApiResponse<Role>),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn get_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = role_service::get_role(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created, Location points at it", body = ApiResponse<Role>),
        (status = 400, description = "Invalid or duplicate role name"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn create_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RoleRequest>,
) -> AppResult<impl IntoResponse> {
    let role = role_service::create_role(&state, &user, payload).await?;
    let location = format!("/roles/{}", role.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success("Role created", role, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    put,
    path = "/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Updated role", body = ApiResponse<Role>),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = role_service::update_role(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Deleted role"),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn delete_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    role_service::delete_role(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
