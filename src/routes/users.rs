use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::users::{UserList, UserRoleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    routes::params::Pagination,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pageable", get(list_users_page))
        .route("/roles", post(assign_role).delete(revoke_role))
        .route("/{id}", get(get_user))
}

#[utoipa::path(
    get,
    path = "/users/pageable",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Page of users", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users_page(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users_page(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Get user", body = ApiResponse<User>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get_user(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/users/roles",
    request_body = UserRoleRequest,
    responses(
        (status = 200, description = "Role assigned", body = ApiResponse<User>),
        (status = 404, description = "User or role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn assign_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UserRoleRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::assign_role(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/users/roles",
    request_body = UserRoleRequest,
    responses(
        (status = 204, description = "Role revoked"),
        (status = 404, description = "User or role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn revoke_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UserRoleRequest>,
) -> AppResult<StatusCode> {
    user_service::revoke_role(&state, &user, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
