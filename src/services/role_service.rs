use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::{
    dto::roles::{RoleList, RoleRequest},
    entity::roles::{ActiveModel, Column, Entity as Roles, Model as RoleModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Role,
    repository,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const MAX_ROLE_NAME: usize = 50;

/// Role names are stored trimmed and upper-case (`admin ` -> `ADMIN`).
pub fn normalize_role_name(raw: &str) -> AppResult<String> {
    let name = raw.trim().to_uppercase();
    if name.is_empty() {
        return Err(AppError::BadRequest("role name is required".into()));
    }
    if name.chars().count() > MAX_ROLE_NAME {
        return Err(AppError::BadRequest(format!(
            "role name must be at most {MAX_ROLE_NAME} characters"
        )));
    }
    Ok(name)
}

pub async fn find_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> AppResult<Option<RoleModel>> {
    Ok(Roles::find()
        .filter(Column::Name.eq(name))
        .one(conn)
        .await?)
}

/// Returns the named role, creating it on first use.
pub async fn ensure_role<C: ConnectionTrait>(conn: &C, name: &str) -> AppResult<RoleModel> {
    let name = normalize_role_name(name)?;
    if let Some(role) = find_by_name(conn, &name).await? {
        return Ok(role);
    }
    let role = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;
    tracing::info!(role = %role.name, "role created");
    Ok(role)
}

pub async fn list_roles(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<RoleList>> {
    ensure_admin(user)?;
    let items = repository::find_all::<Roles, _>(&state.orm, Column::Name, Order::Asc)
        .await?
        .into_iter()
        .map(Role::from)
        .collect();
    Ok(ApiResponse::success("Roles", RoleList { items }, Some(Meta::empty())))
}

pub async fn list_roles_page(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<RoleList>> {
    ensure_admin(user)?;
    let (roles, meta) =
        repository::fetch_page(&state.orm, Roles::find().order_by_asc(Column::Name), &pagination)
            .await?;
    let items = roles.into_iter().map(Role::from).collect();
    Ok(ApiResponse::success("Roles", RoleList { items }, Some(meta)))
}

pub async fn get_role(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Role>> {
    ensure_admin(user)?;
    let role = repository::find_by_id::<Roles, _>(&state.orm, id).await?;
    Ok(ApiResponse::success("Role", Role::from(role), None))
}

pub async fn create_role(state: &AppState, user: &AuthUser, payload: RoleRequest) -> AppResult<Role> {
    ensure_admin(user)?;
    let name = normalize_role_name(&payload.name)?;
    if find_by_name(&state.orm, &name).await?.is_some() {
        return Err(AppError::BadRequest(format!("role {name} already exists")));
    }

    let role = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(role_id = %role.id, role = %role.name, "role created");
    Ok(Role::from(role))
}

pub async fn update_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RoleRequest,
) -> AppResult<ApiResponse<Role>> {
    ensure_admin(user)?;
    let existing = repository::find_by_id::<Roles, _>(&state.orm, id).await?;
    let name = normalize_role_name(&payload.name)?;

    if name != existing.name {
        if let Some(other) = find_by_name(&state.orm, &name).await? {
            if other.id != id {
                return Err(AppError::BadRequest(format!("role {name} already exists")));
            }
        }
    }

    let mut active: ActiveModel = existing.into();
    active.name = Set(name);
    active.description = Set(payload.description);
    let role = active.update(&state.orm).await?;

    Ok(ApiResponse::success("Updated", Role::from(role), Some(Meta::empty())))
}

pub async fn delete_role(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;
    repository::delete_by_id::<Roles, _>(&state.orm, id).await?;
    tracing::info!(role_id = %id, "role deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_are_trimmed_and_uppercased() {
        assert_eq!(normalize_role_name("  admin ").unwrap(), "ADMIN");
    }

    #[test]
    fn blank_or_long_role_names_are_rejected() {
        assert!(normalize_role_name("   ").is_err());
        assert!(normalize_role_name(&"x".repeat(51)).is_err());
    }
}
