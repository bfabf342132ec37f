use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::{
    dto::users::{UserList, UserRoleRequest},
    entity::{
        roles::{self, Entity as Roles},
        user_roles::{self, ActiveModel as UserRoleActive, Entity as UserRoles},
        users::{Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    repository,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn find_by_username<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Username.eq(username))
        .one(conn)
        .await?)
}

/// Role names held by one user, sorted.
pub async fn role_names<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<Vec<String>> {
    let mut names: Vec<String> = Roles::find()
        .join(JoinType::InnerJoin, roles::Relation::UserRoles.def())
        .filter(user_roles::Column::UserId.eq(user_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();
    names.sort();
    Ok(names)
}

async fn role_names_by_user<C: ConnectionTrait>(
    conn: &C,
    user_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<String>>> {
    let mut by_user: HashMap<Uuid, Vec<String>> = HashMap::new();
    if user_ids.is_empty() {
        return Ok(by_user);
    }
    let rows = UserRoles::find()
        .filter(user_roles::Column::UserId.is_in(user_ids))
        .find_also_related(Roles)
        .all(conn)
        .await?;
    for (link, role) in rows {
        if let Some(role) = role {
            by_user.entry(link.user_id).or_default().push(role.name);
        }
    }
    for names in by_user.values_mut() {
        names.sort();
    }
    Ok(by_user)
}

pub async fn list_users_page(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (users, meta) = repository::fetch_page(
        &state.orm,
        Users::find().order_by_asc(UserCol::Username),
        &pagination,
    )
    .await?;

    let mut roles = role_names_by_user(&state.orm, users.iter().map(|u| u.id).collect()).await?;
    let items = users
        .into_iter()
        .map(|u| {
            let names = roles.remove(&u.id).unwrap_or_default();
            User::from_entity(u, names)
        })
        .collect();

    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let found = repository::find_by_id::<Users, _>(&state.orm, id).await?;
    let names = role_names(&state.orm, found.id).await?;
    Ok(ApiResponse::success("User", User::from_entity(found, names), None))
}

/// Links a role to a user; linking twice is a no-op.
pub async fn grant_role<C: ConnectionTrait>(conn: &C, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
    let existing = UserRoles::find_by_id((user_id, role_id)).one(conn).await?;
    if existing.is_none() {
        UserRoleActive {
            user_id: Set(user_id),
            role_id: Set(role_id),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

pub async fn assign_role(
    state: &AppState,
    user: &AuthUser,
    payload: UserRoleRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let target = repository::find_by_id::<Users, _>(&state.orm, payload.user_id).await?;
    let role = repository::find_by_id::<Roles, _>(&state.orm, payload.role_id).await?;

    grant_role(&state.orm, target.id, role.id).await?;
    tracing::info!(user_id = %target.id, role = %role.name, "role assigned");

    let names = role_names(&state.orm, target.id).await?;
    Ok(ApiResponse::success(
        "Role assigned",
        User::from_entity(target, names),
        Some(Meta::empty()),
    ))
}

pub async fn revoke_role(state: &AppState, user: &AuthUser, payload: UserRoleRequest) -> AppResult<()> {
    ensure_admin(user)?;
    repository::find_by_id::<Users, _>(&state.orm, payload.user_id).await?;
    repository::find_by_id::<Roles, _>(&state.orm, payload.role_id).await?;

    let result = UserRoles::delete_by_id((payload.user_id, payload.role_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected > 0 {
        tracing::info!(user_id = %payload.user_id, role_id = %payload.role_id, "role revoked");
    }
    Ok(())
}
