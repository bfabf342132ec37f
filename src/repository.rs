//! CRUD helpers shared by every `Uuid`-keyed entity.
//!
//! Each domain service composes these with its own validation instead of
//! re-implementing lookup, paging and not-found handling per table.

use sea_orm::{
    ConnectionTrait, EntityName, EntityTrait, Order, PaginatorTrait, PrimaryKeyTrait, QueryOrder,
    Select,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    response::Meta,
    routes::params::Pagination,
};

/// Every row, sorted by `column` in the database.
pub async fn find_all<E, C>(conn: &C, column: E::Column, order: Order) -> AppResult<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    Ok(E::find().order_by(column, order).all(conn).await?)
}

pub async fn find_by_id<E, C>(conn: &C, id: Uuid) -> AppResult<E::Model>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(&label::<E>(), id))
}

/// Runs `select` one page at a time; ordering is the caller's choice.
pub async fn fetch_page<E, C>(
    conn: &C,
    select: Select<E>,
    pagination: &Pagination,
) -> AppResult<(Vec<E::Model>, Meta)>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
    C: ConnectionTrait,
{
    let (page, per_page, _) = pagination.normalize();
    let paginator = select.paginate(conn, per_page as u64);
    let total = paginator.num_items().await? as i64;
    let items = paginator.fetch_page((page - 1) as u64).await?;
    Ok((items, Meta::new(page, per_page, total)))
}

pub async fn delete_by_id<E, C>(conn: &C, id: Uuid) -> AppResult<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    C: ConnectionTrait,
{
    let result = E::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found(&label::<E>(), id));
    }
    Ok(())
}

/// Singular, human readable entity name: `perfumes` -> `perfume`.
fn label<E: EntityName>() -> String {
    let table = E::default().table_name().to_owned();
    table.strip_suffix('s').map(str::to_owned).unwrap_or(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Orders, Perfumes, UserRoles};

    #[test]
    fn label_is_singular_table_name() {
        assert_eq!(label::<Perfumes>(), "perfume");
        assert_eq!(label::<Orders>(), "order");
        assert_eq!(label::<UserRoles>(), "user_role");
    }
}
