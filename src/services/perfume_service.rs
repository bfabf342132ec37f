use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    dto::perfumes::{CreatePerfumeRequest, PerfumeList, StockUpdateRequest, UpdatePerfumeRequest},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        perfumes::{ActiveModel, Column, Entity as Perfumes},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Perfume,
    repository,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn validate_price(price: i64) -> AppResult<i64> {
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    Ok(price)
}

fn validate_stock(stock: i32) -> AppResult<i32> {
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(stock)
}

pub async fn list_perfumes(state: &AppState) -> AppResult<ApiResponse<PerfumeList>> {
    let items = repository::find_all::<Perfumes, _>(&state.orm, Column::CreatedAt, Order::Desc)
        .await?
        .into_iter()
        .map(Perfume::from)
        .collect();
    Ok(ApiResponse::success("Perfumes", PerfumeList { items }, None))
}

pub async fn list_perfumes_page(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<PerfumeList>> {
    let (perfumes, meta) = repository::fetch_page(
        &state.orm,
        Perfumes::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_asc(Column::Name),
        &pagination,
    )
    .await?;
    let items = perfumes.into_iter().map(Perfume::from).collect();
    Ok(ApiResponse::success("Perfumes", PerfumeList { items }, Some(meta)))
}

pub async fn get_perfume(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Perfume>> {
    let perfume = repository::find_by_id::<Perfumes, _>(&state.orm, id).await?;
    Ok(ApiResponse::success("Perfume", Perfume::from(perfume), None))
}

pub async fn create_perfume(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePerfumeRequest,
) -> AppResult<ApiResponse<Perfume>> {
    ensure_admin(user)?;
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(required("name", &payload.name)?),
        brand: Set(required("brand", &payload.brand)?),
        description: Set(payload.description),
        price: Set(validate_price(payload.price)?),
        stock: Set(validate_stock(payload.stock)?),
        image_url: Set(payload.image_url),
        published: Set(payload.published),
        created_at: Set(Utc::now().into()),
    };
    let perfume = active.insert(&state.orm).await?;

    tracing::info!(perfume_id = %perfume.id, name = %perfume.name, "perfume created");
    Ok(ApiResponse::success(
        "Perfume created",
        Perfume::from(perfume),
        Some(Meta::empty()),
    ))
}

pub async fn update_perfume(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePerfumeRequest,
) -> AppResult<ApiResponse<Perfume>> {
    ensure_admin(user)?;
    let existing = repository::find_by_id::<Perfumes, _>(&state.orm, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(required("name", &name)?);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(required("brand", &brand)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(validate_price(price)?);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(validate_stock(stock)?);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url).filter(|u| !u.trim().is_empty()));
    }
    if let Some(published) = payload.published {
        active.published = Set(published);
    }

    let perfume = active.update(&state.orm).await?;
    Ok(ApiResponse::success(
        "Updated",
        Perfume::from(perfume),
        Some(Meta::empty()),
    ))
}

pub async fn delete_perfume(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;
    let referenced = OrderItems::find()
        .filter(OrderItemCol::PerfumeId.eq(id))
        .count(&state.orm)
        .await?;
    if referenced > 0 {
        return Err(AppError::BadRequest(
            "perfume is referenced by existing orders".into(),
        ));
    }

    repository::delete_by_id::<Perfumes, _>(&state.orm, id).await?;
    tracing::info!(perfume_id = %id, "perfume deleted");
    Ok(())
}

pub async fn toggle_publish(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Perfume>> {
    ensure_admin(user)?;
    let existing = repository::find_by_id::<Perfumes, _>(&state.orm, id).await?;
    let published = !existing.published;

    let mut active: ActiveModel = existing.into();
    active.published = Set(published);
    let perfume = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        if published { "Published" } else { "Unpublished" },
        Perfume::from(perfume),
        Some(Meta::empty()),
    ))
}

/// Manual stock decrement after an offline sale.
pub async fn update_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StockUpdateRequest,
) -> AppResult<ApiResponse<Perfume>> {
    ensure_admin(user)?;
    if payload.quantity_sold < 0 {
        return Err(AppError::BadRequest("quantitySold must not be negative".into()));
    }

    let txn = state.orm.begin().await?;
    let existing = repository::find_by_id::<Perfumes, _>(&txn, id).await?;
    if payload.quantity_sold > existing.stock {
        return Err(AppError::BadRequest(format!(
            "Insufficient stock: available {}, requested {}",
            existing.stock, payload.quantity_sold
        )));
    }

    let result = Perfumes::update_many()
        .col_expr(Column::Stock, Expr::col(Column::Stock).sub(payload.quantity_sold))
        .filter(Column::Id.eq(id))
        .filter(Column::Stock.gte(payload.quantity_sold))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::BadRequest("Insufficient stock".into()));
    }

    let perfume = repository::find_by_id::<Perfumes, _>(&txn, id).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Stock updated",
        Perfume::from(perfume),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(required("name", "  Oud ").unwrap(), "Oud");
        assert!(required("brand", "   ").is_err());
    }

    #[test]
    fn negative_price_or_stock_is_rejected() {
        assert!(validate_price(-1).is_err());
        assert!(validate_stock(-1).is_err());
        assert_eq!(validate_price(0).unwrap(), 0);
        assert_eq!(validate_stock(3).unwrap(), 3);
    }
}
