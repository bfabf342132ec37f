use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, ReceiptRequest, UpdateOrderStatusRequest},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        perfumes::{Column as PerfumeCol, Entity as Perfumes, Model as PerfumeModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::{Order, OrderItem},
    repository,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub const TAX_RATE_PERCENT: i64 = 8;
pub const STATUS_PENDING: &str = "PENDIENTE";
pub const ORDER_STATUSES: [&str; 5] = ["PENDIENTE", "PAGADO", "ENVIADO", "ENTREGADO", "CANCELADO"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub taxes: i64,
    pub total: i64,
}

fn overflow() -> AppError {
    AppError::BadRequest("order amount is too large".into())
}

pub fn line_total(unit_price: i64, quantity: i32) -> AppResult<i64> {
    unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(overflow)
}

/// Tax on `subtotal` in minor units, rounded half-up.
pub fn tax_for(subtotal: i64) -> AppResult<i64> {
    subtotal
        .checked_mul(TAX_RATE_PERCENT)
        .and_then(|v| v.checked_add(50))
        .map(|v| v / 100)
        .ok_or_else(overflow)
}

pub fn compute_totals(line_totals: &[i64]) -> AppResult<OrderTotals> {
    let subtotal = line_totals
        .iter()
        .try_fold(0_i64, |acc, line| acc.checked_add(*line))
        .ok_or_else(overflow)?;
    let taxes = tax_for(subtotal)?;
    let total = subtotal.checked_add(taxes).ok_or_else(overflow)?;
    Ok(OrderTotals {
        subtotal,
        taxes,
        total,
    })
}

pub fn normalize_status(raw: &str) -> AppResult<String> {
    let status = raw.trim().to_uppercase();
    if ORDER_STATUSES.contains(&status.as_str()) {
        Ok(status)
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid order status, expected one of {}",
            ORDER_STATUSES.join(", ")
        )))
    }
}

fn validate_shipping(payload: &CreateOrderRequest) -> AppResult<()> {
    let fields = [
        ("customerName", &payload.customer_name),
        ("shippingAddress", &payload.shipping_address),
        ("city", &payload.city),
        ("paymentMethod", &payload.payment_method),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }
    Ok(())
}

fn build_order_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string().to_uppercase();
    format!("ORD-{}-{}", date, &suffix[..8])
}

struct PricedLine {
    perfume: PerfumeModel,
    quantity: i32,
    total_price: i64,
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    validate_shipping(&payload)?;
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order must contain at least one item".into()));
    }

    let txn = state.orm.begin().await?;

    let customer = Users::find_by_id(user.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("User not found: {}", user.username)))?;

    let mut lines: Vec<PricedLine> = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let perfume_id = item
            .perfume_id
            .ok_or_else(|| AppError::BadRequest("perfumeId must not be null".into()))?;
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".into(),
            ));
        }

        let perfume = Perfumes::find_by_id(perfume_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Perfume not found: {perfume_id}")))?;

        if perfume.stock < item.quantity {
            tracing::warn!(
                perfume_id = %perfume.id,
                available = perfume.stock,
                requested = item.quantity,
                "order rejected: insufficient stock"
            );
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}. Available: {}, requested: {}",
                perfume.name, perfume.stock, item.quantity
            )));
        }

        // Guarded decrement: a concurrent buyer of the last unit matches zero rows.
        let result = Perfumes::update_many()
            .col_expr(PerfumeCol::Stock, Expr::col(PerfumeCol::Stock).sub(item.quantity))
            .filter(PerfumeCol::Id.eq(perfume.id))
            .filter(PerfumeCol::Stock.gte(item.quantity))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}",
                perfume.name
            )));
        }

        let total_price = line_total(perfume.price, item.quantity)?;
        lines.push(PricedLine {
            perfume,
            quantity: item.quantity,
            total_price,
        });
    }

    let line_totals: Vec<i64> = lines.iter().map(|l| l.total_price).collect();
    let totals = compute_totals(&line_totals)?;

    let order_id = Uuid::new_v4();
    let now = Utc::now();
    let order = OrderActive {
        id: Set(order_id),
        order_number: Set(build_order_number(order_id)),
        user_id: Set(customer.id),
        customer_name: Set(payload.customer_name.trim().to_string()),
        shipping_address: Set(payload.shipping_address.trim().to_string()),
        city: Set(payload.city.trim().to_string()),
        postal_code: Set(payload.postal_code.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        payment_method: Set(payload.payment_method.trim().to_string()),
        status: Set(STATUS_PENDING.to_string()),
        subtotal: Set(totals.subtotal),
        taxes: Set(totals.taxes),
        total: Set(totals.total),
        receipt_image_url: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (position, line) in lines.into_iter().enumerate() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            perfume_id: Set(line.perfume.id),
            position: Set(position as i32),
            quantity: Set(line.quantity),
            unit_price: Set(line.perfume.price),
            total_price: Set(line.total_price),
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from_entity(item, Some(line.perfume)));
    }

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        user_id = %customer.id,
        total = order.total,
        "order created"
    );

    Ok(ApiResponse::success(
        "Order created",
        Order::from_entity(order, items),
        Some(Meta::empty()),
    ))
}

/// Items for each order, in their original request order.
async fn load_items<C: ConnectionTrait>(
    conn: &C,
    order_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<OrderItem>>> {
    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(by_order);
    }
    let rows = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Position)
        .find_also_related(Perfumes)
        .all(conn)
        .await?;
    for (item, perfume) in rows {
        by_order
            .entry(item.order_id)
            .or_default()
            .push(OrderItem::from_entity(item, perfume));
    }
    Ok(by_order)
}

async fn with_items<C: ConnectionTrait>(conn: &C, orders: Vec<OrderModel>) -> AppResult<Vec<Order>> {
    let mut items = load_items(conn, orders.iter().map(|o| o.id).collect()).await?;
    Ok(orders
        .into_iter()
        .map(|o| {
            let order_items = items.remove(&o.id).unwrap_or_default();
            Order::from_entity(o, order_items)
        })
        .collect())
}

async fn single_with_items<C: ConnectionTrait>(conn: &C, order: OrderModel) -> AppResult<Order> {
    let mut orders = with_items(conn, vec![order]).await?;
    orders
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order vanished while loading items")))
}

pub async fn list_my_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let items = with_items(&state.orm, orders).await?;
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(Meta::empty())))
}

pub async fn get_order_by_number(
    state: &AppState,
    user: &AuthUser,
    order_number: &str,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(OrderCol::OrderNumber.eq(order_number))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("order", order_number))?;
    ensure_owner_or_admin(user, order.user_id)?;

    let order = single_with_items(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status = normalize_status(&payload.status)?;
    let existing = repository::find_by_id::<Orders, _>(&state.orm, id).await?;

    let mut active: OrderActive = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
    let order = single_with_items(&state.orm, order).await?;
    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

pub async fn attach_receipt(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ReceiptRequest,
) -> AppResult<ApiResponse<Order>> {
    let receipt_url = payload.receipt_image_url.trim().to_string();
    if receipt_url.is_empty() {
        return Err(AppError::BadRequest("receiptImageUrl is required".into()));
    }

    let existing = repository::find_by_id::<Orders, _>(&state.orm, id).await?;
    ensure_owner_or_admin(user, existing.user_id)?;

    let mut active: OrderActive = existing.into();
    active.receipt_image_url = Set(Some(receipt_url));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = %order.id, "receipt attached");
    let order = single_with_items(&state.orm, order).await?;
    Ok(ApiResponse::success("Receipt attached", order, Some(Meta::empty())))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.trim().is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.trim().to_uppercase()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let (orders, meta) = repository::fetch_page(&state.orm, finder, &query.pagination()).await?;
    let items = with_items(&state.orm, orders).await?;
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn delete_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    repository::find_by_id::<Orders, _>(&txn, id).await?;
    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(id))
        .exec(&txn)
        .await?;
    repository::delete_by_id::<Orders, _>(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(order_id = %id, "order deleted");
    Ok(())
}
