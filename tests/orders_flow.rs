mod common;

use perfume_store_api::{
    dto::{
        orders::{CreateOrderRequest, OrderItemRequest, ReceiptRequest, UpdateOrderStatusRequest},
        perfumes::StockUpdateRequest,
    },
    entity::Perfumes,
    error::AppError,
    routes::params::OrderListQuery,
    services::{order_service, perfume_service},
    state::AppState,
};
use sea_orm::EntityTrait;
use uuid::Uuid;

use common::{create_perfume, create_user, setup_state};

fn order_request(items: Vec<(Uuid, i32)>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: "Lucia Perez".into(),
        shipping_address: "Av. Siempre Viva 742".into(),
        city: "Lima".into(),
        postal_code: "15001".into(),
        phone: "+51 999 888 777".into(),
        payment_method: "YAPE".into(),
        items: items
            .into_iter()
            .map(|(perfume_id, quantity)| OrderItemRequest {
                perfume_id: Some(perfume_id),
                quantity,
            })
            .collect(),
    }
}

async fn stock_of(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let perfume = Perfumes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("perfume {id} missing"))?;
    Ok(perfume.stock)
}

// Customer places an order, then the admin moves it through its lifecycle.
#[tokio::test]
async fn place_order_and_manage_it() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let customer = create_user(&state, &["USER"]).await?;
    let admin = create_user(&state, &["ADMIN", "USER"]).await?;

    let oud = create_perfume(&state, "Oud Royal", 12_900, 5).await?;
    let musk = create_perfume(&state, "White Musk", 9_950, 3).await?;

    let resp = order_service::create_order(
        &state,
        &customer.auth,
        order_request(vec![(oud.id, 2), (musk.id, 1)]),
    )
    .await?;
    let order = resp.data.expect("order data");

    assert_eq!(order.status, "PENDIENTE");
    assert_eq!(order.subtotal, 35_750);
    assert_eq!(order.taxes, 2_860);
    assert_eq!(order.total, 38_610);
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].perfume_name, "Oud Royal");
    assert_eq!(order.items[0].total_price, 25_800);
    assert_eq!(order.items[1].unit_price, 9_950);

    assert_eq!(stock_of(&state, oud.id).await?, 3);
    assert_eq!(stock_of(&state, musk.id).await?, 2);

    // Owner and admin can read it by number, strangers cannot.
    let mine = order_service::get_order_by_number(&state, &customer.auth, &order.order_number).await?;
    assert_eq!(mine.data.expect("order").id, order.id);
    order_service::get_order_by_number(&state, &admin.auth, &order.order_number).await?;
    let stranger = create_user(&state, &["USER"]).await?;
    assert!(matches!(
        order_service::get_order_by_number(&state, &stranger.auth, &order.order_number).await,
        Err(AppError::Forbidden)
    ));

    let my_orders = order_service::list_my_orders(&state, &customer.auth).await?;
    assert_eq!(my_orders.data.expect("orders").items.len(), 1);
    let none = order_service::list_my_orders(&state, &stranger.auth).await?;
    assert!(none.data.expect("orders").items.is_empty());

    let with_receipt = order_service::attach_receipt(
        &state,
        &customer.auth,
        order.id,
        ReceiptRequest {
            receipt_image_url: "/uploads/receipt_abc.pdf".into(),
        },
    )
    .await?;
    assert_eq!(
        with_receipt.data.expect("order").receipt_image_url.as_deref(),
        Some("/uploads/receipt_abc.pdf")
    );

    // Only admins change status, and only to known values.
    assert!(matches!(
        order_service::update_order_status(
            &state,
            &customer.auth,
            order.id,
            UpdateOrderStatusRequest { status: "PAGADO".into() },
        )
        .await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        order_service::update_order_status(
            &state,
            &admin.auth,
            order.id,
            UpdateOrderStatusRequest { status: "LOST".into() },
        )
        .await,
        Err(AppError::BadRequest(_))
    ));
    let paid = order_service::update_order_status(
        &state,
        &admin.auth,
        order.id,
        UpdateOrderStatusRequest { status: "pagado".into() },
    )
    .await?;
    assert_eq!(paid.data.expect("order").status, "PAGADO");

    let filtered = order_service::list_all_orders(
        &state,
        &admin.auth,
        OrderListQuery {
            status: Some("PAGADO".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(filtered.meta.as_ref().and_then(|m| m.total), Some(1));
    let pending = order_service::list_all_orders(
        &state,
        &admin.auth,
        OrderListQuery {
            status: Some("PENDIENTE".into()),
            ..Default::default()
        },
    )
    .await?;
    assert!(pending.data.expect("orders").items.is_empty());

    // A perfume that appears on an order cannot be deleted.
    assert!(matches!(
        perfume_service::delete_perfume(&state, &admin.auth, oud.id).await,
        Err(AppError::BadRequest(_))
    ));

    order_service::delete_order(&state, &admin.auth, order.id).await?;
    assert!(matches!(
        order_service::get_order_by_number(&state, &admin.auth, &order.order_number).await,
        Err(AppError::NotFound(_))
    ));
    perfume_service::delete_perfume(&state, &admin.auth, oud.id).await?;

    Ok(())
}

#[tokio::test]
async fn failed_order_leaves_every_stock_unchanged() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let customer = create_user(&state, &["USER"]).await?;

    let first = create_perfume(&state, "Amber Night", 5_000, 4).await?;
    let second = create_perfume(&state, "Citrus Day", 4_000, 1).await?;

    // The first line is valid and is processed before the second one fails.
    let result = order_service::create_order(
        &state,
        &customer.auth,
        order_request(vec![(first.id, 3), (second.id, 2)]),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    assert_eq!(stock_of(&state, first.id).await?, 4);
    assert_eq!(stock_of(&state, second.id).await?, 1);
    let orders = order_service::list_my_orders(&state, &customer.auth).await?;
    assert!(orders.data.expect("orders").items.is_empty());

    Ok(())
}

#[tokio::test]
async fn repeated_lines_for_one_perfume_share_its_stock() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let customer = create_user(&state, &["USER"]).await?;
    let perfume = create_perfume(&state, "Tuberose", 8_000, 3).await?;

    // Each line fits on its own; together they need 4 of 3.
    let result = order_service::create_order(
        &state,
        &customer.auth,
        order_request(vec![(perfume.id, 2), (perfume.id, 2)]),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(stock_of(&state, perfume.id).await?, 3);

    let resp = order_service::create_order(
        &state,
        &customer.auth,
        order_request(vec![(perfume.id, 2), (perfume.id, 1)]),
    )
    .await?;
    let order = resp.data.expect("order data");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.subtotal, 24_000);
    assert_eq!(stock_of(&state, perfume.id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn order_input_is_validated() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let customer = create_user(&state, &["USER"]).await?;
    let perfume = create_perfume(&state, "Vetiver", 7_000, 2).await?;

    let empty = order_service::create_order(&state, &customer.auth, order_request(vec![])).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    let zero = order_service::create_order(
        &state,
        &customer.auth,
        order_request(vec![(perfume.id, 0)]),
    )
    .await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    let unknown = order_service::create_order(
        &state,
        &customer.auth,
        order_request(vec![(Uuid::new_v4(), 1)]),
    )
    .await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));

    let mut null_id = order_request(vec![(perfume.id, 1)]);
    null_id.items[0].perfume_id = None;
    let null_id = order_service::create_order(&state, &customer.auth, null_id).await;
    assert!(matches!(null_id, Err(AppError::BadRequest(_))));

    assert_eq!(stock_of(&state, perfume.id).await?, 2);
    Ok(())
}

#[tokio::test]
async fn manual_stock_update_never_goes_negative() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let admin = create_user(&state, &["ADMIN"]).await?;
    let perfume = create_perfume(&state, "Rose Absolue", 15_000, 3).await?;

    let resp = perfume_service::update_stock(
        &state,
        &admin.auth,
        perfume.id,
        StockUpdateRequest { quantity_sold: 2 },
    )
    .await?;
    assert_eq!(resp.data.expect("perfume").stock, 1);

    let too_many = perfume_service::update_stock(
        &state,
        &admin.auth,
        perfume.id,
        StockUpdateRequest { quantity_sold: 2 },
    )
    .await;
    assert!(matches!(too_many, Err(AppError::BadRequest(_))));
    assert_eq!(stock_of(&state, perfume.id).await?, 1);

    Ok(())
}
