use sea_orm_migration::{prelude::*, schema::*};

use super::m20250101_000001_create_users_and_roles::Users;
use super::m20250101_000002_create_perfumes::Perfumes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(uuid(Orders::Id).primary_key())
                    .col(string_len(Orders::OrderNumber, 40).unique_key())
                    .col(uuid(Orders::UserId))
                    .col(string(Orders::CustomerName))
                    .col(string(Orders::ShippingAddress))
                    .col(string(Orders::City))
                    .col(string_len(Orders::PostalCode, 20))
                    .col(string_len(Orders::Phone, 40))
                    .col(string_len(Orders::PaymentMethod, 40))
                    .col(string_len(Orders::Status, 20))
                    .col(big_integer(Orders::Subtotal))
                    .col(big_integer(Orders::Taxes))
                    .col(big_integer(Orders::Total))
                    .col(string_null(Orders::ReceiptImageUrl))
                    .col(timestamp_with_time_zone(Orders::CreatedAt))
                    .col(timestamp_with_time_zone(Orders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user_id")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(uuid(OrderItems::Id).primary_key())
                    .col(uuid(OrderItems::OrderId))
                    .col(uuid(OrderItems::PerfumeId))
                    .col(integer(OrderItems::Position))
                    .col(integer(OrderItems::Quantity))
                    .col(big_integer(OrderItems::UnitPrice))
                    .col(big_integer(OrderItems::TotalPrice))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_perfume")
                            .from(OrderItems::Table, OrderItems::PerfumeId)
                            .to(Perfumes::Table, Perfumes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order_id")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    UserId,
    CustomerName,
    ShippingAddress,
    City,
    PostalCode,
    Phone,
    PaymentMethod,
    Status,
    Subtotal,
    Taxes,
    Total,
    ReceiptImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    PerfumeId,
    Position,
    Quantity,
    UnitPrice,
    TotalPrice,
}
