use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Perfumes::Table)
                    .if_not_exists()
                    .col(uuid(Perfumes::Id).primary_key())
                    .col(string_len(Perfumes::Name, 150))
                    .col(string_len(Perfumes::Brand, 100))
                    .col(text_null(Perfumes::Description))
                    .col(big_integer(Perfumes::Price))
                    .col(integer(Perfumes::Stock).default(0))
                    .col(string_null(Perfumes::ImageUrl))
                    .col(boolean(Perfumes::Published).default(false))
                    .col(timestamp_with_time_zone(Perfumes::CreatedAt))
                    .check(Expr::col(Perfumes::Stock).gte(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Perfumes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Perfumes {
    Table,
    Id,
    Name,
    Brand,
    Description,
    Price,
    Stock,
    ImageUrl,
    Published,
    CreatedAt,
}
