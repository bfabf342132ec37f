use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub perfume_id: Uuid,
    pub position: i32,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::perfumes::Entity",
        from = "Column::PerfumeId",
        to = "super::perfumes::Column::Id"
    )]
    Perfumes,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::perfumes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Perfumes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
