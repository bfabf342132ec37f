//! Schema migrations, applied in order at startup and by the `migrate` binary.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_and_roles;
mod m20250101_000002_create_perfumes;
mod m20250101_000003_create_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_and_roles::Migration),
            Box::new(m20250101_000002_create_perfumes::Migration),
            Box::new(m20250101_000003_create_orders::Migration),
        ]
    }
}
