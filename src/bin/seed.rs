use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use uuid::Uuid;

use perfume_store_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{Perfumes, perfumes, users},
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
    services::{auth_service::hash_password, role_service, user_service},
};

const SAMPLE_PERFUMES: [(&str, &str, &str, i64, i32); 4] = [
    ("Bleu de Chanel", "Chanel", "Woody aromatic eau de parfum", 12_900, 15),
    ("Sauvage", "Dior", "Fresh spicy eau de toilette", 11_500, 20),
    ("La Vie Est Belle", "Lancome", "Gourmand floral eau de parfum", 10_400, 12),
    ("Acqua di Gio", "Giorgio Armani", "Aquatic citrus eau de toilette", 9_800, 0),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let txn = orm.begin().await?;
    role_service::ensure_role(&txn, ROLE_USER).await?;
    let admin_id = ensure_user(&txn, "admin", "admin123", &[ROLE_ADMIN, ROLE_USER]).await?;
    let user_id = ensure_user(&txn, "cliente", "cliente123", &[ROLE_USER]).await?;
    let created = seed_perfumes(&txn).await?;
    txn.commit().await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}, perfumes added: {created}");
    Ok(())
}

async fn ensure_user<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    password: &str,
    role_names: &[&str],
) -> anyhow::Result<Uuid> {
    let user = match user_service::find_by_username(conn, username).await? {
        Some(existing) => existing,
        None => {
            users::ActiveModel {
                id: Set(Uuid::new_v4()),
                username: Set(username.to_string()),
                password_hash: Set(hash_password(password)?),
                created_at: Set(Utc::now().into()),
            }
            .insert(conn)
            .await?
        }
    };

    for name in role_names {
        let role = role_service::ensure_role(conn, name).await?;
        user_service::grant_role(conn, user.id, role.id).await?;
    }
    Ok(user.id)
}

async fn seed_perfumes<C: ConnectionTrait>(conn: &C) -> anyhow::Result<usize> {
    if Perfumes::find().count(conn).await? > 0 {
        return Ok(0);
    }

    for (name, brand, description, price, stock) in SAMPLE_PERFUMES {
        perfumes::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            brand: Set(brand.to_string()),
            description: Set(Some(description.to_string())),
            price: Set(price),
            stock: Set(stock),
            image_url: Set(None),
            published: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(conn)
        .await?;
    }
    Ok(SAMPLE_PERFUMES.len())
}
