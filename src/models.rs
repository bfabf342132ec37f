use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{order_items, orders, perfumes, roles, users};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_entity(model: users::Model, roles: Vec<String>) -> Self {
        Self {
            id: model.id,
            username: model.username,
            roles,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<roles::Model> for Role {
    fn from(model: roles::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Perfume {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub description: Option<String>,
    /// Minor units (cents).
    pub price: i64,
    pub stock: i32,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<perfumes::Model> for Perfume {
    fn from(model: perfumes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            brand: model.brand,
            description: model.description,
            price: model.price,
            stock: model.stock,
            image_url: model.image_url,
            published: model.published,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub perfume_id: Uuid,
    pub perfume_name: String,
    pub brand: String,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
}

impl OrderItem {
    pub fn from_entity(item: order_items::Model, perfume: Option<perfumes::Model>) -> Self {
        let (perfume_name, brand, image_url) = match perfume {
            Some(p) => (p.name, p.brand, p.image_url),
            None => (String::new(), String::new(), None),
        };
        Self {
            perfume_id: item.perfume_id,
            perfume_name,
            brand,
            image_url,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub customer_name: String,
    pub shipping_address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    pub payment_method: String,
    pub status: String,
    pub subtotal: i64,
    pub taxes: i64,
    pub total: i64,
    pub receipt_image_url: Option<String>,
    pub order_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn from_entity(model: orders::Model, items: Vec<OrderItem>) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            user_id: model.user_id,
            customer_name: model.customer_name,
            shipping_address: model.shipping_address,
            city: model.city,
            postal_code: model.postal_code,
            phone: model.phone,
            payment_method: model.payment_method,
            status: model.status,
            subtotal: model.subtotal,
            taxes: model.taxes,
            total: model.total,
            receipt_image_url: model.receipt_image_url,
            order_date: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
            items,
        }
    }
}
