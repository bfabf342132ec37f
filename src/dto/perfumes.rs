use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Perfume;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerfumeRequest {
    pub name: String,
    pub brand: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerfumeRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateRequest {
    #[serde(default)]
    pub quantity_sold: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PerfumeList {
    #[schema(value_type = Vec<Perfume>)]
    pub items: Vec<Perfume>,
}
