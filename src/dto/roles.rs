use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Role;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct RoleList {
    #[schema(value_type = Vec<Role>)]
    pub items: Vec<Role>,
}
