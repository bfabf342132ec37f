use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        orders::{CreateOrderRequest, OrderItemRequest, OrderList, ReceiptRequest, UpdateOrderStatusRequest},
        perfumes::{CreatePerfumeRequest, PerfumeList, StockUpdateRequest, UpdatePerfumeRequest},
        roles::{RoleList, RoleRequest},
        uploads::{DeleteFileRequest, ImageUploadResponse, ReceiptUploadResponse, UploadForm},
        users::{UserList, UserRoleRequest},
    },
    models::{Order, OrderItem, Perfume, Role, User},
    response::{ApiResponse, Meta},
    routes::{auth, health, orders, params, perfumes, roles, uploads, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        perfumes::list_perfumes,
        perfumes::list_perfumes_page,
        perfumes::get_perfume,
        perfumes::create_perfume,
        perfumes::update_perfume,
        perfumes::delete_perfume,
        perfumes::toggle_publish,
        perfumes::update_stock,
        roles::list_roles,
        roles::list_roles_page,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
        users::list_users_page,
        users::get_user,
        users::assign_role,
        users::revoke_role,
        orders::create_order,
        orders::list_my_orders,
        orders::get_order,
        orders::update_order_status,
        orders::attach_receipt,
        orders::list_all_orders,
        orders::delete_order,
        uploads::upload_image,
        uploads::upload_receipt,
        uploads::delete_file
    ),
    components(
        schemas(
            User,
            Role,
            Perfume,
            Order,
            OrderItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreatePerfumeRequest,
            UpdatePerfumeRequest,
            StockUpdateRequest,
            PerfumeList,
            RoleRequest,
            RoleList,
            UserRoleRequest,
            UserList,
            OrderItemRequest,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            ReceiptRequest,
            OrderList,
            ImageUploadResponse,
            ReceiptUploadResponse,
            DeleteFileRequest,
            UploadForm,
            params::Pagination,
            params::SortOrder,
            params::OrderListQuery,
            Meta,
            ApiResponse<Perfume>,
            ApiResponse<PerfumeList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<Role>,
            ApiResponse<User>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Perfumes", description = "Catalog endpoints"),
        (name = "Roles", description = "Role administration"),
        (name = "Users", description = "User administration"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Uploads", description = "Product image and payment receipt files"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/perfumes/{id}/stock",
            "/roles/{id}",
            "/users/roles",
            "/orders/my-orders",
            "/api/upload/file",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
