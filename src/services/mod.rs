pub mod auth_service;
pub mod order_service;
pub mod perfume_service;
pub mod role_service;
pub mod upload_service;
pub mod user_service;
