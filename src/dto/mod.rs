pub mod auth;
pub mod orders;
pub mod perfumes;
pub mod roles;
pub mod uploads;
pub mod users;
