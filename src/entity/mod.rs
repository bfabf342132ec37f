pub mod order_items;
pub mod orders;
pub mod perfumes;
pub mod roles;
pub mod user_roles;
pub mod users;

pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use perfumes::Entity as Perfumes;
pub use roles::Entity as Roles;
pub use user_roles::Entity as UserRoles;
pub use users::Entity as Users;
