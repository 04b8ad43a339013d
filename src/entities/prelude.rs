pub use super::files::Entity as Files;
pub use super::orders::Entity as Orders;
pub use super::users::Entity as Users;
