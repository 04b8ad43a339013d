pub mod prelude;

pub mod files;
pub mod orders;
pub mod users;
