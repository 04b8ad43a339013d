pub mod file_url;
pub mod status;
pub mod validation;
