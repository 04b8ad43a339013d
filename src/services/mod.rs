pub mod attachment_service;
pub mod error;
pub mod order_service;
pub mod storage;
