//! 결제 이력 서비스

pub mod payment_history_service;

pub use payment_history_service::*;
