//! 접속 상태 서비스

pub mod presence_hub;
pub mod presence_service;

pub use presence_hub::*;
pub use presence_service::*;
