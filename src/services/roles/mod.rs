//! 역할/권한 관리 서비스

pub mod authority_service;
pub mod role_service;

pub use authority_service::*;
pub use role_service::*;
