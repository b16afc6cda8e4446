//! 초기 데이터/테스트 데이터 서비스

pub mod seed_service;

pub use seed_service::*;
