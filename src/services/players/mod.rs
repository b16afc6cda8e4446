//! 플레이어 서비스

pub mod player_service;

pub use player_service::*;
