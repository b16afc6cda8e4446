//! 포상 이력 서비스

pub mod reward_history_service;
pub mod reward_service;

pub use reward_history_service::*;
pub use reward_service::*;
