//! 챌린지와 챌린지 포상 서비스

pub mod challenge_reward_service;
pub mod challenge_service;

pub use challenge_reward_service::*;
pub use challenge_service::*;
