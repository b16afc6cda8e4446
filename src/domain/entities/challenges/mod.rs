//! 챌린지와 챌린지 포상 엔티티

pub mod challenge;
pub mod challenge_reward;

pub use challenge::*;
pub use challenge_reward::*;
