//! 포상 이력 엔티티

pub mod reward_history;

pub use reward_history::*;
