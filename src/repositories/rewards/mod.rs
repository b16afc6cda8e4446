pub mod reward_history_repo;

pub use reward_history_repo::*;
