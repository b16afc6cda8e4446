pub mod challenge_repo;
pub mod challenge_reward_repo;

pub use challenge_repo::*;
pub use challenge_reward_repo::*;
