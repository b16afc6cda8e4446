pub mod payment_history_repo;

pub use payment_history_repo::*;
