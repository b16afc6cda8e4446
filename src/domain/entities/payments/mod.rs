//! 결제 이력 엔티티

pub mod payment_history;

pub use payment_history::*;
