//! 역할/권한 엔티티

pub mod authority;
pub mod role;

pub use authority::*;
pub use role::*;
