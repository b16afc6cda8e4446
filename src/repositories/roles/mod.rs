pub mod authority_repo;
pub mod role_repo;

pub use authority_repo::*;
pub use role_repo::*;
