pub mod refresh_token_repo;

pub use refresh_token_repo::*;
