//! 챌린지와 챌린지 포상 API DTO

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
