//! 역할/권한 관리 API DTO

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
