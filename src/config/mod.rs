//! 애플리케이션 설정
//!
//! 모든 설정은 환경 변수에서 읽으며 정적 메서드로 노출됩니다.
//! `.env.dev` / `.env.prod` 파일은 `main.rs`에서 `PROFILE`에 따라 로드됩니다.

pub mod auth_config;
pub mod cors_config;
pub mod data_config;
pub mod notification_config;

pub use auth_config::*;
pub use cors_config::*;
pub use data_config::*;
pub use notification_config::*;
