//! 인증 서비스 모듈
//!
//! - `TokenService`: HS256 액세스 토큰 발급/검증
//! - `RefreshTokenService`: 해시 저장 방식의 리프레시 토큰 발급/회전/폐기
//! - `password`: bcrypt 해싱 헬퍼
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{RefreshTokenService, TokenService};
//!
//! let access_token = TokenService::instance().generate_access_token(&user, &authorities)?;
//! let (refresh_token, _) = RefreshTokenService::instance().create(&user_id, ip, ua).await?;
//! ```

pub mod password;
pub mod refresh_token_service;
pub mod token_service;

pub use refresh_token_service::*;
pub use token_service::*;
