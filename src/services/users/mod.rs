//! 사용자 관리 서비스 모듈
//!
//! 회원 가입, 인증, 프로필/권한 관리를 담당합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::users::UserService;
//!
//! let user_service = UserService::instance();
//! let user = user_service.authenticate("test1", "123456").await?;
//! let authorities = user_service.authorities_of(&user).await?;
//! ```

pub mod user_service;

pub use user_service::*;
