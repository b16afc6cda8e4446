//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인의 횡단 관심사를 처리합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출 및 HS256 검증
//! - 사용자 정보를 request extension에 저장
//! - 선택적/강제 인증 모드, 역할 요구사항 지원
//! - 실패 시 401 / 403 JSON 응답 (`AUTHENTICATION_FAILED`, `TOKEN_EXPIRED`, `ACCESS_DENIED`)
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::AuthMiddleware;
//!
//! App::new()
//!     .service(
//!         web::scope("/api/users")
//!             .wrap(AuthMiddleware::admin()) // ADMIN 전용
//!             .service(get_users),
//!     )
//!     .service(
//!         web::scope("/api/challenges")
//!             .wrap(AuthMiddleware::required()) // 로그인 사용자
//!             .service(list_challenges),
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
