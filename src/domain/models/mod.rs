//! # Domain Models Module
//!
//! 저장되지 않는 도메인 모델과 값 객체입니다.
//!
//! ```text
//! models/
//! ├── auth/    ← 인증된 사용자, 인증 모드와 요구 역할
//! ├── token/   ← JWT 클레임과 토큰 쌍
//! └── events/  ← 애플리케이션 이벤트 (회원 가입)
//! ```

pub mod auth;
pub mod events;
pub mod token;
