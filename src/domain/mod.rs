//! # Domain Layer
//!
//! ```text
//! domain/
//! ├── entities/  ← MongoDB 문서와 매핑되는 엔티티와 도메인 규칙
//! ├── models/    ← 인증 사용자, 토큰 클레임, 이벤트
//! └── dto/       ← HTTP 요청/응답 구조
//! ```

pub mod dto;
pub mod entities;
pub mod models;
