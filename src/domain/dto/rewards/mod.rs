//! 포상 이력 API DTO
//!
//! 포상/결제 이력 저장 요청은 외부 시스템이 보내는 임의 JSON이므로
//! `serde_json::Map`으로 받아 서비스에서 필드를 추출합니다.

pub mod response;

pub use response::*;
