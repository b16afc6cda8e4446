//! # Data Transfer Objects
//!
//! HTTP 요청/응답 본문 구조입니다. 엔티티를 그대로 노출하지 않고
//! `From<Entity>` 변환으로 응답을 만듭니다.

pub mod challenges;
pub mod common;
pub mod documents;
pub mod rewards;
pub mod roles;
pub mod users;
