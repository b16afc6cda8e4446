//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 정리, 분리
//! - [`value_utils`] - JSON 맵에서 숫자/식별자를 느슨하게 추출
//! - [`display_terminal`] - 터미널 출력 포맷팅

pub mod display_terminal;
pub mod string_utils;
pub mod value_utils;
