//! 문서 엔티티

pub mod document;

pub use document::*;
