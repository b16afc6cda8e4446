//! 빌드 보조 작업
//!
//! - [`bom`] - 소스 트리의 UTF-8 BOM 제거 (`strip_bom` 바이너리)

pub mod bom;

pub use bom::{BomError, BomReport, BomStripper, strip_bom_bytes, strip_file};
