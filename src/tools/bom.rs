//! # UTF-8 BOM 제거 작업
//!
//! 소스 트리를 재귀적으로 순회하면서 UTF-8 BOM(`EF BB BF`)으로 시작하는 파일의
//! 첫 3바이트만 제거합니다. BOM이 없는 파일은 다시 쓰지 않습니다.
//!
//! ```rust,ignore
//! let report = BomStripper::new("src")
//!     .with_extensions(["java", "kt"])
//!     .run()?;
//! println!("{} files stripped", report.stripped.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// UTF-8 Byte-Order-Mark
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 기본 대상 확장자
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["java", "kt", "rs"];

#[derive(Error, Debug)]
pub enum BomError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),
}

/// BOM 제거 실행 결과
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BomReport {
    /// 확장자가 일치해 검사한 파일 수
    pub scanned: usize,
    /// BOM을 제거한 파일의 루트 기준 상대 경로
    pub stripped: Vec<String>,
}

/// 입력이 BOM으로 시작하면 BOM 이후의 내용을 반환합니다.
///
/// 3바이트 미만이거나 BOM으로 시작하지 않으면 `None`.
pub fn strip_bom_bytes(bytes: &[u8]) -> Option<&[u8]> {
    bytes.strip_prefix(&UTF8_BOM[..])
}

/// 단일 파일의 BOM을 제자리에서 제거하고 수정 여부를 반환합니다.
pub fn strip_file(path: &Path) -> Result<bool, BomError> {
    let bytes = fs::read(path).map_err(|source| BomError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match strip_bom_bytes(&bytes) {
        Some(content) => {
            fs::write(path, content).map_err(|source| BomError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// 디렉터리 단위 BOM 제거기
#[derive(Debug, Clone)]
pub struct BomStripper {
    root: PathBuf,
    extensions: Vec<String>,
}

impl BomStripper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// 대상 확장자를 교체합니다. 앞의 `.`은 무시합니다.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// 루트 아래 모든 대상 파일을 처리합니다.
    ///
    /// # Errors
    ///
    /// * `BomError::RootNotFound` - 루트 디렉터리가 없음
    /// * `BomError::Walk` / `BomError::Io` - 순회 또는 읽기/쓰기 실패
    pub fn run(&self) -> Result<BomReport, BomError> {
        if !self.root.is_dir() {
            return Err(BomError::RootNotFound(self.root.clone()));
        }

        let mut report = BomReport::default();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }

            report.scanned += 1;

            if strip_file(entry.path())? {
                let relative = entry
                    .path()
                    .strip_prefix(&self.root)
                    .unwrap_or(entry.path())
                    .display()
                    .to_string();
                log::info!("[stripBom] Stripped BOM: {}", relative);
                report.stripped.push(relative);
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            let path = std::env::temp_dir().join(format!("strip-bom-{}", uuid::Uuid::new_v4()));
            fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        fn write(&self, relative: &str, bytes: &[u8]) -> PathBuf {
            let path = self.0.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, bytes).unwrap();
            path
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_strip_bom_bytes() {
        assert_eq!(strip_bom_bytes(b"\xEF\xBB\xBFclass A {}"), Some(&b"class A {}"[..]));
        assert_eq!(strip_bom_bytes(b"\xEF\xBB\xBF"), Some(&b""[..]));
        assert_eq!(strip_bom_bytes(b"class A {}"), None);
        assert_eq!(strip_bom_bytes(b""), None);
        assert_eq!(strip_bom_bytes(b"\xEF\xBB"), None);
    }

    #[test]
    fn test_only_one_bom_is_removed() {
        let doubled = b"\xEF\xBB\xBF\xEF\xBB\xBFx";
        assert_eq!(strip_bom_bytes(doubled), Some(&b"\xEF\xBB\xBFx"[..]));
    }

    #[test]
    fn test_strip_file_rewrites_only_bom_files() {
        let dir = ScratchDir::new();
        let with_bom = dir.write("A.java", b"\xEF\xBB\xBFpackage a;");
        let without_bom = dir.write("B.java", b"package b;");

        assert!(strip_file(&with_bom).unwrap());
        assert_eq!(fs::read(&with_bom).unwrap(), b"package a;");

        let before = fs::metadata(&without_bom).unwrap().modified().unwrap();
        assert!(!strip_file(&without_bom).unwrap());
        assert_eq!(fs::read(&without_bom).unwrap(), b"package b;");
        assert_eq!(fs::metadata(&without_bom).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn test_run_walks_recursively_and_filters_extensions() {
        let dir = ScratchDir::new();
        dir.write("main/App.java", b"\xEF\xBB\xBFclass App {}");
        dir.write("main/deep/Util.kt", b"\xEF\xBB\xBFobject Util");
        dir.write("main/Clean.java", b"class Clean {}");
        let readme = dir.write("main/README.md", b"\xEF\xBB\xBF# readme");
        let only_bom = dir.write("Empty.java", b"\xEF\xBB\xBF");
        let tiny = dir.write("Tiny.java", b"ab");

        let report = BomStripper::new(&dir.0).with_extensions(["java", "kt"]).run().unwrap();

        assert_eq!(report.scanned, 5);
        assert_eq!(report.stripped.len(), 3);
        assert!(report.stripped.iter().any(|p| p.ends_with("App.java")));
        assert!(report.stripped.iter().any(|p| p.ends_with("Util.kt")));
        assert!(report.stripped.iter().any(|p| p.ends_with("Empty.java")));

        assert_eq!(fs::read(dir.0.join("main/App.java")).unwrap(), b"class App {}");
        assert_eq!(fs::read(readme).unwrap(), b"\xEF\xBB\xBF# readme");
        assert!(fs::read(only_bom).unwrap().is_empty());
        assert_eq!(fs::read(tiny).unwrap(), b"ab");
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let dir = ScratchDir::new();
        dir.write("lib.rs", b"\xEF\xBB\xBFfn main() {}");

        let stripper = BomStripper::new(&dir.0);
        assert_eq!(stripper.run().unwrap().stripped.len(), 1);

        let second = stripper.run().unwrap();
        assert_eq!(second.scanned, 1);
        assert!(second.stripped.is_empty());
    }

    #[test]
    fn test_extension_normalization() {
        let stripper = BomStripper::new("src").with_extensions([".java", " kt ", ""]);
        assert_eq!(stripper.extensions(), &["java".to_string(), "kt".to_string()]);
        assert_eq!(BomStripper::new("src").extensions().len(), 3);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let missing = std::env::temp_dir().join(format!("strip-bom-missing-{}", uuid::Uuid::new_v4()));
        let result = BomStripper::new(&missing).run();
        assert!(matches!(result, Err(BomError::RootNotFound(_))));
    }
}
