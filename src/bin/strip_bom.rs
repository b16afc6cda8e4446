//! 소스 트리 UTF-8 BOM 제거 도구
//!
//! ```bash
//! strip_bom                  # ./src 아래 java, kt, rs
//! strip_bom legacy --ext java,kt
//! ```

use std::process::ExitCode;

use env_logger::Env;
use log::error;

use dota_admin_backend::tools::bom::BomStripper;
use dota_admin_backend::utils::display_terminal::print_bom_summary;

const DEFAULT_ROOT: &str = "src";

struct Args {
    root: String,
    extensions: Option<Vec<String>>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut root = None;
    let mut extensions = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ext" => {
                let value = args.next().ok_or("--ext requires a value")?;
                extensions = Some(value.split(',').map(str::to_string).collect());
            }
            other if other.starts_with("--ext=") => {
                let value = &other["--ext=".len()..];
                extensions = Some(value.split(',').map(str::to_string).collect());
            }
            other if other.starts_with("--") => return Err(format!("unknown option: {}", other)),
            other => {
                if root.replace(other.to_string()).is_some() {
                    return Err("only one ROOT may be given".to_string());
                }
            }
        }
    }

    Ok(Args {
        root: root.unwrap_or_else(|| DEFAULT_ROOT.to_string()),
        extensions,
    })
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: strip_bom [ROOT] [--ext a,b,c]");
            return ExitCode::from(2);
        }
    };

    let mut stripper = BomStripper::new(&args.root);
    if let Some(extensions) = args.extensions {
        stripper = stripper.with_extensions(extensions);
    }

    match stripper.run() {
        Ok(report) => {
            print_bom_summary(&args.root, report.scanned, &report.stripped);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ BOM 제거 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Result<Args, String> {
        parse_args(values.iter().map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults_to_src() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.root, "src");
        assert!(parsed.extensions.is_none());
    }

    #[test]
    fn test_root_and_extensions() {
        let parsed = args(&["legacy", "--ext", "java,kt"]).unwrap();
        assert_eq!(parsed.root, "legacy");
        assert_eq!(parsed.extensions, Some(vec!["java".to_string(), "kt".to_string()]));

        let parsed = args(&["--ext=rs"]).unwrap();
        assert_eq!(parsed.extensions, Some(vec!["rs".to_string()]));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(args(&["--ext"]).is_err());
        assert!(args(&["a", "b"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }
}
