//! 인증 관련 설정 관리 모듈
//!
//! JWT 서명 비밀키와 토큰 수명을 환경 변수에서 읽어옵니다.
//! 비밀키는 처음 읽을 때 한 번만 확정되며, 수명은 상한으로 잘립니다.

use std::env;

use once_cell::sync::OnceCell;

const DEFAULT_SECRET: &str = "dota-admin-backend-dev-secret-change-me";

const DEFAULT_EXPIRATION_HOURS: i64 = 24;
/// 액세스 토큰 수명 상한 (1년)
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

const DEFAULT_REFRESH_EXPIRATION_DAYS: i64 = 7;
/// 리프레시 토큰 수명 상한 (1년)
pub const MAX_REFRESH_EXPIRATION_DAYS: i64 = 365;

static JWT_SECRET: OnceCell<String> = OnceCell::new();

/// JWT 토큰 설정
///
/// # 환경 변수
///
/// | 변수 | 기본값 | 설명 |
/// |------|--------|------|
/// | `JWT_SECRET` | 개발용 기본값 | HS256 서명 비밀키 |
/// | `JWT_EXPIRATION_HOURS` | 24 | 액세스 토큰 수명(시간), 최대 8760 |
/// | `JWT_REFRESH_EXPIRATION_DAYS` | 7 | 리프레시 토큰 수명(일), 최대 365 |
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        JWT_SECRET
            .get_or_init(|| {
                env::var("JWT_SECRET")
                    .ok()
                    .filter(|secret| !secret.is_empty())
                    .unwrap_or_else(|| {
                        log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                        DEFAULT_SECRET.to_string()
                    })
            })
            .clone()
    }

    pub fn expiration_hours() -> i64 {
        parse_lifetime(
            "JWT_EXPIRATION_HOURS",
            env::var("JWT_EXPIRATION_HOURS").ok().as_deref(),
            DEFAULT_EXPIRATION_HOURS,
            MAX_EXPIRATION_HOURS,
        )
    }

    pub fn refresh_expiration_days() -> i64 {
        parse_lifetime(
            "JWT_REFRESH_EXPIRATION_DAYS",
            env::var("JWT_REFRESH_EXPIRATION_DAYS").ok().as_deref(),
            DEFAULT_REFRESH_EXPIRATION_DAYS,
            MAX_REFRESH_EXPIRATION_DAYS,
        )
    }

    /// 액세스 토큰 수명(초)
    pub fn expiration_seconds() -> i64 {
        Self::expiration_hours() * 3600
    }
}

/// 양수가 아니거나 숫자가 아니면 기본값, 상한을 넘으면 상한
fn parse_lifetime(name: &str, raw: Option<&str>, default: i64, max: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Ok(value) if value > max => {
            log::warn!("{}={} 은(는) 상한을 넘어 {}(으)로 제한합니다", name, value, max);
            max
        }
        Ok(value) if value > 0 => value,
        _ => {
            log::error!("{} 값이 올바르지 않습니다: {} (기본값 {} 사용)", name, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_defaults() {
        if env::var("JWT_EXPIRATION_HOURS").is_err() {
            assert_eq!(JwtConfig::expiration_hours(), 24);
            assert_eq!(JwtConfig::expiration_seconds(), 24 * 3600);
        }
        if env::var("JWT_REFRESH_EXPIRATION_DAYS").is_err() {
            assert_eq!(JwtConfig::refresh_expiration_days(), 7);
        }
    }

    #[test]
    fn test_lifetime_is_clamped() {
        assert_eq!(parse_lifetime("H", None, 24, MAX_EXPIRATION_HOURS), 24);
        assert_eq!(parse_lifetime("H", Some("12"), 24, MAX_EXPIRATION_HOURS), 12);
        assert_eq!(parse_lifetime("H", Some("0"), 24, MAX_EXPIRATION_HOURS), 24);
        assert_eq!(parse_lifetime("H", Some("-5"), 24, MAX_EXPIRATION_HOURS), 24);
        assert_eq!(parse_lifetime("H", Some("abc"), 24, MAX_EXPIRATION_HOURS), 24);

        let huge = i64::MAX.to_string();
        let hours = parse_lifetime("H", Some(&huge), 24, MAX_EXPIRATION_HOURS);
        assert_eq!(hours, MAX_EXPIRATION_HOURS);
        // 초 환산과 날짜 계산이 넘치지 않는 범위
        assert!(hours.checked_mul(3600).is_some());
        assert!(chrono::Duration::try_days(MAX_REFRESH_EXPIRATION_DAYS).is_some());
    }

    #[test]
    fn test_secret_is_resolved_once() {
        let first = JwtConfig::secret();
        assert!(!first.is_empty());
        assert_eq!(JwtConfig::secret(), first);
    }
}
