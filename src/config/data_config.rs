//! 데이터 및 서버 설정 관리 모듈
//!
//! 실행 환경, 비밀번호 해싱 강도, 서버 바인딩, 요청 제한, 초기 데이터 시딩 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며, 설정되지 않은 경우 `Production`을 사용합니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// 비밀번호 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// bcrypt cost를 결정합니다.
    ///
    /// `BCRYPT_COST`가 4~15 범위이면 그 값을, 아니면 환경별 기본값을 사용합니다.
    pub fn bcrypt_cost() -> u32 {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(&Environment::current()))
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// 기동 시 초기 데이터 시딩 설정
///
/// | 변수 | 기본값 |
/// |------|--------|
/// | `APP_ROLES_AUTOCREATE` | `true` |
/// | `APP_USERS_AUTOCREATE` | `true` |
/// | `APP_USERS_ADMIN_USERNAME` | `admin` |
/// | `APP_USERS_ADMIN_EMAIL` | `admin@example.com` |
/// | `APP_USERS_ADMIN_PASSWORD` | `admin123` |
/// | `APP_DATA_LOAD_INITIAL_USERS` | `false` |
pub struct SeedConfig;

impl SeedConfig {
    pub fn roles_autocreate() -> bool {
        read_bool("APP_ROLES_AUTOCREATE", true)
    }

    pub fn users_autocreate() -> bool {
        read_bool("APP_USERS_AUTOCREATE", true)
    }

    pub fn admin_username() -> String {
        env::var("APP_USERS_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string())
    }

    pub fn admin_email() -> String {
        env::var("APP_USERS_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string())
    }

    pub fn admin_password() -> String {
        env::var("APP_USERS_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string())
    }

    pub fn load_initial_users() -> bool {
        read_bool("APP_DATA_LOAD_INITIAL_USERS", false)
    }
}

/// Rate Limiting 설정
///
/// ```bash
/// # .env.dev
/// RATE_LIMIT_PER_SECOND=20
/// RATE_LIMIT_BURST_SIZE=40
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            per_second: read_number("RATE_LIMIT_PER_SECOND", 100),
            burst_size: read_number("RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}

fn read_number<T: std::str::FromStr + std::fmt::Display + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            log::error!("{} 파싱 실패: {}. 기본값 {} 사용", key, value, default);
            default
        }),
        Err(_) => default,
    }
}

/// `true/false`, `1/0`, `yes/no`, `on/off`를 해석합니다. 해석 불가 시 기본값.
pub(crate) fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

pub(crate) fn read_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| parse_bool(&v, default))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("DEV"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("stage"), Environment::Staging);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_bcrypt_cost_is_within_bcrypt_bounds() {
        let cost = PasswordConfig::bcrypt_cost();
        assert!((4..=15).contains(&cost));
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }
        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "0.0.0.0");
        }
        if env::var("PORT").is_err() && env::var("HOST").is_err() {
            assert_eq!(ServerConfig::bind_address(), "0.0.0.0:8080");
        }
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true", false));
        assert!(parse_bool(" YES ", false));
        assert!(parse_bool("1", false));
        assert!(!parse_bool("off", true));
        assert!(!parse_bool("0", true));
        assert!(parse_bool("maybe", true));
        assert!(!parse_bool("", false));
    }

    #[test]
    fn test_rate_limit_defaults() {
        if env::var("RATE_LIMIT_PER_SECOND").is_err() && env::var("RATE_LIMIT_BURST_SIZE").is_err() {
            let config = RateLimitConfig::from_env();
            assert_eq!(config.per_second, 100);
            assert_eq!(config.burst_size, 200);
        }
    }

    #[test]
    fn test_seed_defaults() {
        if env::var("APP_USERS_ADMIN_EMAIL").is_err() {
            assert_eq!(SeedConfig::admin_email(), "admin@example.com");
        }
        if env::var("APP_DATA_LOAD_INITIAL_USERS").is_err() {
            assert!(!SeedConfig::load_initial_users());
        }
    }
}
