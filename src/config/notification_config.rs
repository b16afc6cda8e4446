//! 알림 연동 설정 (KakaoTalk, 이메일 API)

use std::env;

use super::data_config::read_bool;

pub struct KakaoConfig;

impl KakaoConfig {
    /// 비어 있으면 카카오 알림을 보내지 않습니다.
    pub fn api_key() -> String {
        env::var("KAKAO_API_KEY").unwrap_or_default().trim().to_string()
    }

    pub fn api_url() -> String {
        env::var("KAKAO_API_URL").unwrap_or_else(|_| {
            "https://kapi.kakao.com/v2/api/talk/memo/default/send".to_string()
        })
    }

    pub fn link_url() -> String {
        env::var("KAKAO_LINK_URL").unwrap_or_else(|_| "https://dota-task.shop".to_string())
    }

    pub fn is_enabled() -> bool {
        !Self::api_key().is_empty()
    }
}

/// HTTP 이메일 API 설정
///
/// `EMAIL_API_BASE_URL`이 비어 있으면 이메일 발송이 비활성화됩니다.
pub struct EmailConfig;

impl EmailConfig {
    pub fn enabled() -> bool {
        read_bool("EMAIL_NOTIFICATION_ENABLED", true)
    }

    pub fn admin_email() -> String {
        env::var("EMAIL_ADMIN_ADDRESS").unwrap_or_else(|_| "admin@example.com".to_string())
    }

    pub fn api_base_url() -> Option<String> {
        env::var("EMAIL_API_BASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn sender() -> String {
        env::var("EMAIL_SENDER").unwrap_or_else(|_| "no-reply@dota-task.shop".to_string())
    }

    pub fn authorization_token() -> String {
        env::var("EMAIL_AUTHORIZATION_TOKEN").unwrap_or_default()
    }

    pub fn timeout_millis() -> u64 {
        env::var("EMAIL_TIMEOUT_MILLIS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kakao_defaults() {
        if env::var("KAKAO_API_URL").is_err() {
            assert!(KakaoConfig::api_url().starts_with("https://kapi.kakao.com/"));
        }
        if env::var("KAKAO_API_KEY").is_err() {
            assert!(!KakaoConfig::is_enabled());
        }
    }

    #[test]
    fn test_email_defaults() {
        if env::var("EMAIL_TIMEOUT_MILLIS").is_err() {
            assert_eq!(EmailConfig::timeout_millis(), 10_000);
        }
        if env::var("EMAIL_ADMIN_ADDRESS").is_err() {
            assert_eq!(EmailConfig::admin_email(), "admin@example.com");
        }
    }
}
