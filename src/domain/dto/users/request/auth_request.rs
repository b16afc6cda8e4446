//! 인증 요청관련 DTO
use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// 회원가입 요청 (일반/관리자 공통)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "사용자명은 1-50자 사이여야 합니다"))]
    pub username: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 20, message = "전화번호는 20자를 초과할 수 없습니다"))]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub kakao_notification_consent: bool,
}

/// 로그인 요청. `email`에는 사용자명도 들어올 수 있습니다.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "이메일 또는 사용자명을 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 리프레시/로그아웃 요청
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "사용자 ID가 필요합니다"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_camel_case() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username":"kim","password":"pw","email":"kim@example.com","phoneNumber":"  ","kakaoNotificationConsent":true}"#,
        )
        .unwrap();

        assert!(request.validate().is_ok());
        assert!(request.phone_number.is_none());
        assert!(request.kakao_notification_consent);
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"username":"kim","password":"pw","email":"not-an-email"}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
