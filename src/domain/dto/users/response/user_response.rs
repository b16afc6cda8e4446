use serde::Serialize;

use crate::domain::dto::common::format_datetime;
use crate::domain::entities::users::User;

/// 사용자 응답 DTO. 비밀번호 해시는 포함하지 않습니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub kakao_notification_consent: bool,
    pub authorities: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let authorities = user.active_authorities(mongodb::bson::DateTime::now());
        let id = user.id_string().unwrap_or_default();
        let User {
            username,
            email,
            role,
            phone_number,
            kakao_notification_consent,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id,
            username,
            email,
            role,
            phone_number,
            kakao_notification_consent,
            authorities,
            created_at: format_datetime(&created_at),
            updated_at: format_datetime(&updated_at),
        }
    }
}

/// 로그인 응답
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub authorities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password() {
        let user = User::new(
            "kim".to_string(),
            "kim@example.com".to_string(),
            "$2b$04$hash".to_string(),
            "USER",
        );
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["username"], "kim");
        assert_eq!(json["role"], "USER");
        assert_eq!(json["kakaoNotificationConsent"], false);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
