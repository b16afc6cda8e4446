use mongodb::bson::DateTime;
use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// 관리자 사용자 수정 요청. 비어 있는 값은 무시됩니다.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "사용자명은 50자를 초과할 수 없습니다"))]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationSettingRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 사용자 직접 권한 부여
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GrantAuthorityRequest {
    #[validate(length(min = 1, max = 100, message = "권한 이름은 1-100자 사이여야 합니다"))]
    pub authority: String,

    /// RFC 3339 형식
    #[serde(default)]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl GrantAuthorityRequest {
    pub fn expires_at_bson(&self) -> Option<DateTime> {
        self.expires_at
            .map(|dt| DateTime::from_millis(dt.timestamp_millis()))
    }
}

/// `GET /api/users?page=&size=&role=`
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
    pub role: Option<String>,
}

fn default_size() -> u64 {
    crate::domain::dto::common::DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}
