//! User Entity Implementation
//!
//! 관리자 백엔드의 회원 엔티티입니다.
//! 역할은 이름(`USER`, `ADMIN`, `DEVELOPER`) 하나만 보관하고,
//! 역할과 별개로 직접 부여된 권한은 만료 시각을 가진 `AuthorityGrant` 목록으로 관리합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 기본 역할 이름
pub const ROLE_USER: &str = "USER";
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_DEVELOPER: &str = "DEVELOPER";

/// 사용자에게 직접 부여된 권한
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorityGrant {
    pub authority: String,
    pub granted_at: DateTime,
    /// 부여한 관리자 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<String>,
    /// 없으면 무기한
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime>,
}

impl AuthorityGrant {
    pub fn is_active(&self, now: DateTime) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 로그인 아이디 (unique)
    pub username: String,
    /// bcrypt 해시
    pub password_hash: String,
    /// 이메일 (unique)
    pub email: String,
    /// 역할 이름
    pub role: String,
    /// 카카오 알림 수신 번호 (unique when present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub kakao_notification_consent: bool,
    #[serde(default)]
    pub authority_grants: Vec<AuthorityGrant>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String, role: &str) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username,
            password_hash,
            email,
            role: role.to_string(),
            phone_number: None,
            kakao_notification_consent: false,
            authority_grants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.role.eq_ignore_ascii_case(role_name)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// 전화번호가 있고 수신 동의한 경우에만 알림 대상
    pub fn can_receive_notifications(&self) -> bool {
        self.kakao_notification_consent
            && self.phone_number.as_deref().is_some_and(|p| !p.trim().is_empty())
    }

    /// 공백 제거 후 비어 있지 않은 값만 반영합니다.
    pub fn update_profile(&mut self, username: Option<&str>, email: Option<&str>) {
        if let Some(username) = username.map(str::trim).filter(|s| !s.is_empty()) {
            self.username = username.to_string();
        }
        if let Some(email) = email.map(str::trim).filter(|s| !s.is_empty()) {
            self.email = email.to_string();
        }
        self.touch();
    }

    pub fn enable_kakao_notifications(&mut self) {
        self.kakao_notification_consent = true;
        self.touch();
    }

    pub fn disable_kakao_notifications(&mut self) {
        self.kakao_notification_consent = false;
        self.touch();
    }

    /// 만료되지 않은 직접 부여 권한 이름
    pub fn active_authorities(&self, now: DateTime) -> Vec<String> {
        self.authority_grants
            .iter()
            .filter(|grant| grant.is_active(now))
            .map(|grant| grant.authority.clone())
            .collect()
    }

    /// 같은 이름의 기존 부여는 교체됩니다.
    pub fn grant_authority(
        &mut self,
        authority: &str,
        granted_by: Option<String>,
        expires_at: Option<DateTime>,
    ) {
        self.authority_grants.retain(|grant| grant.authority != authority);
        self.authority_grants.push(AuthorityGrant {
            authority: authority.to_string(),
            granted_at: DateTime::now(),
            granted_by,
            expires_at,
        });
        self.touch();
    }

    /// 제거된 부여가 있으면 `true`
    pub fn revoke_authority(&mut self, authority: &str) -> bool {
        let before = self.authority_grants.len();
        self.authority_grants.retain(|grant| grant.authority != authority);
        let removed = self.authority_grants.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "dota".to_string(),
            "dota@example.com".to_string(),
            "$2b$04$hash".to_string(),
            ROLE_USER,
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = user();
        assert!(user.id.is_none());
        assert_eq!(user.role, "USER");
        assert!(!user.kakao_notification_consent);
        assert!(user.authority_grants.is_empty());
        assert!(!user.is_admin());
        assert!(user.has_role("user"));
    }

    #[test]
    fn test_can_receive_notifications() {
        let mut user = user();
        assert!(!user.can_receive_notifications());

        user.enable_kakao_notifications();
        assert!(!user.can_receive_notifications());

        user.phone_number = Some("010-1234-5678".to_string());
        assert!(user.can_receive_notifications());

        user.disable_kakao_notifications();
        assert!(!user.can_receive_notifications());
    }

    #[test]
    fn test_update_profile_ignores_blank_values() {
        let mut user = user();
        user.update_profile(Some("  "), Some("  new@example.com "));
        assert_eq!(user.username, "dota");
        assert_eq!(user.email, "new@example.com");

        user.update_profile(Some(" renamed "), None);
        assert_eq!(user.username, "renamed");
        assert_eq!(user.email, "new@example.com");
    }

    #[test]
    fn test_active_authorities_excludes_expired_grants() {
        let mut user = user();
        let now = DateTime::now();
        let past = DateTime::from_millis(now.timestamp_millis() - 60_000);
        let future = DateTime::from_millis(now.timestamp_millis() + 60_000);

        user.grant_authority("USER_READ", None, None);
        user.grant_authority("USER_WRITE", Some("admin".to_string()), Some(future));
        user.grant_authority("USER_DELETE", None, Some(past));

        let active = user.active_authorities(now);
        assert_eq!(active, vec!["USER_READ".to_string(), "USER_WRITE".to_string()]);
    }

    #[test]
    fn test_grant_replaces_and_revoke_removes() {
        let mut user = user();
        user.grant_authority("USER_READ", None, None);
        user.grant_authority("USER_READ", Some("admin".to_string()), None);
        assert_eq!(user.authority_grants.len(), 1);
        assert_eq!(user.authority_grants[0].granted_by.as_deref(), Some("admin"));

        assert!(user.revoke_authority("USER_READ"));
        assert!(!user.revoke_authority("USER_READ"));
        assert!(user.authority_grants.is_empty());
    }
}
