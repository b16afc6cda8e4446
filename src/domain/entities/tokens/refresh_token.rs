//! 리프레시 토큰 엔티티
//!
//! 원문 토큰은 저장하지 않고 bcrypt 해시만 보관합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

pub const IP_MAX_LEN: usize = 64;
pub const USER_AGENT_MAX_LEN: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: DateTime,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime,
}

impl RefreshToken {
    /// ip와 user_agent는 최대 길이로 잘립니다.
    pub fn new(
        user_id: String,
        token_hash: String,
        expires_at: DateTime,
        ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        Self {
            id: None,
            user_id,
            token_hash,
            expires_at,
            revoked: false,
            ip: ip.map(|v| truncate(v, IP_MAX_LEN)),
            user_agent: user_agent.map(|v| truncate(v, USER_AGENT_MAX_LEN)),
            created_at: DateTime::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime) -> bool {
        self.expires_at <= now
    }

    pub fn is_usable(&self, now: DateTime) -> bool {
        !self.revoked && !self.is_expired(now)
    }

    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in_millis: i64) -> RefreshToken {
        let expires_at = DateTime::from_millis(DateTime::now().timestamp_millis() + expires_in_millis);
        RefreshToken::new("u1".to_string(), "hash".to_string(), expires_at, None, None)
    }

    #[test]
    fn test_usable_until_revoked_or_expired() {
        let now = DateTime::now();
        let mut live = token(60_000);
        assert!(live.is_usable(now));

        live.revoke();
        assert!(!live.is_usable(now));

        let expired = token(-1_000);
        assert!(expired.is_expired(now));
        assert!(!expired.is_usable(now));
    }

    #[test]
    fn test_truncates_client_info() {
        let long_agent = "a".repeat(300);
        let t = RefreshToken::new(
            "u".to_string(),
            "h".to_string(),
            DateTime::now(),
            Some("127.0.0.1"),
            Some(&long_agent),
        );
        assert_eq!(t.ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(t.user_agent.map(|s| s.len()), Some(USER_AGENT_MAX_LEN));
    }
}
