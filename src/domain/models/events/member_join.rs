//! 회원 가입 이벤트
//!
//! 가입이 저장된 뒤 발행되며, 알림 리스너가 비동기로 처리합니다.

use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MemberJoinEvent {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub joined_at: DateTime<Local>,
}

impl MemberJoinEvent {
    pub fn new(user_id: String, username: String, email: String) -> Self {
        Self {
            user_id,
            username,
            email,
            joined_at: Local::now(),
        }
    }

    /// `yyyy-MM-dd HH:mm:ss` 형식
    pub fn joined_at_formatted(&self) -> String {
        self.joined_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_at_format() {
        let event = MemberJoinEvent::new("id".to_string(), "name".to_string(), "a@b.c".to_string());
        let formatted = event.joined_at_formatted();
        assert_eq!(formatted.len(), 19);
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[13..14], ":");
    }
}
