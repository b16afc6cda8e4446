//! WebSocket 접속 상태 허브
//!
//! `/ws`에 연결된 세션을 보관하고, 사용자가 온라인/오프라인이 될 때
//! 모든 세션에 `PRESENCE_UPDATE` 메시지를 보냅니다.
//!
//! ```json
//! { "type": "PRESENCE_UPDATE", "action": "joined", "userId": "kim@example.com",
//!   "online": ["kim@example.com"], "timestamp": 1735689600000 }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use actix_ws::Session;
use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::core::registry::ServiceRegistration;

use super::PresenceService;

static PRESENCE_HUB_INSTANCE: OnceCell<Arc<PresenceHub>> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceAction {
    Joined,
    Left,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdate {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub action: PresenceAction,
    pub user_id: String,
    pub online: Vec<String>,
    pub timestamp: i64,
}

impl PresenceUpdate {
    pub fn new(action: PresenceAction, user_id: &str, online: Vec<String>) -> Self {
        Self {
            kind: "PRESENCE_UPDATE",
            action,
            user_id: user_id.to_string(),
            online,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

pub struct PresenceHub {
    presence: Arc<PresenceService>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl PresenceHub {
    fn new() -> Self {
        Self::with_presence(PresenceService::instance())
    }

    fn with_presence(presence: Arc<PresenceService>) -> Self {
        Self {
            presence,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn instance() -> Arc<Self> {
        PRESENCE_HUB_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 세션을 등록하고, 사용자가 새로 온라인이 되었으면 알립니다.
    pub async fn join(&self, session_id: &str, user_id: &str, session: Session) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.to_string(), session);

        if self.presence.on_connect(session_id, user_id) {
            self.broadcast(PresenceAction::Joined, user_id).await;
        }
    }

    /// 세션을 제거하고, 사용자의 마지막 세션이었으면 알립니다.
    pub async fn leave(&self, session_id: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id);

        if let Some(user_id) = self.presence.on_disconnect(session_id) {
            if !self.presence.is_online(&user_id) {
                self.broadcast(PresenceAction::Left, &user_id).await;
            }
        }
    }

    pub fn touch(&self, user_id: &str) {
        self.presence.update_user_activity(user_id);
    }

    async fn broadcast(&self, action: PresenceAction, user_id: &str) {
        let update = PresenceUpdate::new(action, user_id, self.presence.online_users());
        let message = match serde_json::to_string(&update) {
            Ok(message) => message,
            Err(e) => {
                log::error!("접속 상태 메시지 직렬화 실패: {}", e);
                return;
            }
        };

        // 잠금을 쥔 채 await 하지 않도록 복제본으로 보냅니다
        let targets: Vec<(String, Session)> = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, session)| (id.clone(), session.clone()))
            .collect();

        let mut closed = Vec::new();
        for (id, mut session) in targets {
            if session.text(message.clone()).await.is_err() {
                closed.push(id);
            }
        }

        if !closed.is_empty() {
            let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
            for id in &closed {
                sessions.remove(id);
            }
            log::debug!("닫힌 WebSocket 세션 {}개 정리", closed.len());
        }

        log::info!("접속 상태 브로드캐스트: {:?} {}", action, user_id);
    }
}

fn presence_hub_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(PresenceHub::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "presence_hub",
        constructor: presence_hub_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_update_message_shape() {
        let update = PresenceUpdate::new(
            PresenceAction::Joined,
            "kim@example.com",
            vec!["kim@example.com".to_string()],
        );
        let value: Value = serde_json::to_value(&update).unwrap();

        assert_eq!(value["type"], "PRESENCE_UPDATE");
        assert_eq!(value["action"], "joined");
        assert_eq!(value["userId"], "kim@example.com");
        assert_eq!(value["online"][0], "kim@example.com");
        assert!(value["timestamp"].as_i64().unwrap() > 0);

        let left = serde_json::to_value(PresenceUpdate::new(PresenceAction::Left, "kim", vec![])).unwrap();
        assert_eq!(left["action"], "left");
    }

    #[actix_web::test]
    async fn test_leave_of_unknown_session_keeps_presence() {
        let presence = Arc::new(PresenceService::default());
        presence.on_connect("rest-1", "park");
        let hub = PresenceHub::with_presence(presence.clone());

        hub.leave("ws-unknown").await;

        assert!(presence.is_online("park"));
        assert_eq!(hub.session_count(), 0);
    }
}
