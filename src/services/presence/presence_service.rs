//! 인메모리 접속 상태(presence) 서비스
//!
//! 세션 → 사용자 매핑과 온라인 사용자 집합을 프로세스 메모리에 보관합니다.
//! 한 사용자가 여러 세션을 가질 수 있으며, 마지막 세션이 끊길 때 오프라인이 됩니다.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;

use crate::core::registry::ServiceRegistration;

static PRESENCE_SERVICE_INSTANCE: OnceCell<Arc<PresenceService>> = OnceCell::new();

#[derive(Default)]
struct PresenceState {
    sessions: HashMap<String, String>,
    online_users: BTreeSet<String>,
    last_activity: HashMap<String, DateTime<Utc>>,
}

#[derive(Default)]
pub struct PresenceService {
    state: RwLock<PresenceState>,
}

impl PresenceService {
    pub fn instance() -> Arc<Self> {
        PRESENCE_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::default()))
            .clone()
    }

    /// 새로 온라인이 된 사용자면 `true`.
    pub fn on_connect(&self, session_id: &str, user_id: &str) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        state.sessions.insert(session_id.to_string(), user_id.to_string());
        state.last_activity.insert(user_id.to_string(), Utc::now());

        let joined = state.online_users.insert(user_id.to_string());
        if joined {
            log::info!("User online: {}", user_id);
        } else {
            log::debug!("User session added but already online: {}", user_id);
        }
        joined
    }

    /// 끊긴 세션의 사용자. 알 수 없는 세션이면 `None`.
    pub fn on_disconnect(&self, session_id: &str) -> Option<String> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let user_id = state.sessions.remove(session_id)?;
        let still_connected = state.sessions.values().any(|u| u == &user_id);

        if !still_connected && state.online_users.remove(&user_id) {
            state.last_activity.remove(&user_id);
            log::info!("User offline: {}", user_id);
        }

        Some(user_id)
    }

    /// 정렬된 온라인 사용자 목록
    pub fn online_users(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.online_users.iter().cloned().collect()
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.online_users.contains(user_id)
    }

    /// heartbeat. 온라인 사용자만 갱신합니다.
    pub fn update_user_activity(&self, user_id: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if state.online_users.contains(user_id) {
            state.last_activity.insert(user_id.to_string(), Utc::now());
            log::debug!("User activity: {}", user_id);
        }
    }

    pub fn last_activity(&self, user_id: &str) -> Option<DateTime<Utc>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.last_activity.get(user_id).copied()
    }

    pub fn clear_all(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = PresenceState::default();
        log::info!("All presence data cleared");
    }
}

fn presence_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(PresenceService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "presence_service",
        constructor: presence_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_and_disconnect() {
        let presence = PresenceService::default();

        presence.on_connect("s1", "kim@example.com");
        assert!(presence.is_online("kim@example.com"));

        assert_eq!(presence.on_disconnect("s1").as_deref(), Some("kim@example.com"));
        assert!(!presence.is_online("kim@example.com"));
        assert!(presence.last_activity("kim@example.com").is_none());
    }

    #[test]
    fn test_user_stays_online_while_other_session_remains() {
        let presence = PresenceService::default();

        assert!(presence.on_connect("s1", "lee"));
        assert!(!presence.on_connect("s2", "lee"));
        presence.on_disconnect("s1");
        assert!(presence.is_online("lee"));

        presence.on_disconnect("s2");
        assert!(!presence.is_online("lee"));
    }

    #[test]
    fn test_unknown_session_is_ignored() {
        let presence = PresenceService::default();
        presence.on_connect("s1", "park");

        assert!(presence.on_disconnect("nope").is_none());
        assert!(presence.is_online("park"));
    }

    #[test]
    fn test_online_users_sorted() {
        let presence = PresenceService::default();
        presence.on_connect("a", "zeta");
        presence.on_connect("b", "alpha");
        presence.on_connect("c", "mike");

        assert_eq!(presence.online_users(), vec!["alpha", "mike", "zeta"]);
    }

    #[test]
    fn test_activity_and_clear() {
        let presence = PresenceService::default();
        presence.update_user_activity("ghost");
        assert!(presence.last_activity("ghost").is_none());

        presence.on_connect("s1", "choi");
        presence.update_user_activity("choi");
        assert!(presence.last_activity("choi").is_some());

        presence.clear_all();
        assert!(presence.online_users().is_empty());
        assert!(!presence.is_online("choi"));
    }
}
