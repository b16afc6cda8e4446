//! 회원 가입 이벤트 리스너
//!
//! 가입 요청 처리와 분리된 태스크에서 이메일/카카오 알림을 보냅니다.
//! 알림 실패는 가입 결과에 영향을 주지 않습니다.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    core::registry::ServiceRegistration,
    domain::models::events::MemberJoinEvent,
    services::notifications::{EmailNotificationService, KakaoNotificationService},
};

static MEMBER_JOIN_LISTENER_SERVICE_INSTANCE: OnceCell<Arc<MemberJoinListenerService>> =
    OnceCell::new();

pub struct MemberJoinListenerService {
    email_notification_service: Arc<EmailNotificationService>,

    kakao_notification_service: Arc<KakaoNotificationService>,
}

impl MemberJoinListenerService {
    fn new() -> Self {
        Self {
            email_notification_service: EmailNotificationService::instance(),
            kakao_notification_service: KakaoNotificationService::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        MEMBER_JOIN_LISTENER_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// 이벤트를 백그라운드 태스크로 넘기고 즉시 반환합니다.
    pub fn publish(self: &Arc<Self>, event: MemberJoinEvent) {
        let listener = Arc::clone(self);
        actix_web::rt::spawn(async move {
            listener.handle(event).await;
        });
    }

    pub async fn handle(&self, event: MemberJoinEvent) {
        log::info!("회원 가입 이벤트 수신: {} ({})", event.username, event.email);

        self.email_notification_service.notify_new_member(&event).await;
        self.kakao_notification_service
            .notify_new_member(&event.username)
            .await;
    }
}

fn member_join_listener_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(MemberJoinListenerService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "member_join_listener_service",
        constructor: member_join_listener_service_constructor,
    }
}
