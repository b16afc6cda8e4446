//! 회원 가입 이메일 알림
//!
//! 관리자 주소와 알림 수신에 동의한 모든 회원에게 발송합니다.
//! 수신자별 실패는 로그만 남기고 나머지 발송을 계속합니다.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    config::EmailConfig,
    core::{errors::AppError, registry::ServiceRegistration},
    domain::models::events::MemberJoinEvent,
    repositories::users::UserRepository,
    services::notifications::EmailClientService,
};

pub const MEMBER_JOIN_SUBJECT: &str = "🎉 새로운 회원이 가입했습니다!";

static EMAIL_NOTIFICATION_SERVICE_INSTANCE: OnceCell<Arc<EmailNotificationService>> =
    OnceCell::new();

pub struct EmailNotificationService {
    user_repo: Arc<UserRepository>,

    email_client: Arc<EmailClientService>,
}

impl EmailNotificationService {
    fn new() -> Self {
        Self {
            user_repo: UserRepository::instance(),
            email_client: EmailClientService::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        EMAIL_NOTIFICATION_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    pub async fn notify_new_member(&self, event: &MemberJoinEvent) {
        if !EmailConfig::enabled() {
            log::info!("이메일 알림이 비활성화되어 있습니다.");
            return;
        }
        if !self.email_client.is_configured() {
            log::info!("이메일 API가 설정되지 않아 알림을 건너뜁니다.");
            return;
        }

        let recipients = match self.recipients().await {
            Ok(recipients) => recipients,
            Err(e) => {
                log::error!("이메일 알림 대상 조회 실패: {}", e);
                return;
            }
        };

        let text_body = member_join_text(&event.username, &event.email, &event.joined_at_formatted());
        let html_body = to_html(&text_body);

        let mut sent = 0;
        for to in &recipients {
            match self
                .email_client
                .send_email(to, MEMBER_JOIN_SUBJECT, &html_body, &text_body)
                .await
            {
                Ok(()) => {
                    sent += 1;
                    log::debug!("이메일 발송 성공: {}", to);
                }
                Err(e) => log::error!("이메일 발송 실패: {} - {}", to, e),
            }
        }

        log::info!(
            "{}/{}명에게 회원가입 알림 이메일을 발송했습니다. (관리자 포함)",
            sent,
            recipients.len()
        );
    }

    /// 관리자 주소가 항상 첫 번째입니다.
    async fn recipients(&self) -> Result<Vec<String>, AppError> {
        let mut recipients = vec![EmailConfig::admin_email()];
        recipients.extend(
            self.user_repo
                .find_consenting_users()
                .await?
                .into_iter()
                .map(|user| user.email),
        );
        Ok(recipients)
    }
}

pub fn member_join_text(name: &str, email: &str, joined_at: &str) -> String {
    format!(
        "안녕하세요!\n\n\
         새로운 회원이 가입했습니다. 🎉\n\n\
         회원 정보:\n\
         • 이름: {}\n\
         • 이메일: {}\n\
         • 가입시간: {}\n\n\
         관리자 페이지에서 자세한 정보를 확인하실 수 있습니다.\n\n\
         ---\n\
         DOTA Admin Backend\n",
        name, email, joined_at
    )
}

fn to_html(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<p>{}</p>", escaped.replace('\n', "<br>"))
}

fn email_notification_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(EmailNotificationService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "email_notification_service",
        constructor: email_notification_service_constructor,
    }
}
