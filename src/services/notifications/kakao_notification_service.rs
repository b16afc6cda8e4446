//! 카카오톡 회원 가입 알림
//!
//! "나에게 보내기" 메모 API에 텍스트 템플릿을 전송합니다. 모든 오류는
//! 로그로만 남기고 호출자에게 전파하지 않습니다.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::json;

use crate::{
    config::KakaoConfig,
    core::{errors::AppError, registry::ServiceRegistration},
    repositories::users::UserRepository,
};

static KAKAO_NOTIFICATION_SERVICE_INSTANCE: OnceCell<Arc<KakaoNotificationService>> =
    OnceCell::new();

pub struct KakaoNotificationService {
    user_repo: Arc<UserRepository>,

    http_client: reqwest::Client,
}

impl KakaoNotificationService {
    fn new() -> Self {
        Self {
            user_repo: UserRepository::instance(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn instance() -> Arc<Self> {
        KAKAO_NOTIFICATION_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    pub async fn notify_new_member(&self, member_name: &str) {
        if !KakaoConfig::is_enabled() {
            log::warn!("카카오톡 API 키가 설정되지 않았습니다. 알림을 보낼 수 없습니다.");
            return;
        }

        let phone_numbers = match self.consenting_phone_numbers().await {
            Ok(numbers) => numbers,
            Err(e) => {
                log::error!("카카오 알림 대상 조회 실패: {}", e);
                return;
            }
        };

        if phone_numbers.is_empty() {
            log::info!("알림 수신에 동의한 회원이 없습니다.");
            return;
        }

        let message = member_join_message(member_name);
        for phone_number in &phone_numbers {
            if let Err(e) = self.send_message(&message).await {
                log::error!("카카오톡 메시지 발송 실패 ({}): {}", phone_number, e);
            }
        }

        log::info!("{}명의 회원에게 가입 알림을 발송했습니다.", phone_numbers.len());
    }

    async fn consenting_phone_numbers(&self) -> Result<Vec<String>, AppError> {
        Ok(self
            .user_repo
            .find_kakao_recipients()
            .await?
            .into_iter()
            .filter(|user| user.can_receive_notifications())
            .filter_map(|user| user.phone_number)
            .collect())
    }

    async fn send_message(&self, message: &str) -> Result<(), AppError> {
        let template = message_template(message, &KakaoConfig::link_url());
        let params = [("template_object", template)];

        let response = self
            .http_client
            .post(KakaoConfig::api_url())
            .bearer_auth(KakaoConfig::api_key())
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("카카오톡 API 호출 오류: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} - {}",
                status, error_text
            )));
        }

        log::info!("카카오톡 메시지 발송 성공 (나에게 보내기): {}", message);
        Ok(())
    }
}

pub fn member_join_message(member_name: &str) -> String {
    format!("🎉 새로운 회원이 가입했습니다!\n회원명: {}", member_name)
}

pub fn message_template(text: &str, link_url: &str) -> String {
    json!({
        "object_type": "text",
        "text": text,
        "link": {
            "web_url": link_url,
            "mobile_web_url": link_url,
        }
    })
    .to_string()
}

fn kakao_notification_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(KakaoNotificationService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "kakao_notification_service",
        constructor: kakao_notification_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_join_message() {
        assert_eq!(
            member_join_message("홍길동"),
            "🎉 새로운 회원이 가입했습니다!\n회원명: 홍길동"
        );
    }

    #[test]
    fn test_message_template_is_valid_json() {
        let template = message_template("줄바꿈\n\"따옴표\"", "https://dota-task.shop");
        let parsed: serde_json::Value = serde_json::from_str(&template).unwrap();

        assert_eq!(parsed["object_type"], "text");
        assert_eq!(parsed["text"], "줄바꿈\n\"따옴표\"");
        assert_eq!(parsed["link"]["mobile_web_url"], "https://dota-task.shop");
    }
}
