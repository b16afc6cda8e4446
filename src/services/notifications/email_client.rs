//! HTTP 이메일 API 클라이언트
//!
//! `{base}/email` 엔드포인트에 JSON 본문으로 메일 한 통을 요청합니다.
//!
//! ```text
//! POST {EMAIL_API_BASE_URL}/email
//! X-Postmark-Server-Token: {EMAIL_AUTHORIZATION_TOKEN}
//! { "From", "To", "Subject", "HtmlBody", "TextBody" }
//! ```

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::{
    config::EmailConfig,
    core::{errors::AppError, registry::ServiceRegistration},
};

const AUTH_HEADER: &str = "X-Postmark-Server-Token";

static EMAIL_CLIENT_SERVICE_INSTANCE: OnceCell<Arc<EmailClientService>> = OnceCell::new();

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendEmailRequest<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub html_body: &'a str,
    pub text_body: &'a str,
}

pub struct EmailClientService {
    http_client: reqwest::Client,
}

impl EmailClientService {
    fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(EmailConfig::timeout_millis()))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("이메일 HTTP 클라이언트 설정 실패, 기본값 사용: {}", e);
                reqwest::Client::new()
            });

        Self { http_client }
    }

    pub fn instance() -> Arc<Self> {
        EMAIL_CLIENT_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    pub fn is_configured(&self) -> bool {
        EmailConfig::api_base_url().is_some()
    }

    /// # Errors
    ///
    /// * `AppError::ExternalServiceError` - API 미설정, 전송 실패 또는 2xx 이외 응답
    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), AppError> {
        let base_url = EmailConfig::api_base_url().ok_or_else(|| {
            AppError::ExternalServiceError("이메일 API가 설정되지 않았습니다".to_string())
        })?;
        let sender = EmailConfig::sender();

        let body = SendEmailRequest {
            from: &sender,
            to,
            subject,
            html_body,
            text_body,
        };

        let response = self
            .http_client
            .post(format!("{}/email", base_url))
            .header(AUTH_HEADER, EmailConfig::authorization_token())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("이메일 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "이메일 발송 실패: {} - {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

fn email_client_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(EmailClientService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "email_client_service",
        constructor: email_client_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_pascal_case() {
        let body = SendEmailRequest {
            from: "no-reply@dota-task.shop",
            to: "admin@example.com",
            subject: "제목",
            html_body: "<p>본문</p>",
            text_body: "본문",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["From"], "no-reply@dota-task.shop");
        assert_eq!(json["To"], "admin@example.com");
        assert_eq!(json["HtmlBody"], "<p>본문</p>");
        assert_eq!(json["TextBody"], "본문");
    }
}
