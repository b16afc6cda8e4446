//! 접속 상태(presence) 핸들러
//!
//! REST로 접속/해제를 알립니다. 실시간 알림은 `/ws` WebSocket([`super::ws`])이 담당하며
//! 두 경로는 같은 [`PresenceService`] 상태를 공유합니다.
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/api/presence` | 온라인 사용자 목록 |
//! | `POST` | `/api/presence/test-login?userId=` | 테스트용 수동 등록 |
//! | `POST` | `/api/presence/connect` | Bearer 토큰의 이메일로 접속 등록 |
//! | `POST` | `/api/presence/disconnect?sessionId=` | 세션 해제 |
//! | `POST` | `/api/presence/clear` | 테스트용 전체 정리 |
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{
    core::errors::AppError,
    services::{auth::TokenService, presence::PresenceService},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestLoginQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectQuery {
    pub session_id: String,
}

fn session_id(prefix: &str, user_id: &str) -> String {
    format!("{}-{}-{}", prefix, user_id, Utc::now().timestamp_millis())
}

#[get("")]
pub async fn online() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "online": PresenceService::instance().online_users() }))
}

#[post("/test-login")]
pub async fn test_login(query: web::Query<TestLoginQuery>) -> Result<HttpResponse, AppError> {
    let user_id = query.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::ValidationError("userId는 필수입니다".to_string()));
    }

    let presence = PresenceService::instance();
    let session = session_id("test-session", user_id);
    presence.on_connect(&session, user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("User {} added", user_id),
        "sessionId": session,
        "online": presence.online_users(),
    })))
}

/// 토큰의 이메일을 사용자 ID로 사용합니다.
#[post("/connect")]
pub async fn connect(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let token_service = TokenService::instance();

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("인증이 필요합니다.".to_string()))?;
    let token = token_service.extract_bearer_token(header)?;
    let user_id = token_service.email_from_token(token)?;

    let presence = PresenceService::instance();
    let session = session_id("session", &user_id);
    presence.on_connect(&session, &user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Connected successfully",
        "userId": user_id,
        "sessionId": session,
        "online": presence.online_users(),
    })))
}

#[post("/disconnect")]
pub async fn disconnect(query: web::Query<DisconnectQuery>) -> HttpResponse {
    let presence = PresenceService::instance();
    let user_id = presence.on_disconnect(&query.session_id);
    let message = match user_id {
        Some(_) => "Disconnected successfully",
        None => "Unknown session",
    };

    HttpResponse::Ok().json(json!({
        "message": message,
        "userId": user_id,
        "online": presence.online_users(),
    }))
}

#[post("/clear")]
pub async fn clear() -> HttpResponse {
    let presence = PresenceService::instance();
    presence.clear_all();

    HttpResponse::Ok().json(json!({
        "message": "All users cleared",
        "online": presence.online_users(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_session_id_format() {
        let id = session_id("session", "kim@example.com");
        assert!(id.starts_with("session-kim@example.com-"));
    }

    #[actix_web::test]
    async fn test_presence_flow() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/presence")
                    .service(online)
                    .service(test_login)
                    .service(disconnect)
                    .service(clear),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/presence/test-login?userId=presence-tester")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let session = body["sessionId"].as_str().unwrap().to_string();
        assert!(body["online"]
            .as_array()
            .unwrap()
            .iter()
            .any(|u| u == "presence-tester"));

        let req = test::TestRequest::post()
            .uri(&format!("/api/presence/disconnect?sessionId={}", session))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["userId"], "presence-tester");

        let req = test::TestRequest::post()
            .uri("/api/presence/test-login")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
