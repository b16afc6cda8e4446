//! 접속 상태 WebSocket 핸들러
//!
//! `GET /ws?token=<JWT>` (또는 `Authorization: Bearer <JWT>`)로 연결합니다.
//! 핸드셰이크에서 토큰을 검증하고 이메일을 사용자 ID로 사용합니다.
//!
//! 클라이언트 → 서버 텍스트 메시지:
//!
//! | 메시지 | 동작 |
//! |--------|------|
//! | `{"type":"activity"}` | 마지막 활동 시각 갱신 |
//!
//! 서버 → 클라이언트 메시지는 [`PresenceUpdate`](crate::services::presence::PresenceUpdate)입니다.

use actix_web::{get, rt, web, HttpRequest, HttpResponse};
use actix_ws::{Message, MessageStream, Session};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    core::errors::AppError,
    services::{auth::TokenService, presence::PresenceHub},
};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientMessage {
    #[serde(rename = "type")]
    kind: String,
}

/// 쿼리 토큰을 우선하고, 없으면 Authorization 헤더를 봅니다. `Bearer ` 접두어는 선택입니다.
fn handshake_token(query: Option<&str>, header: Option<&str>) -> Option<String> {
    [query, header]
        .into_iter()
        .flatten()
        .map(|raw| {
            raw.trim()
                .strip_prefix("Bearer")
                .unwrap_or(raw.trim())
                .trim()
                .to_string()
        })
        .find(|token| !token.is_empty())
}

#[get("/ws")]
pub async fn presence_socket(
    req: HttpRequest,
    query: web::Query<WsQuery>,
    body: web::Payload,
) -> Result<HttpResponse, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = handshake_token(query.token.as_deref(), header).ok_or_else(|| {
        log::warn!("WS handshake missing token");
        AppError::AuthenticationError("인증이 필요합니다.".to_string())
    })?;
    let user_id = TokenService::instance().email_from_token(&token)?;

    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|e| {
        AppError::ValidationError(format!("WebSocket 핸드셰이크 실패: {}", e))
    })?;

    let session_id = format!("ws-{}", Uuid::new_v4());
    log::debug!("WS handshake success user={} session={}", user_id, session_id);

    rt::spawn(run_session(session_id, user_id, session, stream));

    Ok(response)
}

async fn run_session(session_id: String, user_id: String, session: Session, mut stream: MessageStream) {
    let hub = PresenceHub::instance();
    hub.join(&session_id, &user_id, session.clone()).await;

    let mut session = session;
    while let Some(Ok(message)) = stream.recv().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) if msg.kind == "activity" => hub.touch(&user_id),
                Ok(msg) => log::debug!("알 수 없는 WS 메시지 타입: {}", msg.kind),
                Err(e) => log::debug!("WS 메시지 파싱 실패: {}", e),
            },
            Message::Ping(bytes) => {
                if session.pong(&bytes).await.is_err() {
                    break;
                }
            }
            Message::Close(reason) => {
                log::debug!("WS close: session={} reason={:?}", session_id, reason);
                break;
            }
            _ => {}
        }
    }

    hub.leave(&session_id).await;
    let _ = session.close(None).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest, App};
    use chrono::Utc;

    use crate::domain::models::token::TokenClaims;

    #[test]
    fn test_handshake_token_sources() {
        assert_eq!(handshake_token(Some("abc"), None).as_deref(), Some("abc"));
        assert_eq!(handshake_token(Some("Bearer abc"), None).as_deref(), Some("abc"));
        assert_eq!(
            handshake_token(Some(""), Some("Bearer from-header")).as_deref(),
            Some("from-header")
        );
        assert_eq!(
            handshake_token(Some("query"), Some("Bearer header")).as_deref(),
            Some("query")
        );
        assert!(handshake_token(None, None).is_none());
        assert!(handshake_token(Some("Bearer "), None).is_none());
    }

    #[actix_web::test]
    async fn test_handshake_requires_valid_token() {
        let app = actix_web::test::init_service(App::new().service(presence_socket)).await;

        let req = TestRequest::get().uri("/ws").to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = TestRequest::get().uri("/ws?token=not-a-jwt").to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_token_without_upgrade_is_rejected() {
        let now = Utc::now().timestamp();
        let token = TokenService::instance()
            .encode_claims(&TokenClaims {
                sub: "u1".to_string(),
                email: "kim@example.com".to_string(),
                role: "USER".to_string(),
                authorities: vec![],
                iat: now,
                exp: now + 3600,
            })
            .unwrap();

        let app = actix_web::test::init_service(App::new().service(presence_socket)).await;
        let req = TestRequest::get()
            .uri(&format!("/ws?token={}", token))
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
