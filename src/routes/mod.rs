//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별로 그룹화하여 등록합니다.
//!
//! # Auth Middleware Usage
//!
//! 스코프마다 인증 수준이 다릅니다.
//!
//! | 스코프 | 인증 |
//! |--------|------|
//! | `/api/auth` | 공개 (`/me`만 인증 필요) |
//! | `/api/me`, `/api/challenges`, `/api/rewards` | 로그인 사용자 |
//! | `/api/users`, `/api/admin/*`, `/api/data`, `/api/documents/admin` | ADMIN |
//! | `/api/documents/public`, `/api/players`, `/api/presence` | 공개 |
//! | `/api/reward-histories`, `/api/payment-histories` | 공개 (외부 시스템 수신) |
//! | `/ws` | 핸드셰이크에서 JWT 검증 (`?token=` 또는 헤더) |
//!
//! 같은 접두어를 가진 스코프는 먼저 등록된 쪽이 요청을 가져가므로,
//! 더 긴 접두어(`/api/auth/me`, `/api/documents/admin`)를 먼저 등록합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::handlers;
use crate::middlewares::AuthMiddleware;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_role_routes(cfg);
    configure_challenge_routes(cfg);
    configure_reward_routes(cfg);
    configure_document_routes(cfg);
    configure_player_routes(cfg);
    configure_presence_routes(cfg);
    configure_data_routes(cfg);

    cfg.service(handlers::ws::presence_socket);
}

/// 인증 라우트
///
/// ```bash
/// curl -X POST http://localhost:8080/api/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"admin@example.com","password":"admin123"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth/me")
            .wrap(AuthMiddleware::required())
            .service(handlers::auth::me),
    );

    cfg.service(
        web::scope("/api/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::register_with_kakao)
            .service(handlers::auth::register_admin)
            .service(handlers::auth::login)
            .service(handlers::auth::refresh)
            .service(handlers::auth::logout),
    );
}

/// 사용자 관리 (ADMIN) 와 본인 계정 라우트
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(AuthMiddleware::admin())
            .service(handlers::users::list_users)
            .service(handlers::users::count_users)
            .service(handlers::users::get_user)
            .service(handlers::users::update_user)
            .service(handlers::users::delete_user)
            .service(handlers::users::grant_authority)
            .service(handlers::users::revoke_authority),
    );

    cfg.service(
        web::scope("/api/me")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::get_me)
            .service(handlers::users::update_my_notifications)
            .service(handlers::users::delete_me),
    );
}

fn configure_role_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/roles")
            .wrap(AuthMiddleware::admin())
            .service(handlers::roles::list_roles)
            .service(handlers::roles::get_role)
            .service(handlers::roles::create_role)
            .service(handlers::roles::update_role)
            .service(handlers::roles::delete_role)
            .service(handlers::roles::assign_authority)
            .service(handlers::roles::remove_authority),
    );

    cfg.service(
        web::scope("/api/admin/authorities")
            .wrap(AuthMiddleware::admin())
            .service(handlers::roles::list_authorities)
            .service(handlers::roles::create_authority)
            .service(handlers::roles::delete_authority),
    );
}

fn configure_challenge_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/challenges")
            .wrap(AuthMiddleware::required())
            .service(handlers::challenges::create_challenge)
            .service(handlers::challenges::list_challenges)
            .service(handlers::challenges::get_challenge)
            .service(handlers::challenges::update_challenge)
            .service(handlers::challenges::delete_challenge)
            .service(handlers::challenges::participate)
            .service(handlers::challenges::leave)
            .service(handlers::challenges::participation_status)
            .service(handlers::challenges::participants)
            .service(handlers::challenges::reward_info)
            .service(handlers::challenges::reward_histories)
            .service(handlers::challenges::start_challenge)
            .service(handlers::challenges::complete_challenge)
            .service(handlers::challenges::reopen_challenge)
            .service(handlers::challenges::create_reward)
            .service(handlers::challenges::list_rewards)
            .service(handlers::challenges::get_reward),
    );
}

fn configure_reward_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/rewards")
            .wrap(AuthMiddleware::required())
            .service(handlers::rewards::my_rewards)
            .service(handlers::rewards::reward_statistics),
    );

    cfg.service(
        web::scope("/api/reward-histories")
            .service(handlers::rewards::save_reward_history)
            .service(handlers::rewards::challenge_reward_histories),
    );

    cfg.service(
        web::scope("/api/payment-histories")
            .service(handlers::rewards::save_payment_history)
            .service(handlers::rewards::get_payment_history),
    );
}

/// 문서 라우트
///
/// `/{slug}` 패턴이 다른 고정 경로를 가리지 않도록 고정 경로를 먼저 등록합니다.
fn configure_document_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/documents/public")
            .service(handlers::documents::list_published)
            .service(handlers::documents::featured)
            .service(handlers::documents::popular)
            .service(handlers::documents::search)
            .service(handlers::documents::categories)
            .service(handlers::documents::by_category)
            .service(handlers::documents::get_published),
    );

    cfg.service(
        web::scope("/api/documents/admin")
            .wrap(AuthMiddleware::admin())
            .service(handlers::documents::list_all)
            .service(handlers::documents::by_status)
            .service(handlers::documents::get_any)
            .service(handlers::documents::create)
            .service(handlers::documents::update)
            .service(handlers::documents::remove),
    );
}

fn configure_player_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/players")
            .service(handlers::players::create_player)
            .service(handlers::players::hello),
    );
}

fn configure_presence_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/presence")
            .service(handlers::presence::online)
            .service(handlers::presence::test_login)
            .service(handlers::presence::connect)
            .service(handlers::presence::disconnect)
            .service(handlers::presence::clear),
    );
}

fn configure_data_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/data")
            .wrap(AuthMiddleware::admin())
            .service(handlers::data::generate_users)
            .service(handlers::data::create_admin)
            .service(handlers::data::clear_users),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "dota_admin_backend",
///   "version": "0.1.0",
///   "timestamp": "2025-01-01T00:00:00+00:00",
///   "features": { "database": "MongoDB", "cache": "Redis", ... }
/// }
/// ```
#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "auth": "JWT (HS256) + refresh token rotation",
            "dependency_injection": "inventory + OnceCell singletons"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "dota_admin_backend");
    }

    #[actix_web::test]
    async fn test_hello() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let req = test::TestRequest::get().uri("/api/players/hello").to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "Hello from backend");
    }

    #[actix_web::test]
    async fn test_protected_scopes_require_token() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        for uri in ["/api/users", "/api/me", "/api/challenges", "/api/admin/roles", "/api/auth/me", "/ws"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }
}
