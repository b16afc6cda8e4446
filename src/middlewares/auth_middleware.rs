//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 JWT 토큰을 검증하고 사용자 정보를 추출합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::entities::users::ROLE_ADMIN;
use crate::domain::models::auth::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 특정 역할 요구 인증 미들웨어 생성
    pub fn required_with_role(role: &str) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(role.to_string()))
    }

    /// 복수 역할 중 하나 요구 인증 미들웨어 생성
    pub fn required_with_roles(roles: Vec<&str>) -> Self {
        let role_strings: Vec<String> = roles.into_iter().map(|s| s.to_string()).collect();
        Self::new_with_role(AuthMode::Required, RequiredRole::Any(role_strings))
    }

    /// ADMIN 전용
    pub fn admin() -> Self {
        Self::required_with_role(ROLE_ADMIN)
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{auth::OptionalUser, token::TokenClaims};
    use crate::domain::models::auth::AuthenticatedUser;
    use crate::services::auth::TokenService;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use chrono::Utc;
    use serde_json::Value;

    fn token(role: &str, exp_offset: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "665f1c2e9b1e8a3d4c5b6a70".to_string(),
            email: "test1@example.com".to_string(),
            role: role.to_string(),
            authorities: vec![],
            iat: now,
            exp: now + exp_offset,
        };
        TokenService::instance().encode_claims(&claims).unwrap()
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.email)
    }

    async fn maybe(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().body(if user.0.is_some() { "user" } else { "anonymous" })
    }

    #[actix_web::test]
    async fn test_required_rejects_missing_token() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/me")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "인증이 필요합니다.");
        assert_eq!(body["path"], "/api/me");
    }

    #[actix_web::test]
    async fn test_required_accepts_valid_token() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/me")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token("USER", 3600))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "test1@example.com");
    }

    #[actix_web::test]
    async fn test_invalid_and_expired_tokens() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/me")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"], "AUTHENTICATION_FAILED");
        assert_eq!(body["message"], "토큰이 유효하지 않습니다.");

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token("USER", -3600))))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"], "TOKEN_EXPIRED");
    }

    #[actix_web::test]
    async fn test_admin_scope_rejects_user_role() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/users")
                    .wrap(AuthMiddleware::admin())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/users")
            .insert_header(("Authorization", format!("Bearer {}", token("USER", 3600))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["missingRole"], "ADMIN");
        assert_eq!(body["detail"], "이 기능은 관리자만 사용할 수 있습니다.");

        let req = test::TestRequest::get()
            .uri("/api/users")
            .insert_header(("Authorization", format!("Bearer {}", token("ADMIN", 3600))))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_any_of_roles() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/data")
                    .wrap(AuthMiddleware::required_with_roles(vec!["ADMIN", "DEVELOPER"]))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/data")
            .insert_header(("Authorization", format!("Bearer {}", token("developer", 3600))))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/data")
            .insert_header(("Authorization", format!("Bearer {}", token("USER", 3600))))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["missingRole"], "ADMIN 또는 DEVELOPER");
    }

    #[actix_web::test]
    async fn test_optional_mode_passes_through() {
        let app = test::init_service(
            App::new().service(
                web::scope("/open")
                    .wrap(AuthMiddleware::optional())
                    .route("", web::get().to(maybe)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/open").to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "anonymous");

        let req = test::TestRequest::get()
            .uri("/open")
            .insert_header(("Authorization", format!("Bearer {}", token("USER", 3600))))
            .to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "user");
    }
}
