//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde_json::{json, Value};

use crate::core::errors::AppError;
use crate::domain::models::auth::{AuthMode, AuthenticatedUser, RequiredRole};
use crate::services::auth::TokenService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

/// 요청 인증 실패 사유
#[derive(Debug)]
pub(crate) enum AuthFailure {
    /// Authorization 헤더가 없거나 Bearer 형식이 아님
    MissingToken,
    /// 서명 또는 형식 오류
    InvalidToken,
    Expired,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate_request(&req, &TokenService::instance());
            let path = req.path().to_string();

            match (&mode, auth_result) {
                (AuthMode::Required, Err(failure)) => {
                    log::warn!("인증 실패 ({:?}): {}", failure, path);
                    let response = HttpResponse::Unauthorized().json(unauthorized_body(&failure, &path));
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(&user.roles) {
                            log::warn!(
                                "권한 부족: 사용자 {} ({:?}), 필요 권한: {:?}, 경로: {}",
                                user.email, user.roles, required, path
                            );
                            let response = HttpResponse::Forbidden().json(forbidden_body(&path, required, &user));
                            let (req, _) = req.into_parts();
                            return Ok(ServiceResponse::new(req, response).map_into_right_body());
                        }
                    }

                    log::debug!("인증 성공: {} ({})", user.email, user.user_id);
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    let satisfied = required_role
                        .as_ref()
                        .is_none_or(|required| required.is_satisfied(&user.roles));

                    if satisfied {
                        log::debug!("선택적 인증 성공: {}", user.email);
                        req.extensions_mut().insert(user);
                    } else {
                        log::debug!("선택적 인증: 권한 부족하지만 진행 허용");
                    }
                }
                (AuthMode::Optional, Err(_)) => {
                    log::debug!("선택적 인증: 토큰 없음, 요청 진행");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청에서 Bearer 토큰을 추출하고 검증
fn authenticate_request(
    req: &ServiceRequest,
    token_service: &TokenService,
) -> Result<AuthenticatedUser, AuthFailure> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthFailure::MissingToken)?;

    let token = token_service
        .extract_bearer_token(header)
        .map_err(|_| AuthFailure::MissingToken)?;

    let claims = token_service.verify_token(token).map_err(|e| match e {
        AppError::TokenExpired(_) => AuthFailure::Expired,
        _ => AuthFailure::InvalidToken,
    })?;

    Ok(token_service.to_authenticated_user(claims))
}

/// 401 응답 본문
pub(crate) fn unauthorized_body(failure: &AuthFailure, path: &str) -> Value {
    let (error, message, detail) = match failure {
        AuthFailure::MissingToken => (
            "AUTHENTICATION_FAILED",
            "인증이 필요합니다.",
            "Authorization 헤더에 유효한 JWT 토큰을 포함해주세요.",
        ),
        AuthFailure::InvalidToken => (
            "AUTHENTICATION_FAILED",
            "토큰이 유효하지 않습니다.",
            "토큰이 만료되었거나 올바르지 않습니다. 다시 로그인해주세요.",
        ),
        // 클라이언트는 이 코드를 보고 refresh를 시도한다
        AuthFailure::Expired => (
            "TOKEN_EXPIRED",
            "Token expired",
            "액세스 토큰이 만료되었습니다. 리프레시 토큰으로 재발급받으세요.",
        ),
    };

    json!({
        "error": error,
        "message": message,
        "detail": detail,
        "status": 401,
        "path": path,
    })
}

/// 경로별 403 상세 메시지와 조치 안내
pub(crate) fn access_denied_guidance(path: &str) -> (&'static str, &'static str) {
    if path.starts_with("/api/admin/roles") {
        (
            "Role 관리는 ADMIN 전용입니다.",
            "관리자 계정으로 로그인하거나, DB에서 해당 사용자 role을 ADMIN 으로 승격 후 새 토큰을 발급받으세요.",
        )
    } else if path.starts_with("/api/users") {
        (
            "이 기능은 관리자만 사용할 수 있습니다.",
            "ADMIN 권한이 있는 계정으로 다시 시도하세요.",
        )
    } else if path.starts_with("/api/data") {
        (
            "데이터 관리 기능은 관리자 전용입니다.",
            "ADMIN 계정 필요. 초기 관리자 미생성 시 DB에서 role 변경.",
        )
    } else {
        (
            "요청 리소스에 접근 권한이 없습니다.",
            "필요한 Role/Authority 확인 후 권한을 부여하세요.",
        )
    }
}

/// 403 응답 본문
pub(crate) fn forbidden_body(path: &str, required: &RequiredRole, user: &AuthenticatedUser) -> Value {
    let (detail, suggestion) = access_denied_guidance(path);

    let current_authorities: Vec<String> = user
        .roles
        .iter()
        .map(|role| format!("ROLE_{}", role))
        .chain(user.authorities.iter().cloned())
        .collect();

    json!({
        "error": "ACCESS_DENIED",
        "message": "접근 권한이 없습니다.",
        "detail": detail,
        "suggestion": suggestion,
        "missingRole": required.describe(),
        "currentAuthorities": current_authorities,
        "status": 403,
        "path": path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_body() {
        let body = unauthorized_body(&AuthFailure::MissingToken, "/api/me");
        assert_eq!(body["error"], "AUTHENTICATION_FAILED");
        assert_eq!(body["message"], "인증이 필요합니다.");
        assert_eq!(body["status"], 401);
        assert_eq!(body["path"], "/api/me");

        let body = unauthorized_body(&AuthFailure::InvalidToken, "/api/me");
        assert_eq!(body["message"], "토큰이 유효하지 않습니다.");

        let body = unauthorized_body(&AuthFailure::Expired, "/api/me");
        assert_eq!(body["error"], "TOKEN_EXPIRED");
        assert_eq!(body["message"], "Token expired");
    }

    #[test]
    fn test_access_denied_guidance() {
        assert_eq!(access_denied_guidance("/api/admin/roles/1").0, "Role 관리는 ADMIN 전용입니다.");
        assert_eq!(access_denied_guidance("/api/users").0, "이 기능은 관리자만 사용할 수 있습니다.");
        assert_eq!(access_denied_guidance("/api/data/clear-users").0, "데이터 관리 기능은 관리자 전용입니다.");
        assert_eq!(access_denied_guidance("/api/documents/admin").0, "요청 리소스에 접근 권한이 없습니다.");
    }

    #[test]
    fn test_forbidden_body() {
        let user = AuthenticatedUser {
            user_id: "u1".to_string(),
            email: "test1@example.com".to_string(),
            roles: vec!["USER".to_string()],
            authorities: vec!["USER_READ".to_string()],
        };

        let body = forbidden_body("/api/users", &RequiredRole::Single("ADMIN".to_string()), &user);
        assert_eq!(body["error"], "ACCESS_DENIED");
        assert_eq!(body["message"], "접근 권한이 없습니다.");
        assert_eq!(body["missingRole"], "ADMIN");
        assert_eq!(body["currentAuthorities"], json!(["ROLE_USER", "USER_READ"]));
        assert_eq!(body["status"], 403);
    }
}
