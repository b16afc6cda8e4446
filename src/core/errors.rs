//! # Application Error Handling System
//!
//! 관리자 백엔드의 통합 에러 처리 시스템입니다.
//! `thiserror`로 에러 타입을 정의하고 `actix_web::ResponseError`를 구현하여
//! 핸들러가 `Result<HttpResponse, AppError>`만 반환하면
//! 일관된 JSON 에러 응답이 만들어지도록 합니다.
//!
//! ## 응답 형식
//!
//! ```json
//! {
//!   "success": false,
//!   "error": "VALIDATION_ERROR",
//!   "message": "이미 참여한 챌린지입니다.",
//!   "timestamp": "2025-01-01T00:00:00+00:00"
//! }
//! ```
//!
//! `message`에는 변형이 감싸고 있는 원본 메시지가 그대로 들어갑니다.
//! `Display` 구현(`to_string()`)은 로그용으로 분류 접두어를 포함합니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | error 코드 |
//! |----------|-------------|------------|
//! | `ValidationError` | 400 | `VALIDATION_ERROR` |
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `ConflictError` | 409 | `CONFLICT` |
//! | `AuthenticationError` | 401 | `AUTHENTICATION_FAILED` |
//! | `TokenExpired` | 401 | `TOKEN_EXPIRED` |
//! | `AuthorizationError` | 403 | `ACCESS_DENIED` |
//! | `ExternalServiceError` | 502 | `EXTERNAL_SERVICE_ERROR` |
//! | `DatabaseError` / `RedisError` / `InternalError` | 500 | `INTERNAL_SERVER_ERROR` |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! #[post("/{challenge_id}/participate")]
//! pub async fn participate(
//!     path: web::Path<String>,
//!     user: AuthenticatedUser,
//! ) -> Result<HttpResponse, AppError> {
//!     let challenge = ChallengeService::instance()
//!         .participate(&path, &user.user_id)
//!         .await?; // 규칙 위반 시 400 응답으로 변환
//!     Ok(HttpResponse::Ok().json(challenge))
//! }
//! ```

use actix_web::http::StatusCode;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB 작업 실패
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 작업 실패
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 실패 또는 비즈니스 규칙 위반
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 중복 데이터
    #[error("Conflict error: {0}")]
    ConflictError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 서명은 유효하지만 만료된 토큰
    #[error("Token expired: {0}")]
    TokenExpired(String),

    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// Kakao API, 이메일 API 등 외부 연동 실패
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 클라이언트에 노출되는 기계 판독용 에러 코드
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ConflictError(_) => "CONFLICT",
            AppError::AuthenticationError(_) => "AUTHENTICATION_FAILED",
            AppError::TokenExpired(_) => "TOKEN_EXPIRED",
            AppError::AuthorizationError(_) => "ACCESS_DENIED",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::DatabaseError(_) | AppError::RedisError(_) | AppError::InternalError(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }

    /// 분류 접두어 없는 원본 메시지
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(msg)
            | AppError::RedisError(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::TokenExpired(msg)
            | AppError::AuthorizationError(msg)
            | AppError::ExternalServiceError(msg)
            | AppError::InternalError(msg) => msg,
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) | AppError::TokenExpired(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("{}", self);
        }

        // 내부 오류의 상세 내용은 로그에만 남긴다
        let message = match self {
            AppError::DatabaseError(_) | AppError::RedisError(_) => "Internal server error",
            _ => self.message(),
        };

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.error_code(),
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(e.to_string())
    }
}

/// Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 에러에 문맥을 붙여 `InternalError`로 변환합니다.
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    async fn body_json(error: AppError) -> serde_json::Value {
        let response = error.error_response();
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("User not found".to_string());
        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error_response() {
        let error = AppError::ConflictError("Email already exists".to_string());
        assert_eq!(error.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_authentication_and_expiry_are_unauthorized() {
        let invalid = AppError::AuthenticationError("Invalid token".to_string());
        let expired = AppError::TokenExpired("토큰이 만료되었습니다".to_string());

        assert_eq!(invalid.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.error_code(), "AUTHENTICATION_FAILED");
        assert_eq!(expired.error_code(), "TOKEN_EXPIRED");
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("Insufficient permissions".to_string());
        assert_eq!(error.error_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(error.error_code(), "ACCESS_DENIED");
    }

    #[test]
    fn test_external_service_error_is_bad_gateway() {
        let error = AppError::ExternalServiceError("Kakao API down".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("Something went wrong".to_string());
        assert_eq!(
            error.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_body_carries_inner_message() {
        let body = body_json(AppError::ValidationError("이미 참여한 챌린지입니다.".to_string())).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "이미 참여한 챌린지입니다.");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_database_error_details_are_hidden() {
        let body = body_json(AppError::DatabaseError("connection refused 10.0.0.3".to_string())).await;

        assert_eq!(body["error"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["message"], "Internal server error");
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        match app_result {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.contains("Additional context"));
                assert!(msg.contains("original error"));
            }
            _ => panic!("Expected InternalError"),
        }
    }

    #[test]
    fn test_with_context_is_lazy() {
        let ok: Result<u8, &str> = Ok(1);
        let value = ok.with_context(|| panic!("must not be evaluated")).unwrap();
        assert_eq!(value, 1);
    }
}
