//! JWT 액세스 토큰 서비스
//!
//! HS256 서명으로 액세스 토큰을 발급하고 검증합니다.
//! 리프레시 토큰은 [`RefreshTokenService`](super::RefreshTokenService)가 담당합니다.

use std::any::Any;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;

use crate::{
    config::JwtConfig,
    core::{errors::AppError, registry::ServiceRegistration},
    domain::{
        entities::users::User,
        models::{auth::AuthenticatedUser, token::TokenClaims},
    },
};

const BEARER_PREFIX: &str = "Bearer ";

static TOKEN_SERVICE_INSTANCE: OnceCell<Arc<TokenService>> = OnceCell::new();

/// JWT 토큰 관리 서비스
///
/// 외부 의존성이 없으며 서명 비밀키는 호출 시점의 `JwtConfig`에서 읽습니다.
pub struct TokenService;

impl TokenService {
    pub fn instance() -> Arc<Self> {
        TOKEN_SERVICE_INSTANCE.get_or_init(|| Arc::new(Self)).clone()
    }

    /// 사용자를 위한 JWT 액세스 토큰 생성
    ///
    /// # Arguments
    ///
    /// * `user` - 토큰을 발급받을 사용자
    /// * `authorities` - 역할 권한과 직접 부여된 권한
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 저장되지 않은 사용자이거나 서명 실패
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let token_service = TokenService::instance();
    /// let access_token = token_service.generate_access_token(&user, &authorities)?;
    /// ```
    pub fn generate_access_token(&self, user: &User, authorities: &[String]) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(JwtConfig::expiration_hours());

        let claims = TokenClaims {
            sub: user
                .id_string()
                .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?,
            email: user.email.clone(),
            role: user.role.clone(),
            authorities: authorities.to_vec(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        self.encode_claims(&claims)
    }

    pub fn encode_claims(&self, claims: &TokenClaims) -> Result<String, AppError> {
        let secret = JwtConfig::secret();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::default(), claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 서명과 만료 시간을 검증하고 클레임을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenExpired` - 만료된 토큰
    /// * `AppError::AuthenticationError` - 서명 불일치 또는 형식 오류
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let secret = JwtConfig::secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());

        decode::<TokenClaims>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::TokenExpired("토큰이 만료되었습니다".to_string())
                }
                _ => {
                    log::debug!("JWT 검증 실패: {}", e);
                    AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string())
                }
            })
    }

    /// `Authorization` 헤더 값에서 토큰 부분만 꺼냅니다.
    pub fn extract_bearer_token<'a>(&self, header: &'a str) -> Result<&'a str, AppError> {
        header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::AuthenticationError("Bearer 토큰 형식이 아닙니다".to_string())
            })
    }

    pub fn email_from_token(&self, token: &str) -> Result<String, AppError> {
        Ok(self.verify_token(token)?.email)
    }

    pub fn role_from_token(&self, token: &str) -> Result<String, AppError> {
        Ok(self.verify_token(token)?.role)
    }

    pub fn to_authenticated_user(&self, claims: TokenClaims) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            roles: vec![claims.role],
            authorities: claims.authorities,
        }
    }

    /// 액세스 토큰 수명(초)
    pub fn expires_in(&self) -> i64 {
        JwtConfig::expiration_seconds()
    }
}

fn token_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(TokenService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "token_service",
        constructor: token_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset_seconds: i64) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            sub: "65f0c0ffee0000000000beef".to_string(),
            email: "admin@example.com".to_string(),
            role: "ADMIN".to_string(),
            authorities: vec!["USER_READ".to_string()],
            iat: now,
            exp: now + exp_offset_seconds,
        }
    }

    #[test]
    fn test_encode_then_verify() {
        let service = TokenService;
        let token = service.encode_claims(&claims(3600)).unwrap();

        let verified = service.verify_token(&token).unwrap();
        assert_eq!(verified.email, "admin@example.com");
        assert_eq!(verified.role, "ADMIN");
        assert_eq!(service.role_from_token(&token).unwrap(), "ADMIN");
        assert_eq!(service.email_from_token(&token).unwrap(), "admin@example.com");
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService;
        // 기본 leeway(60초)보다 충분히 과거
        let token = service.encode_claims(&claims(-3600)).unwrap();

        match service.verify_token(&token) {
            Err(AppError::TokenExpired(msg)) => assert_eq!(msg, "토큰이 만료되었습니다"),
            other => panic!("Expected TokenExpired, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_token() {
        let service = TokenService;
        let token = service.encode_claims(&claims(3600)).unwrap();
        let tampered = format!("{}x", token);

        assert!(matches!(
            service.verify_token(&tampered),
            Err(AppError::AuthenticationError(_))
        ));
        assert!(matches!(
            service.verify_token("not-a-jwt"),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = TokenService;
        assert_eq!(service.extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
    }

    #[test]
    fn test_to_authenticated_user() {
        let user = TokenService.to_authenticated_user(claims(10));
        assert!(user.is_admin());
        assert!(user.has_authority("USER_READ"));
    }

    #[test]
    fn test_generate_requires_saved_user() {
        let user = User::new("u".to_string(), "u@x.com".to_string(), "h".to_string(), "USER");
        assert!(TokenService.generate_access_token(&user, &[]).is_err());
    }
}
