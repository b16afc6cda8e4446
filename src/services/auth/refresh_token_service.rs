//! 리프레시 토큰 서비스
//!
//! 원문 토큰은 48바이트 난수를 base64url(패딩 없음)로 인코딩한 값이며
//! 클라이언트에게만 전달됩니다. 서버에는 bcrypt 해시만 저장됩니다.
//!
//! ```text
//! login   → create()  → (원문, 저장된 토큰)
//! refresh → rotate()  → 기존 토큰 폐기 + 새 토큰 발급
//! logout  → revoke()
//! ```
//!
//! 폐기는 조건부 갱신이므로 같은 원문으로 동시에 회전하면 한 요청만 새 토큰을 받습니다.

use std::any::Any;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use mongodb::bson::DateTime;
use once_cell::sync::OnceCell;
use rand::Rng;

use crate::{
    config::JwtConfig,
    core::{errors::AppError, registry::ServiceRegistration},
    domain::entities::tokens::RefreshToken,
    repositories::tokens::{RefreshTokenRepository, RefreshTokenStore},
    services::auth::password::{hash_password, verify_password},
};

const RAW_TOKEN_BYTES: usize = 48;
const INVALID_REFRESH_TOKEN: &str = "유효하지 않은 리프레시 토큰입니다";

static REFRESH_TOKEN_SERVICE_INSTANCE: OnceCell<Arc<RefreshTokenService>> = OnceCell::new();

pub struct RefreshTokenService {
    refresh_token_repo: Arc<dyn RefreshTokenStore>,
}

impl RefreshTokenService {
    fn new() -> Self {
        Self::with_store(RefreshTokenRepository::instance())
    }

    fn with_store(refresh_token_repo: Arc<dyn RefreshTokenStore>) -> Self {
        Self { refresh_token_repo }
    }

    pub fn instance() -> Arc<Self> {
        REFRESH_TOKEN_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// 새 리프레시 토큰을 발급합니다.
    ///
    /// # Returns
    ///
    /// * `(원문 토큰, 저장된 엔티티)`
    pub async fn create(
        &self,
        user_id: &str,
        ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(String, RefreshToken), AppError> {
        let raw = generate_raw_token();
        let token_hash = hash_password(&raw)?;

        let expires_at = Utc::now() + Duration::days(JwtConfig::refresh_expiration_days());
        let token = RefreshToken::new(
            user_id.to_string(),
            token_hash,
            DateTime::from_millis(expires_at.timestamp_millis()),
            ip,
            user_agent,
        );

        let saved = self.refresh_token_repo.create(token).await?;
        log::debug!("리프레시 토큰 발급: user={}", user_id);

        Ok((raw, saved))
    }

    /// 폐기되지 않고 만료되지 않은 토큰 중 원문과 해시가 일치하는 첫 토큰
    pub async fn find_valid(&self, user_id: &str, raw: &str) -> Result<Option<RefreshToken>, AppError> {
        let candidates = self.refresh_token_repo.find_usable_by_user(user_id).await?;
        let now = DateTime::now();

        Ok(candidates
            .into_iter()
            .filter(|token| token.is_usable(now))
            .find(|token| verify_password(raw, &token.token_hash)))
    }

    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 다른 요청이 먼저 폐기한 토큰
    pub async fn revoke(&self, token: &mut RefreshToken) -> Result<(), AppError> {
        if !self.refresh_token_repo.mark_revoked(token).await? {
            log::warn!("이미 폐기된 리프레시 토큰 재사용 시도: user={}", token.user_id);
            return Err(AppError::AuthenticationError(INVALID_REFRESH_TOKEN.to_string()));
        }
        token.revoke();
        Ok(())
    }

    /// 기존 토큰을 폐기하고 새 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 일치하는 유효 토큰이 없거나 동시 요청이 먼저 회전함
    pub async fn rotate(
        &self,
        user_id: &str,
        raw: &str,
        ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(String, RefreshToken), AppError> {
        let mut current = self
            .find_valid(user_id, raw)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_REFRESH_TOKEN.to_string()))?;

        self.revoke(&mut current).await?;
        self.create(user_id, ip, user_agent).await
    }

    /// 로그아웃 처리. 일치하는 토큰이 없으면 `false`.
    pub async fn revoke_by_raw(&self, user_id: &str, raw: &str) -> Result<bool, AppError> {
        match self.find_valid(user_id, raw).await? {
            Some(mut token) => match self.revoke(&mut token).await {
                Ok(()) => Ok(true),
                Err(AppError::AuthenticationError(_)) => Ok(false),
                Err(e) => Err(e),
            },
            None => Ok(false),
        }
    }
}

pub fn generate_raw_token() -> String {
    let mut bytes = [0u8; RAW_TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn refresh_token_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(RefreshTokenService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "refresh_token_service",
        constructor: refresh_token_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mongodb::bson::oid::ObjectId;
    use std::sync::Mutex;

    /// `revoked: false` 조건부 갱신을 흉내 내는 메모리 저장소
    #[derive(Default)]
    struct MemoryStore {
        tokens: Mutex<Vec<RefreshToken>>,
    }

    #[async_trait]
    impl RefreshTokenStore for MemoryStore {
        async fn find_usable_by_user(&self, user_id: &str) -> Result<Vec<RefreshToken>, AppError> {
            let now = DateTime::now();
            let tokens = self.tokens.lock().unwrap();
            Ok(tokens
                .iter()
                .filter(|t| t.user_id == user_id && t.is_usable(now))
                .cloned()
                .collect())
        }

        async fn create(&self, mut token: RefreshToken) -> Result<RefreshToken, AppError> {
            token.id = Some(ObjectId::new());
            self.tokens.lock().unwrap().push(token.clone());
            Ok(token)
        }

        async fn mark_revoked(&self, token: &RefreshToken) -> Result<bool, AppError> {
            let mut tokens = self.tokens.lock().unwrap();
            match tokens.iter_mut().find(|t| t.id == token.id && !t.revoked) {
                Some(stored) => {
                    stored.revoked = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    fn service() -> RefreshTokenService {
        RefreshTokenService::with_store(Arc::new(MemoryStore::default()))
    }

    #[actix_web::test]
    async fn test_rotated_token_cannot_be_reused() {
        let service = service();
        let (raw, _) = service.create("u1", None, None).await.unwrap();

        let (next_raw, _) = service.rotate("u1", &raw, None, None).await.unwrap();
        assert_ne!(raw, next_raw);

        let reused = service.rotate("u1", &raw, None, None).await;
        assert!(matches!(reused, Err(AppError::AuthenticationError(_))));
    }

    #[actix_web::test]
    async fn test_concurrent_rotation_issues_one_token() {
        let service = service();
        let (raw, _) = service.create("u1", None, None).await.unwrap();

        // 두 요청이 모두 폐기 전에 같은 토큰을 찾은 상황
        let mut first = service.find_valid("u1", &raw).await.unwrap().unwrap();
        let mut second = service.find_valid("u1", &raw).await.unwrap().unwrap();

        assert!(service.revoke(&mut first).await.is_ok());
        assert!(matches!(
            service.revoke(&mut second).await,
            Err(AppError::AuthenticationError(_))
        ));
        assert!(!second.revoked);
    }

    #[actix_web::test]
    async fn test_logout_after_rotation_reports_missing_token() {
        let service = service();
        let (raw, _) = service.create("u1", None, None).await.unwrap();
        service.rotate("u1", &raw, None, None).await.unwrap();

        assert!(!service.revoke_by_raw("u1", &raw).await.unwrap());
    }

    #[test]
    fn test_raw_token_shape() {
        let token = generate_raw_token();
        // 48바이트 → 64자, 패딩 없음
        assert_eq!(token.len(), 64);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_raw_tokens_are_unique() {
        assert_ne!(generate_raw_token(), generate_raw_token());
    }
}
