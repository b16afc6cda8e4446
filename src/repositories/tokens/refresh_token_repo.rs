//! 리프레시 토큰 리포지토리
//!
//! 만료된 문서는 `expires_at` TTL 인덱스로 MongoDB가 정리합니다.
//! 폐기는 `revoked: false` 조건부 갱신이라 같은 토큰은 한 번만 폐기됩니다.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::IndexOptions,
    Collection, IndexModel,
};
use once_cell::sync::OnceCell;

use crate::{
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::Database,
    domain::entities::tokens::RefreshToken,
};

const COLLECTION: &str = "refresh_tokens";

/// 리프레시 토큰 저장소 경계
///
/// [`RefreshTokenService`](crate::services::auth::RefreshTokenService)는 이 트레이트로만 저장소에 접근합니다.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn find_usable_by_user(&self, user_id: &str) -> Result<Vec<RefreshToken>, AppError>;

    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, AppError>;

    /// 아직 폐기되지 않은 토큰을 폐기합니다. 이미 폐기되었으면 `false`.
    async fn mark_revoked(&self, token: &RefreshToken) -> Result<bool, AppError>;
}

static REFRESH_TOKEN_REPOSITORY_INSTANCE: OnceCell<Arc<RefreshTokenRepository>> =
    OnceCell::new();

pub struct RefreshTokenRepository {
    db: Arc<Database>,
}

impl RefreshTokenRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        REFRESH_TOKEN_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<RefreshToken> {
        self.db.collection::<RefreshToken>(COLLECTION)
    }

    pub async fn revoke_all_for_user(&self, user_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection()
            .update_many(
                doc! { "user_id": user_id, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "revoked": 1 })
            .options(IndexOptions::builder()
                .name("user_revoked".to_string())
                .build())
            .build();

        let ttl_index = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(IndexOptions::builder()
                .expire_after(Duration::from_secs(0))
                .name("expires_at_ttl".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([user_index, ttl_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for RefreshTokenRepository {
    /// 폐기되지 않았고 만료되지 않은 토큰 (최신순)
    async fn find_usable_by_user(&self, user_id: &str) -> Result<Vec<RefreshToken>, AppError> {
        self.collection()
            .find(doc! {
                "user_id": user_id,
                "revoked": false,
                "expires_at": { "$gt": DateTime::now() },
            })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn create(&self, mut token: RefreshToken) -> Result<RefreshToken, AppError> {
        let result = self
            .collection()
            .insert_one(&token)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        token.id = result.inserted_id.as_object_id();
        Ok(token)
    }

    async fn mark_revoked(&self, token: &RefreshToken) -> Result<bool, AppError> {
        let object_id = token
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 토큰입니다".to_string()))?;

        let result = self
            .collection()
            .update_one(revoke_filter(object_id), doc! { "$set": { "revoked": true } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count > 0)
    }
}

pub(crate) fn revoke_filter(object_id: ObjectId) -> Document {
    doc! { "_id": object_id, "revoked": false }
}

#[async_trait]
impl Repository for RefreshTokenRepository {
    fn name(&self) -> &str {
        "refresh_token"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn refresh_token_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(RefreshTokenRepository::instance())
}

fn refresh_token_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { RefreshTokenRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "refresh_token_repository",
        constructor: refresh_token_repository_constructor,
        initializer: refresh_token_repository_initializer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_filter_only_matches_live_tokens() {
        let id = ObjectId::new();
        let filter = revoke_filter(id);

        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert!(!filter.get_bool("revoked").unwrap());
    }
}
