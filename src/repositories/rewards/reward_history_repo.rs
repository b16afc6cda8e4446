//! 포상 이력 리포지토리
//!
//! (challenge_id, participant_id) 복합 unique 인덱스로 중복 지급을 막습니다.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::{
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{is_duplicate_key_error, Database},
    domain::entities::rewards::RewardHistory,
};

const COLLECTION: &str = "reward_histories";

pub const DUPLICATE_REWARD_MESSAGE: &str = "이미 포상이 지급된 참가자입니다.";

static REWARD_HISTORY_REPOSITORY_INSTANCE: OnceCell<Arc<RewardHistoryRepository>> =
    OnceCell::new();

pub struct RewardHistoryRepository {
    db: Arc<Database>,
}

impl RewardHistoryRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        REWARD_HISTORY_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<RewardHistory> {
        self.db.collection::<RewardHistory>(COLLECTION)
    }

    pub async fn find_by_challenge(&self, challenge_id: &str) -> Result<Vec<RewardHistory>, AppError> {
        self.collection()
            .find(doc! { "challenge_id": challenge_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn exists(&self, challenge_id: &str, participant_id: &str) -> Result<bool, AppError> {
        let found = self
            .collection()
            .find_one(doc! { "challenge_id": challenge_id, "participant_id": participant_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(found.is_some())
    }

    pub async fn count_by_challenge(&self, challenge_id: &str) -> Result<u64, AppError> {
        self.collection()
            .count_documents(doc! { "challenge_id": challenge_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 중복 쌍은 `ConflictError`
    pub async fn create(&self, mut history: RewardHistory) -> Result<RewardHistory, AppError> {
        let result = self.collection().insert_one(&history).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError(DUPLICATE_REWARD_MESSAGE.to_string())
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        history.id = result.inserted_id.as_object_id();
        Ok(history)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "challenge_id": 1, "participant_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("challenge_participant_unique".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([pair_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for RewardHistoryRepository {
    fn name(&self) -> &str {
        "reward_history"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn reward_history_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(RewardHistoryRepository::instance())
}

fn reward_history_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { RewardHistoryRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "reward_history_repository",
        constructor: reward_history_repository_constructor,
        initializer: reward_history_repository_initializer,
    }
}
