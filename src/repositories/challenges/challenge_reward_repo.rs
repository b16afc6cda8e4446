//! 챌린지 포상 리포지토리
//!
//! 통계 조회는 MongoDB aggregation으로 계산합니다.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{
    bson::{self, doc, Bson, Document},
    options::IndexOptions,
    Collection, IndexModel,
};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::{
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{parse_object_id, Database},
    domain::entities::challenges::ChallengeReward,
};

const COLLECTION: &str = "challenge_rewards";

static CHALLENGE_REWARD_REPOSITORY_INSTANCE: OnceCell<Arc<ChallengeRewardRepository>> =
    OnceCell::new();

/// `$group` 결과 한 줄
#[derive(Debug, Clone, Deserialize)]
pub struct AmountSummary {
    #[serde(rename = "_id")]
    pub key: String,
    pub total_amount: i64,
    pub reward_count: u64,
}

pub struct ChallengeRewardRepository {
    db: Arc<Database>,
}

impl ChallengeRewardRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        CHALLENGE_REWARD_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<ChallengeReward> {
        self.db.collection::<ChallengeReward>(COLLECTION)
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<ChallengeReward>, AppError> {
        self.collection()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, AppError> {
        self.collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_challenge(&self, challenge_id: &str) -> Result<Vec<ChallengeReward>, AppError> {
        self.find_many(doc! { "challenge_id": challenge_id }).await
    }

    pub async fn find_by_participant(&self, participant_id: &str) -> Result<Vec<ChallengeReward>, AppError> {
        self.find_many(doc! { "participant_id": participant_id }).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ChallengeReward>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut reward: ChallengeReward) -> Result<ChallengeReward, AppError> {
        let result = self
            .collection()
            .insert_one(&reward)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        reward.id = result.inserted_id.as_object_id();
        Ok(reward)
    }

    pub async fn save(&self, reward: &ChallengeReward) -> Result<(), AppError> {
        let object_id = reward
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 포상입니다".to_string()))?;

        self.collection()
            .replace_one(doc! { "_id": object_id }, reward)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn count_all(&self) -> Result<u64, AppError> {
        self.collection()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_processed(&self) -> Result<u64, AppError> {
        self.collection()
            .count_documents(doc! { "processed": true })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn total_amount(&self) -> Result<i64, AppError> {
        let rows = self
            .aggregate(vec![doc! { "$group": { "_id": Bson::Null, "total": { "$sum": "$amount" } } }])
            .await?;

        Ok(rows
            .first()
            .and_then(|row| row.get("total"))
            .map(bson_to_i64)
            .unwrap_or(0))
    }

    /// 금액 합계 내림차순 상위 `limit`개
    pub async fn top_by(&self, field: &str, limit: i64) -> Result<Vec<AmountSummary>, AppError> {
        let rows = self
            .aggregate(vec![
                doc! {
                    "$group": {
                        "_id": format!("${}", field),
                        "total_amount": { "$sum": { "$toLong": "$amount" } },
                        "reward_count": { "$sum": 1 },
                    }
                },
                doc! { "$sort": { "total_amount": -1, "_id": 1 } },
                doc! { "$limit": limit },
            ])
            .await?;

        rows.into_iter()
            .map(|row| {
                bson::from_document::<AmountSummary>(row)
                    .map_err(|e| AppError::DatabaseError(e.to_string()))
            })
            .collect()
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let challenge_index = IndexModel::builder()
            .keys(doc! { "challenge_id": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("challenge_created_at".to_string())
                .build())
            .build();

        let participant_index = IndexModel::builder()
            .keys(doc! { "participant_id": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("participant_created_at".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([challenge_index, participant_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

fn bson_to_i64(value: &Bson) -> i64 {
    match value {
        Bson::Int64(v) => *v,
        Bson::Int32(v) => i64::from(*v),
        Bson::Double(v) => *v as i64,
        _ => 0,
    }
}

#[async_trait]
impl Repository for ChallengeRewardRepository {
    fn name(&self) -> &str {
        "challenge_reward"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn challenge_reward_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(ChallengeRewardRepository::instance())
}

fn challenge_reward_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { ChallengeRewardRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "challenge_reward_repository",
        constructor: challenge_reward_repository_constructor,
        initializer: challenge_reward_repository_initializer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bson_to_i64() {
        assert_eq!(bson_to_i64(&Bson::Int32(7)), 7);
        assert_eq!(bson_to_i64(&Bson::Int64(1 << 40)), 1 << 40);
        assert_eq!(bson_to_i64(&Bson::Double(3.9)), 3);
        assert_eq!(bson_to_i64(&Bson::Null), 0);
    }

    #[test]
    fn test_amount_summary_from_group_row() {
        let row = doc! { "_id": "c1", "total_amount": 1500_i64, "reward_count": 3_i32 };
        let summary: AmountSummary = bson::from_document(row).unwrap();
        assert_eq!(summary.key, "c1");
        assert_eq!(summary.total_amount, 1500);
        assert_eq!(summary.reward_count, 3);
    }
}
