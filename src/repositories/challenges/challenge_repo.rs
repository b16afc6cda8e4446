//! 챌린지 리포지토리
//!
//! 참가자 목록은 조건부 `$addToSet` / `$pull`로만 바뀌고,
//! 내용/상태 저장은 참가자 목록을 건드리지 않는 `$set`입니다.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{future::BoxFuture, TryStreamExt};
use chrono::NaiveDate;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use once_cell::sync::OnceCell;

use crate::{
    core::{
        errors::{AppError, ErrorContext},
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{parse_object_id, Database},
    domain::entities::challenges::{Challenge, ChallengeStatus},
};

const COLLECTION: &str = "challenges";

/// 값이 없으면 직렬화에서 빠지므로 `$unset`으로 지워야 하는 필드
const OPTIONAL_FIELDS: [&str; 3] = ["description", "reward_amount", "reward_type"];

/// 참여 조건(모집중, 작성자 아님, 미참여, 기간 내)을 모두 만족하는 문서만 고릅니다.
///
/// 날짜는 `YYYY-MM-DD` 문자열로 저장되므로 문자열 비교가 날짜 비교와 같습니다.
pub(crate) fn join_filter(object_id: ObjectId, user_id: &str, today: NaiveDate) -> Document {
    doc! {
        "_id": object_id,
        "status": ChallengeStatus::Recruiting.as_str(),
        "author_id": { "$ne": user_id },
        "participant_ids": { "$ne": user_id },
        "end_date": { "$gte": today.to_string() },
    }
}

pub(crate) fn leave_filter(object_id: ObjectId, user_id: &str) -> Document {
    doc! { "_id": object_id, "participant_ids": user_id }
}

/// 참가자 목록과 생성 정보를 제외한 필드의 `$set` / `$unset`
pub(crate) fn details_update(challenge: &Challenge) -> Result<Document, AppError> {
    let mut fields = mongodb::bson::to_document(challenge).context("챌린지 직렬화 실패")?;
    for key in ["_id", "participant_ids", "author_id", "created_at"] {
        fields.remove(key);
    }

    let mut unset = Document::new();
    for key in OPTIONAL_FIELDS {
        if !fields.contains_key(key) {
            unset.insert(key, "");
        }
    }

    let mut update = doc! { "$set": fields };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    Ok(update)
}

static CHALLENGE_REPOSITORY_INSTANCE: OnceCell<Arc<ChallengeRepository>> = OnceCell::new();

pub struct ChallengeRepository {
    db: Arc<Database>,
}

impl ChallengeRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        CHALLENGE_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<Challenge> {
        self.db.collection::<Challenge>(COLLECTION)
    }

    /// 최신순
    async fn find_many(&self, filter: Document) -> Result<Vec<Challenge>, AppError> {
        self.collection()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_all(&self) -> Result<Vec<Challenge>, AppError> {
        self.find_many(doc! {}).await
    }

    pub async fn find_by_status(&self, status: ChallengeStatus) -> Result<Vec<Challenge>, AppError> {
        self.find_many(doc! { "status": status.as_str() }).await
    }

    pub async fn find_by_author(&self, author_id: &str) -> Result<Vec<Challenge>, AppError> {
        self.find_many(doc! { "author_id": author_id }).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Challenge>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut challenge: Challenge) -> Result<Challenge, AppError> {
        let result = self
            .collection()
            .insert_one(&challenge)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        challenge.id = result.inserted_id.as_object_id();
        Ok(challenge)
    }

    fn after_update() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }

    /// 내용/상태를 저장합니다. 읽은 뒤 다른 요청이 상태를 바꿨다면 `false`.
    pub async fn save_details(
        &self,
        challenge: &Challenge,
        expected_status: ChallengeStatus,
    ) -> Result<bool, AppError> {
        let object_id = challenge
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 챌린지입니다".to_string()))?;

        let result = self
            .collection()
            .update_one(
                doc! { "_id": object_id, "status": expected_status.as_str() },
                details_update(challenge)?,
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.matched_count > 0)
    }

    /// 참여 조건을 만족할 때만 참가자를 추가하고 갱신된 챌린지를 반환합니다.
    pub async fn add_participant(
        &self,
        id: &str,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Option<Challenge>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one_and_update(
                join_filter(object_id, user_id, today),
                doc! {
                    "$addToSet": { "participant_ids": user_id },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .with_options(Self::after_update())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 참가 중일 때만 제거합니다.
    pub async fn remove_participant(&self, id: &str, user_id: &str) -> Result<Option<Challenge>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection()
            .find_one_and_update(
                leave_filter(object_id, user_id),
                doc! {
                    "$pull": { "participant_ids": user_id },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .with_options(Self::after_update())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = parse_object_id(id)?;

        let result = self
            .collection()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    /// 사용자 삭제 시 참가 목록에서 제거합니다.
    pub async fn remove_participant_everywhere(&self, user_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection()
            .update_many(
                doc! { "participant_ids": user_id },
                doc! { "$pull": { "participant_ids": user_id } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("status_created_at".to_string())
                .build())
            .build();

        let author_index = IndexModel::builder()
            .keys(doc! { "author_id": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("author_created_at".to_string())
                .build())
            .build();

        let participant_index = IndexModel::builder()
            .keys(doc! { "participant_ids": 1 })
            .options(IndexOptions::builder()
                .name("participant_ids".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([status_index, author_index, participant_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for ChallengeRepository {
    fn name(&self) -> &str {
        "challenge"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn challenge_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(ChallengeRepository::instance())
}

fn challenge_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { ChallengeRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "challenge_repository",
        constructor: challenge_repository_constructor,
        initializer: challenge_repository_initializer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::challenges::ChallengeDetails;

    fn challenge() -> Challenge {
        let details = ChallengeDetails {
            title: "주간 러닝".to_string(),
            description: None,
            tags: vec!["run".to_string()],
            reward_amount: Some(1000),
            reward_type: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        };
        let mut challenge = Challenge::new("author".to_string(), details).unwrap();
        challenge.id = Some(ObjectId::new());
        challenge.participant_ids = vec!["p1".to_string()];
        challenge
    }

    #[test]
    fn test_join_filter_guards_every_rule() {
        let id = ObjectId::new();
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let filter = join_filter(id, "u1", today);

        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(filter.get_str("status").unwrap(), "RECRUITING");
        assert_eq!(filter.get_document("author_id").unwrap().get_str("$ne").unwrap(), "u1");
        assert_eq!(filter.get_document("participant_ids").unwrap().get_str("$ne").unwrap(), "u1");
        assert_eq!(filter.get_document("end_date").unwrap().get_str("$gte").unwrap(), "2025-01-15");
    }

    #[test]
    fn test_leave_filter_requires_membership() {
        let id = ObjectId::new();
        let filter = leave_filter(id, "u1");
        assert_eq!(filter.get_str("participant_ids").unwrap(), "u1");
    }

    #[test]
    fn test_details_update_never_touches_participants() {
        let update = details_update(&challenge()).unwrap();

        let set = update.get_document("$set").unwrap();
        assert!(!set.contains_key("participant_ids"));
        assert!(!set.contains_key("_id"));
        assert!(!set.contains_key("author_id"));
        assert_eq!(set.get_str("title").unwrap(), "주간 러닝");
        assert_eq!(set.get_str("status").unwrap(), "RECRUITING");
        assert_eq!(set.get_str("end_date").unwrap(), "2025-01-31");

        let unset = update.get_document("$unset").unwrap();
        assert!(unset.contains_key("description"));
        assert!(unset.contains_key("reward_type"));
        assert!(!unset.contains_key("reward_amount"));
    }
}
