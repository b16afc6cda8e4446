//! 포상 이력 조회/지급 서비스
//!
//! 같은 챌린지의 같은 참가자에게는 한 번만 지급할 수 있습니다.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::entities::{challenges::RewardType, rewards::RewardHistory},
    repositories::rewards::{RewardHistoryRepository, DUPLICATE_REWARD_MESSAGE},
};

static REWARD_SERVICE_INSTANCE: OnceCell<Arc<RewardService>> = OnceCell::new();

pub struct RewardService {
    reward_history_repo: Arc<RewardHistoryRepository>,
}

impl RewardService {
    fn new() -> Self {
        Self {
            reward_history_repo: RewardHistoryRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        REWARD_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// # Errors
    ///
    /// * `AppError::ConflictError("이미 포상이 지급된 참가자입니다.")`
    pub async fn give_reward(
        &self,
        challenge_id: &str,
        participant_id: &str,
        reward_amount: i64,
        reward_type: RewardType,
    ) -> Result<RewardHistory, AppError> {
        if self.is_already_rewarded(challenge_id, participant_id).await? {
            return Err(AppError::ConflictError(DUPLICATE_REWARD_MESSAGE.to_string()));
        }

        let history = RewardHistory::new(
            challenge_id.to_string(),
            participant_id.to_string(),
            reward_amount,
            reward_type,
        );
        let saved = self.reward_history_repo.create(history).await?;

        log::info!(
            "포상 이력 저장: challenge={} participant={} {} {}",
            challenge_id,
            participant_id,
            reward_amount,
            reward_type
        );
        Ok(saved)
    }

    pub async fn rewarded_participant_ids(&self, challenge_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .reward_history(challenge_id)
            .await?
            .into_iter()
            .map(|history| history.participant_id)
            .collect())
    }

    pub async fn rewarded_count(&self, challenge_id: &str) -> Result<u64, AppError> {
        self.reward_history_repo.count_by_challenge(challenge_id).await
    }

    pub async fn is_already_rewarded(&self, challenge_id: &str, participant_id: &str) -> Result<bool, AppError> {
        self.reward_history_repo.exists(challenge_id, participant_id).await
    }

    pub async fn reward_history(&self, challenge_id: &str) -> Result<Vec<RewardHistory>, AppError> {
        self.reward_history_repo.find_by_challenge(challenge_id).await
    }
}

fn reward_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(RewardService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "reward_service",
        constructor: reward_service_constructor,
    }
}
