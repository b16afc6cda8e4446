//! 챌린지 포상 서비스
//!
//! 관리자가 챌린지 참가자에게 포상을 지급하고, 지급 내역과 통계를 조회합니다.
//! 포상은 저장 직후 처리 완료로 표시됩니다.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::{
        dto::challenges::{
            ChallengeRewardResponse, CreateChallengeRewardRequest, RewardStatistics, TopChallenge,
            TopParticipant,
        },
        entities::challenges::ChallengeReward,
    },
    repositories::{
        challenges::{ChallengeRepository, ChallengeRewardRepository},
        users::UserRepository,
    },
};

const TOP_LIMIT: i64 = 5;

static CHALLENGE_REWARD_SERVICE_INSTANCE: OnceCell<Arc<ChallengeRewardService>> = OnceCell::new();

pub struct ChallengeRewardService {
    reward_repo: Arc<ChallengeRewardRepository>,

    challenge_repo: Arc<ChallengeRepository>,

    user_repo: Arc<UserRepository>,
}

impl ChallengeRewardService {
    fn new() -> Self {
        Self {
            reward_repo: ChallengeRewardRepository::instance(),
            challenge_repo: ChallengeRepository::instance(),
            user_repo: UserRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        CHALLENGE_REWARD_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// # Errors
    ///
    /// * `AppError::NotFound` - 챌린지 또는 참가자가 없음
    /// * `AppError::ValidationError` - 참가자가 챌린지에 참여하지 않았거나 금액/사유 오류
    pub async fn create_reward(
        &self,
        challenge_id: &str,
        request: CreateChallengeRewardRequest,
        created_by: &str,
    ) -> Result<ChallengeRewardResponse, AppError> {
        let challenge = self
            .challenge_repo
            .find_by_id(challenge_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("챌린지를 찾을 수 없습니다: {}", challenge_id)))?;

        let participant_id = request.participant_id.trim();
        if self.user_repo.find_by_id(participant_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "참가자를 찾을 수 없습니다: {}",
                participant_id
            )));
        }

        if !challenge.is_participant(participant_id) {
            return Err(AppError::ValidationError(
                "해당 참가자는 이 챌린지에 참여하지 않았습니다.".to_string(),
            ));
        }

        let reward = ChallengeReward::new(
            challenge_id.to_string(),
            participant_id.to_string(),
            request.amount,
            request.method,
            &request.reason,
            created_by.to_string(),
        )?;
        let mut reward = self.reward_repo.create(reward).await?;

        reward.mark_as_processed();
        self.reward_repo.save(&reward).await?;

        log::info!(
            "포상 지급: challenge={} participant={} amount={} {}",
            challenge_id,
            participant_id,
            reward.amount,
            reward.method
        );

        let mut enriched = self.enrich(vec![reward]).await?;
        enriched
            .pop()
            .ok_or_else(|| AppError::InternalError("포상 응답 생성 실패".to_string()))
    }

    pub async fn rewards_by_challenge(&self, challenge_id: &str) -> Result<Vec<ChallengeRewardResponse>, AppError> {
        let rewards = self.reward_repo.find_by_challenge(challenge_id).await?;
        self.enrich(rewards).await
    }

    pub async fn rewards_by_participant(&self, participant_id: &str) -> Result<Vec<ChallengeRewardResponse>, AppError> {
        let rewards = self.reward_repo.find_by_participant(participant_id).await?;
        self.enrich(rewards).await
    }

    pub async fn reward_by_id(&self, reward_id: &str) -> Result<Option<ChallengeRewardResponse>, AppError> {
        match self.reward_repo.find_by_id(reward_id).await? {
            Some(reward) => Ok(self.enrich(vec![reward]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn statistics(&self) -> Result<RewardStatistics, AppError> {
        let total_rewards_count = self.reward_repo.count_all().await?;
        let processed_rewards_count = self.reward_repo.count_processed().await?;
        let total_amount = self.reward_repo.total_amount().await?;

        let challenge_rows = self.reward_repo.top_by("challenge_id", TOP_LIMIT).await?;
        let participant_rows = self.reward_repo.top_by("participant_id", TOP_LIMIT).await?;

        let mut top_challenges = Vec::with_capacity(challenge_rows.len());
        for row in challenge_rows {
            let challenge_title = self
                .challenge_repo
                .find_by_id(&row.key)
                .await
                .ok()
                .flatten()
                .map(|c| c.title);
            top_challenges.push(TopChallenge {
                challenge_id: row.key,
                challenge_title,
                total_amount: row.total_amount,
                reward_count: row.reward_count,
            });
        }

        let participant_ids: Vec<String> = participant_rows.iter().map(|r| r.key.clone()).collect();
        let names = self.usernames(&participant_ids).await?;
        let top_participants = participant_rows
            .into_iter()
            .map(|row| TopParticipant {
                participant_name: names.get(&row.key).cloned(),
                participant_id: row.key,
                total_amount: row.total_amount,
                reward_count: row.reward_count,
            })
            .collect();

        Ok(RewardStatistics {
            total_rewards_count,
            processed_rewards_count,
            total_amount,
            top_challenges,
            top_participants,
        })
    }

    /// 참가자/지급자 이름을 한 번의 조회로 채웁니다.
    async fn enrich(&self, rewards: Vec<ChallengeReward>) -> Result<Vec<ChallengeRewardResponse>, AppError> {
        let mut ids: Vec<String> = rewards
            .iter()
            .flat_map(|r| [r.participant_id.clone(), r.created_by.clone()])
            .collect();
        ids.sort();
        ids.dedup();

        let names = self.usernames(&ids).await?;

        Ok(rewards
            .into_iter()
            .map(|reward| {
                let participant_name = names.get(&reward.participant_id).cloned();
                let created_by_name = names.get(&reward.created_by).cloned();
                ChallengeRewardResponse::from(reward).with_names(participant_name, created_by_name)
            })
            .collect())
    }

    async fn usernames(&self, ids: &[String]) -> Result<HashMap<String, String>, AppError> {
        let users = self.user_repo.find_by_ids(ids).await?;
        Ok(users
            .into_iter()
            .filter_map(|user| user.id_string().map(|id| (id, user.username)))
            .collect())
    }
}

fn challenge_reward_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(ChallengeRewardService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "challenge_reward_service",
        constructor: challenge_reward_service_constructor,
    }
}
