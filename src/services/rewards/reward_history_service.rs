//! 외부 포상 결과 수신 서비스
//!
//! 요청 본문은 임의의 JSON 객체이며 필드는 느슨하게 해석합니다.
//!
//! | 필드 | 허용 값 |
//! |------|---------|
//! | `challengeId`, `participantId` | 문자열 또는 정수 |
//! | `rewardAmount` | 정수 또는 숫자 문자열 |
//! | `rewardType` | `POINT`/`CASH`/`COUPON`/`GIFT` (대소문자 무시) |

use std::any::Any;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::entities::{challenges::RewardType, rewards::RewardHistory},
    services::rewards::RewardService,
    utils::value_utils::{extract_i64, extract_id, extract_string},
};

const MISSING_FIELDS_MESSAGE: &str =
    "Required fields are missing: challengeId, participantId, rewardAmount, rewardType";

static REWARD_HISTORY_SERVICE_INSTANCE: OnceCell<Arc<RewardHistoryService>> = OnceCell::new();

/// 검증을 통과한 포상 결과
#[derive(Debug, Clone, PartialEq)]
pub struct RewardHistoryInput {
    pub challenge_id: String,
    pub participant_id: String,
    pub reward_amount: i64,
    pub reward_type: RewardType,
}

impl RewardHistoryInput {
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 필수 필드 누락 또는 알 수 없는 보상 종류
    pub fn from_map(data: &Map<String, Value>) -> Result<Self, AppError> {
        let challenge_id = extract_id(data, "challengeId");
        let participant_id = extract_id(data, "participantId");
        let reward_amount = extract_i64(data, "rewardAmount");
        let reward_type = extract_string(data, "rewardType");

        let (Some(challenge_id), Some(participant_id), Some(reward_amount), Some(reward_type)) =
            (challenge_id, participant_id, reward_amount, reward_type)
        else {
            return Err(AppError::ValidationError(MISSING_FIELDS_MESSAGE.to_string()));
        };

        Ok(Self {
            challenge_id,
            participant_id,
            reward_amount,
            reward_type: RewardType::from_str(&reward_type)?,
        })
    }
}

pub struct RewardHistoryService {
    reward_service: Arc<RewardService>,
}

impl RewardHistoryService {
    fn new() -> Self {
        Self {
            reward_service: RewardService::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        REWARD_HISTORY_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    pub async fn save_reward_history(&self, data: &Map<String, Value>) -> Result<RewardHistory, AppError> {
        let input = RewardHistoryInput::from_map(data)?;

        self.reward_service
            .give_reward(
                &input.challenge_id,
                &input.participant_id,
                input.reward_amount,
                input.reward_type,
            )
            .await
    }

    pub async fn reward_history(&self, challenge_id: &str) -> Result<Vec<RewardHistory>, AppError> {
        self.reward_service.reward_history(challenge_id).await
    }
}

fn reward_history_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(RewardHistoryService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "reward_history_service",
        constructor: reward_history_service_constructor,
    }
}
