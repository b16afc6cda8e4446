use serde::Serialize;

use crate::domain::dto::common::format_datetime;
use crate::domain::entities::challenges::RewardType;
use crate::domain::entities::rewards::RewardHistory;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardHistoryResponse {
    pub id: String,
    pub challenge_id: String,
    pub participant_id: String,
    pub reward_amount: i64,
    pub reward_type: RewardType,
    pub created_at: String,
}

impl From<RewardHistory> for RewardHistoryResponse {
    fn from(history: RewardHistory) -> Self {
        Self {
            id: history.id_string().unwrap_or_default(),
            created_at: format_datetime(&history.created_at),
            challenge_id: history.challenge_id,
            participant_id: history.participant_id,
            reward_amount: history.reward_amount,
            reward_type: history.reward_type,
        }
    }
}
