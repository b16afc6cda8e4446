//! 포상 이력 엔티티
//!
//! 외부 정산 시스템이 보고한 포상 지급 결과입니다.
//! (challenge_id, participant_id) 쌍은 유일합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::domain::entities::challenges::RewardType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardHistory {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub challenge_id: String,
    pub participant_id: String,
    pub reward_amount: i64,
    pub reward_type: RewardType,
    pub created_at: DateTime,
}

impl RewardHistory {
    pub fn new(
        challenge_id: String,
        participant_id: String,
        reward_amount: i64,
        reward_type: RewardType,
    ) -> Self {
        Self {
            id: None,
            challenge_id,
            participant_id,
            reward_amount,
            reward_type,
            created_at: DateTime::now(),
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_for(&self, challenge_id: &str, participant_id: &str) -> bool {
        self.challenge_id == challenge_id && self.participant_id == participant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_for() {
        let history = RewardHistory::new("c1".to_string(), "p1".to_string(), 100, RewardType::Point);
        assert!(history.is_for("c1", "p1"));
        assert!(!history.is_for("c1", "p2"));
        assert!(!history.is_for("c2", "p1"));
    }
}
