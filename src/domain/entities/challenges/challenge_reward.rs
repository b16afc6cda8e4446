//! 챌린지 포상 엔티티
//!
//! 관리자가 챌린지 참가자에게 지급한 포상 한 건을 나타냅니다.

use std::fmt;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChallengeRewardMethod {
    Cash,
    Item,
}

impl ChallengeRewardMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeRewardMethod::Cash => "CASH",
            ChallengeRewardMethod::Item => "ITEM",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChallengeRewardMethod::Cash => "현금",
            ChallengeRewardMethod::Item => "아이템",
        }
    }
}

impl fmt::Display for ChallengeRewardMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeReward {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub challenge_id: String,
    pub participant_id: String,
    pub amount: i64,
    pub method: ChallengeRewardMethod,
    pub reason: String,
    pub created_at: DateTime,
    /// 지급한 관리자 ID
    pub created_by: String,
    #[serde(default)]
    pub processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime>,
}

impl ChallengeReward {
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 금액이 1 미만이거나 사유가 비어 있음
    pub fn new(
        challenge_id: String,
        participant_id: String,
        amount: i64,
        method: ChallengeRewardMethod,
        reason: &str,
        created_by: String,
    ) -> Result<Self, AppError> {
        if amount < 1 {
            return Err(AppError::ValidationError(
                "포상 금액은 1 이상이어야 합니다".to_string(),
            ));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::ValidationError("포상 사유는 필수입니다".to_string()));
        }

        Ok(Self {
            id: None,
            challenge_id,
            participant_id,
            amount,
            method,
            reason: reason.to_string(),
            created_at: DateTime::now(),
            created_by,
            processed: false,
            processed_at: None,
        })
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn mark_as_processed(&mut self) {
        self.processed = true;
        self.processed_at = Some(DateTime::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reward_is_unprocessed() {
        let reward = ChallengeReward::new(
            "c1".to_string(),
            "p1".to_string(),
            5000,
            ChallengeRewardMethod::Cash,
            " 1등 ",
            "admin".to_string(),
        )
        .unwrap();

        assert_eq!(reward.reason, "1등");
        assert!(!reward.processed);
        assert!(reward.processed_at.is_none());
    }

    #[test]
    fn test_mark_as_processed() {
        let mut reward = ChallengeReward::new(
            "c1".to_string(),
            "p1".to_string(),
            1,
            ChallengeRewardMethod::Item,
            "참가상",
            "admin".to_string(),
        )
        .unwrap();

        reward.mark_as_processed();
        assert!(reward.processed);
        assert!(reward.processed_at.is_some());
    }

    #[test]
    fn test_validation() {
        let zero = ChallengeReward::new(
            "c".to_string(), "p".to_string(), 0, ChallengeRewardMethod::Cash, "x", "a".to_string(),
        );
        assert!(zero.is_err());

        let blank = ChallengeReward::new(
            "c".to_string(), "p".to_string(), 10, ChallengeRewardMethod::Cash, "  ", "a".to_string(),
        );
        assert!(blank.is_err());
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(ChallengeRewardMethod::Cash.label(), "현금");
        assert_eq!(ChallengeRewardMethod::Item.label(), "아이템");
        assert_eq!(
            serde_json::from_str::<ChallengeRewardMethod>("\"ITEM\"").unwrap(),
            ChallengeRewardMethod::Item
        );
    }
}
