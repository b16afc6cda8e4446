use serde::Serialize;

use crate::domain::dto::common::{format_datetime, format_optional_datetime};
use crate::domain::entities::challenges::{
    Challenge, ChallengeReward, ChallengeRewardMethod, ChallengeStatus, RewardType,
};
use crate::domain::entities::users::User;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub author_id: String,
    pub tags: Vec<String>,
    pub participant_ids: Vec<String>,
    pub status: ChallengeStatus,
    pub status_label: String,
    pub start_date: String,
    pub end_date: String,
    pub reward_amount: Option<i64>,
    pub reward_type: Option<RewardType>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Challenge> for ChallengeResponse {
    fn from(challenge: Challenge) -> Self {
        Self {
            id: challenge.id_string().unwrap_or_default(),
            status_label: challenge.status.label().to_string(),
            start_date: challenge.start_date.to_string(),
            end_date: challenge.end_date.to_string(),
            created_at: format_datetime(&challenge.created_at),
            updated_at: format_datetime(&challenge.updated_at),
            title: challenge.title,
            description: challenge.description,
            author_id: challenge.author_id,
            tags: challenge.tags,
            participant_ids: challenge.participant_ids,
            status: challenge.status,
            reward_amount: challenge.reward_amount,
            reward_type: challenge.reward_type,
        }
    }
}

/// 챌린지 참가자
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for ParticipantResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            name: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// 참가자/지급자 이름이 채워진 포상 응답
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRewardResponse {
    pub id: String,
    pub challenge_id: String,
    pub participant_id: String,
    pub participant_name: Option<String>,
    pub amount: i64,
    pub method: ChallengeRewardMethod,
    pub method_label: String,
    pub reason: String,
    pub created_at: String,
    pub created_by: String,
    pub created_by_name: Option<String>,
    pub processed: bool,
    pub processed_at: Option<String>,
}

impl From<ChallengeReward> for ChallengeRewardResponse {
    fn from(reward: ChallengeReward) -> Self {
        Self {
            id: reward.id_string().unwrap_or_default(),
            method_label: reward.method.label().to_string(),
            created_at: format_datetime(&reward.created_at),
            processed_at: format_optional_datetime(&reward.processed_at),
            challenge_id: reward.challenge_id,
            participant_id: reward.participant_id,
            participant_name: None,
            amount: reward.amount,
            method: reward.method,
            reason: reward.reason,
            created_by: reward.created_by,
            created_by_name: None,
            processed: reward.processed,
        }
    }
}

impl ChallengeRewardResponse {
    pub fn with_names(mut self, participant_name: Option<String>, created_by_name: Option<String>) -> Self {
        self.participant_name = participant_name;
        self.created_by_name = created_by_name;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopChallenge {
    pub challenge_id: String,
    pub challenge_title: Option<String>,
    pub total_amount: i64,
    pub reward_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopParticipant {
    pub participant_id: String,
    pub participant_name: Option<String>,
    pub total_amount: i64,
    pub reward_count: u64,
}

/// 포상 통계
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardStatistics {
    pub total_rewards_count: u64,
    pub processed_rewards_count: u64,
    pub total_amount: i64,
    pub top_challenges: Vec<TopChallenge>,
    pub top_participants: Vec<TopParticipant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::challenges::ChallengeDetails;
    use chrono::NaiveDate;

    #[test]
    fn test_challenge_response_shape() {
        let details = ChallengeDetails {
            title: "10승".to_string(),
            description: None,
            tags: vec!["rank".to_string()],
            reward_amount: Some(100),
            reward_type: Some(RewardType::Cash),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        };
        let challenge = Challenge::new("author".to_string(), details).unwrap();
        let json = serde_json::to_value(ChallengeResponse::from(challenge)).unwrap();

        assert_eq!(json["status"], "RECRUITING");
        assert_eq!(json["statusLabel"], "모집중");
        assert_eq!(json["startDate"], "2025-01-01");
        assert_eq!(json["rewardType"], "CASH");
        assert_eq!(json["authorId"], "author");
    }

    #[test]
    fn test_reward_response_with_names() {
        let reward = ChallengeReward::new(
            "c".to_string(),
            "p".to_string(),
            10,
            ChallengeRewardMethod::Item,
            "참가상",
            "admin".to_string(),
        )
        .unwrap();
        let response = ChallengeRewardResponse::from(reward)
            .with_names(Some("kim".to_string()), Some("관리자".to_string()));
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["participantName"], "kim");
        assert_eq!(json["createdByName"], "관리자");
        assert_eq!(json["methodLabel"], "아이템");
        assert!(json["processedAt"].is_null());
    }
}
