use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::challenges::{ChallengeDetails, ChallengeRewardMethod, RewardType};

/// 챌린지 생성/수정 요청
///
/// 작성자는 요청 본문이 아니라 인증된 사용자로 정해집니다.
///
/// ```json
/// {
///   "title": "주간 랭크 10승",
///   "description": "이번 주 안에 랭크 게임 10승",
///   "tags": ["rank", "weekly"],
///   "rewardAmount": 5000,
///   "rewardType": "POINT",
///   "startDate": "2025-01-06",
///   "endDate": "2025-01-12"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct ChallengeRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(range(min = 0, message = "Reward amount must be non-negative"))]
    pub reward_amount: Option<i64>,

    pub reward_type: Option<RewardType>,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Title is required".into()));
    }
    if title.chars().count() > 255 {
        return Err(ValidationError::new("length")
            .with_message("Title must not exceed 255 characters".into()));
    }
    Ok(())
}

fn validate_date_range(req: &ChallengeRequest) -> Result<(), ValidationError> {
    if req.end_date <= req.start_date {
        return Err(ValidationError::new("invalid_date_range")
            .with_message("End date must be after start date".into()));
    }
    Ok(())
}

impl From<ChallengeRequest> for ChallengeDetails {
    fn from(req: ChallengeRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            tags: req.tags,
            reward_amount: req.reward_amount,
            reward_type: req.reward_type,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// `GET /api/challenges?status=&authorId=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeListQuery {
    pub status: Option<String>,
    pub author_id: Option<String>,
}

/// 챌린지 포상 지급 요청
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeRewardRequest {
    #[validate(length(min = 1, message = "참가자 ID는 필수입니다"))]
    pub participant_id: String,

    #[validate(range(min = 1, message = "포상 금액은 1 이상이어야 합니다"))]
    pub amount: i64,

    pub method: ChallengeRewardMethod,

    #[validate(length(min = 1, message = "포상 사유는 필수입니다"))]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> ChallengeRequest {
        serde_json::from_value(serde_json::json!({
            "title": "10승",
            "rewardAmount": 100,
            "rewardType": "POINT",
            "startDate": start,
            "endDate": end,
        }))
        .unwrap()
    }

    #[test]
    fn test_date_range_validation() {
        assert!(request("2025-01-01", "2025-01-02").validate().is_ok());
        assert!(request("2025-01-02", "2025-01-02").validate().is_err());
        assert!(request("2025-01-03", "2025-01-02").validate().is_err());
    }

    #[test]
    fn test_negative_reward_rejected() {
        let mut req = request("2025-01-01", "2025-01-02");
        req.reward_amount = Some(-1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_into_details() {
        let details: ChallengeDetails = request("2025-01-01", "2025-01-02").into();
        assert_eq!(details.title, "10승");
        assert_eq!(details.reward_type, Some(RewardType::Point));
        assert!(details.tags.is_empty());
    }

    #[test]
    fn test_reward_request_validation() {
        let req: CreateChallengeRewardRequest = serde_json::from_str(
            r#"{"participantId":"p1","amount":0,"method":"CASH","reason":"1등"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
