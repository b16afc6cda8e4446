//! 챌린지 엔티티
//!
//! 챌린지는 모집중(RECRUITING)으로 생성되어 진행중(IN_PROGRESS), 완료(COMPLETED)로 전이합니다.
//! 완료/진행중 챌린지는 `reopen`으로 다시 모집 상태가 될 수 있습니다.
//!
//! ```text
//!   RECRUITING ──start──▶ IN_PROGRESS ──complete──▶ COMPLETED
//!        ▲                     │                        │
//!        └───────reopen────────┴────────reopen──────────┘
//! ```
//!
//! 참여 규칙은 `add_participant`가 정해진 순서로 검사합니다.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

pub const TITLE_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    Recruiting,
    InProgress,
    Completed,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Recruiting => "RECRUITING",
            ChallengeStatus::InProgress => "IN_PROGRESS",
            ChallengeStatus::Completed => "COMPLETED",
        }
    }

    /// 화면 표시용 한글 이름
    pub fn label(&self) -> &'static str {
        match self {
            ChallengeStatus::Recruiting => "모집중",
            ChallengeStatus::InProgress => "진행중",
            ChallengeStatus::Completed => "완료",
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RECRUITING" => Ok(ChallengeStatus::Recruiting),
            "IN_PROGRESS" => Ok(ChallengeStatus::InProgress),
            "COMPLETED" => Ok(ChallengeStatus::Completed),
            _ => Err(AppError::ValidationError(format!("Invalid status: {}", s))),
        }
    }
}

/// 챌린지 보상 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RewardType {
    Point,
    Cash,
    Coupon,
    Gift,
}

impl RewardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::Point => "POINT",
            RewardType::Cash => "CASH",
            RewardType::Coupon => "COUPON",
            RewardType::Gift => "GIFT",
        }
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardType {
    type Err = AppError;

    /// 대소문자를 구분하지 않습니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "POINT" => Ok(RewardType::Point),
            "CASH" => Ok(RewardType::Cash),
            "COUPON" => Ok(RewardType::Coupon),
            "GIFT" => Ok(RewardType::Gift),
            _ => Err(AppError::ValidationError(format!("Invalid reward type: {}", s))),
        }
    }
}

/// 생성/수정 시 입력되는 챌린지 내용
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeDetails {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub reward_amount: Option<i64>,
    pub reward_type: Option<RewardType>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ChallengeDetails {
    fn validate(&self) -> Result<(), AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(AppError::ValidationError(
                "Title must not exceed 255 characters".to_string(),
            ));
        }
        if self
            .description
            .as_deref()
            .is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_LEN)
        {
            return Err(AppError::ValidationError(
                "Description must not exceed 1000 characters".to_string(),
            ));
        }
        if self.reward_amount.is_some_and(|amount| amount < 0) {
            return Err(AppError::ValidationError(
                "Reward amount must be non-negative".to_string(),
            ));
        }
        if self.end_date <= self.start_date {
            return Err(AppError::ValidationError(
                "End date must be after start date".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_type: Option<RewardType>,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    pub status: ChallengeStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Challenge {
    /// 모집중 상태의 새 챌린지
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 제목/설명 길이, 음수 보상, 종료일이 시작일 이전
    pub fn new(author_id: String, details: ChallengeDetails) -> Result<Self, AppError> {
        details.validate()?;
        let now = DateTime::now();

        Ok(Self {
            id: None,
            title: details.title.trim().to_string(),
            description: details.description,
            tags: details.tags,
            author_id,
            reward_amount: details.reward_amount,
            reward_type: details.reward_type,
            participant_ids: Vec::new(),
            status: ChallengeStatus::Recruiting,
            start_date: details.start_date,
            end_date: details.end_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 작성자/참여자/상태는 유지하고 내용만 교체합니다.
    pub fn update_details(&mut self, details: ChallengeDetails) -> Result<(), AppError> {
        details.validate()?;

        self.title = details.title.trim().to_string();
        self.description = details.description;
        self.tags = details.tags;
        self.reward_amount = details.reward_amount;
        self.reward_type = details.reward_type;
        self.start_date = details.start_date;
        self.end_date = details.end_date;
        self.touch();
        Ok(())
    }

    pub fn is_recruiting(&self) -> bool {
        self.status == ChallengeStatus::Recruiting
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == ChallengeStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == ChallengeStatus::Completed
    }

    /// 오늘이 종료일 이후면 만료
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.end_date
    }

    pub fn can_participate(&self, today: NaiveDate) -> bool {
        self.is_recruiting() && !self.is_expired(today)
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|id| id == user_id)
    }

    pub fn participant_count(&self) -> usize {
        self.participant_ids.len()
    }

    pub fn is_author(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    /// # Errors
    ///
    /// 검사 순서대로:
    /// 1. 이미 참여
    /// 2. 작성자 본인
    /// 3. 기간 만료
    /// 4. 모집 상태 아님
    pub fn add_participant(&mut self, user_id: &str, today: NaiveDate) -> Result<(), AppError> {
        if self.is_participant(user_id) {
            return Err(AppError::ValidationError("이미 참여한 챌린지입니다.".to_string()));
        }
        if self.is_author(user_id) {
            return Err(AppError::ValidationError(
                "작성자는 챌린지에 참여할 수 없습니다.".to_string(),
            ));
        }
        if self.is_expired(today) {
            return Err(AppError::ValidationError(
                "챌린지 기간이 종료되어 참여할 수 없습니다.".to_string(),
            ));
        }
        if !self.is_recruiting() {
            return Err(AppError::ValidationError("챌린지 모집 상태가 아닙니다.".to_string()));
        }

        self.participant_ids.push(user_id.to_string());
        self.touch();
        Ok(())
    }

    pub fn remove_participant(&mut self, user_id: &str) -> Result<(), AppError> {
        if !self.is_participant(user_id) {
            return Err(AppError::ValidationError("참여하지 않은 챌린지입니다.".to_string()));
        }

        self.participant_ids.retain(|id| id != user_id);
        self.touch();
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), AppError> {
        if !self.is_recruiting() {
            return Err(AppError::ValidationError(
                "모집 중인 챌린지만 시작할 수 있습니다.".to_string(),
            ));
        }
        self.status = ChallengeStatus::InProgress;
        self.touch();
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), AppError> {
        if !self.is_in_progress() {
            return Err(AppError::ValidationError(
                "진행 중인 챌린지만 완료할 수 있습니다.".to_string(),
            ));
        }
        self.status = ChallengeStatus::Completed;
        self.touch();
        Ok(())
    }

    pub fn reopen(&mut self) -> Result<(), AppError> {
        if self.is_recruiting() {
            return Err(AppError::ValidationError("이미 모집 중인 챌린지입니다.".to_string()));
        }
        self.status = ChallengeStatus::Recruiting;
        self.touch();
        Ok(())
    }

    /// 작성자 또는 관리자만 수정/상태 변경/삭제할 수 있습니다.
    pub fn ensure_manageable(&self, user_id: &str, is_admin: bool) -> Result<(), AppError> {
        if is_admin || self.is_author(user_id) {
            Ok(())
        } else {
            Err(AppError::AuthorizationError(
                "챌린지 작성자 또는 관리자만 수행할 수 있습니다.".to_string(),
            ))
        }
    }

    fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn details() -> ChallengeDetails {
        ChallengeDetails {
            title: "  30일 랭크 챌린지 ".to_string(),
            description: Some("매일 한 판".to_string()),
            tags: vec!["rank".to_string()],
            reward_amount: Some(10_000),
            reward_type: Some(RewardType::Point),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 1, 31),
        }
    }

    fn challenge() -> Challenge {
        Challenge::new("author".to_string(), details()).unwrap()
    }

    fn validation_message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_new_challenge_is_recruiting() {
        let c = challenge();
        assert_eq!(c.title, "30일 랭크 챌린지");
        assert_eq!(c.status, ChallengeStatus::Recruiting);
        assert_eq!(c.status.label(), "모집중");
        assert!(c.participant_ids.is_empty());
    }

    #[test]
    fn test_new_challenge_validation() {
        let mut d = details();
        d.end_date = d.start_date;
        assert!(Challenge::new("a".to_string(), d).is_err());

        let mut d = details();
        d.title = "   ".to_string();
        assert!(Challenge::new("a".to_string(), d).is_err());

        let mut d = details();
        d.description = Some("x".repeat(1001));
        assert!(Challenge::new("a".to_string(), d).is_err());

        let mut d = details();
        d.reward_amount = Some(-1);
        assert!(Challenge::new("a".to_string(), d).is_err());
    }

    #[test]
    fn test_expiry_and_participation_window() {
        let c = challenge();
        assert!(!c.is_expired(date(2025, 1, 31)));
        assert!(c.is_expired(date(2025, 2, 1)));
        assert!(c.can_participate(date(2025, 1, 15)));
        assert!(!c.can_participate(date(2025, 2, 1)));
    }

    #[test]
    fn test_add_participant_rules_in_order() {
        let today = date(2025, 1, 10);
        let mut c = challenge();

        c.add_participant("p1", today).unwrap();
        assert!(c.is_participant("p1"));
        assert_eq!(c.participant_count(), 1);

        assert_eq!(validation_message(c.add_participant("p1", today)), "이미 참여한 챌린지입니다.");
        assert_eq!(
            validation_message(c.add_participant("author", today)),
            "작성자는 챌린지에 참여할 수 없습니다."
        );
        assert_eq!(
            validation_message(c.add_participant("p2", date(2025, 3, 1))),
            "챌린지 기간이 종료되어 참여할 수 없습니다."
        );

        c.start().unwrap();
        assert_eq!(validation_message(c.add_participant("p2", today)), "챌린지 모집 상태가 아닙니다.");
        // 이미 참여한 사용자는 상태와 무관하게 중복 메시지가 먼저
        assert_eq!(validation_message(c.add_participant("p1", today)), "이미 참여한 챌린지입니다.");
    }

    #[test]
    fn test_remove_participant() {
        let mut c = challenge();
        c.add_participant("p1", date(2025, 1, 2)).unwrap();
        c.remove_participant("p1").unwrap();
        assert!(!c.is_participant("p1"));
        assert_eq!(validation_message(c.remove_participant("p1")), "참여하지 않은 챌린지입니다.");
    }

    #[test]
    fn test_status_transitions() {
        let mut c = challenge();

        assert_eq!(validation_message(c.complete()), "진행 중인 챌린지만 완료할 수 있습니다.");
        assert_eq!(validation_message(c.reopen()), "이미 모집 중인 챌린지입니다.");

        c.start().unwrap();
        assert_eq!(c.status, ChallengeStatus::InProgress);
        assert_eq!(validation_message(c.start()), "모집 중인 챌린지만 시작할 수 있습니다.");

        c.complete().unwrap();
        assert!(c.is_completed());
        assert_eq!(c.status.label(), "완료");

        c.reopen().unwrap();
        assert!(c.is_recruiting());

        c.start().unwrap();
        c.reopen().unwrap();
        assert!(c.is_recruiting());
    }

    #[test]
    fn test_ensure_manageable() {
        let c = challenge();
        assert!(c.ensure_manageable("author", false).is_ok());
        assert!(c.ensure_manageable("someone", true).is_ok());
        match c.ensure_manageable("someone", false) {
            Err(AppError::AuthorizationError(msg)) => {
                assert_eq!(msg, "챌린지 작성자 또는 관리자만 수행할 수 있습니다.")
            }
            other => panic!("Expected AuthorizationError, got {:?}", other),
        }
    }

    #[test]
    fn test_update_details_keeps_participants_and_status() {
        let mut c = challenge();
        c.add_participant("p1", date(2025, 1, 2)).unwrap();
        c.start().unwrap();

        let mut d = details();
        d.title = "수정된 제목".to_string();
        d.reward_type = Some(RewardType::Gift);
        c.update_details(d).unwrap();

        assert_eq!(c.title, "수정된 제목");
        assert_eq!(c.reward_type, Some(RewardType::Gift));
        assert!(c.is_participant("p1"));
        assert!(c.is_in_progress());
    }

    #[test]
    fn test_parse_status_and_reward_type() {
        assert_eq!("in_progress".parse::<ChallengeStatus>().unwrap(), ChallengeStatus::InProgress);
        assert_eq!("RECRUITING".parse::<ChallengeStatus>().unwrap(), ChallengeStatus::Recruiting);
        match "DONE".parse::<ChallengeStatus>() {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "Invalid status: DONE"),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!("cash".parse::<RewardType>().unwrap(), RewardType::Cash);
        assert!("bitcoin".parse::<RewardType>().is_err());
    }

    #[test]
    fn test_serialization_uses_upper_snake_case() {
        let json = serde_json::to_value(ChallengeStatus::InProgress).unwrap();
        assert_eq!(json, serde_json::json!("IN_PROGRESS"));
        let json = serde_json::to_value(RewardType::Coupon).unwrap();
        assert_eq!(json, serde_json::json!("COUPON"));
    }
}
