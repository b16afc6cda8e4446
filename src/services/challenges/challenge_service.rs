//! 챌린지 서비스
//!
//! 참여/탈퇴 규칙과 상태 전이는 [`Challenge`] 엔티티가 검증하고,
//! 이 서비스는 조회/저장과 권한 확인(작성자 또는 관리자)을 담당합니다.
//!
//! 참여/탈퇴는 저장소의 조건부 갱신으로 반영됩니다. 조건이 맞지 않아 갱신되지 않으면
//! 최신 문서를 다시 읽어 엔티티 규칙 순서대로 원인을 돌려줍니다.
//!
//! ```text
//! RECRUITING ──start──► IN_PROGRESS ──complete──► COMPLETED
//!     ▲                      │                        │
//!     └──────────reopen──────┴────────────────────────┘
//! ```

use std::any::Any;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use once_cell::sync::OnceCell;

use crate::{
    core::{errors::AppError, registry::ServiceRegistration},
    domain::{
        dto::challenges::{ChallengeRequest, ParticipantResponse},
        entities::challenges::{Challenge, ChallengeStatus},
        models::auth::AuthenticatedUser,
    },
    repositories::{challenges::ChallengeRepository, users::UserRepository},
};

pub const CHALLENGE_NOT_FOUND: &str = "챌린지를 찾을 수 없습니다.";
pub const CHALLENGE_CHANGED: &str = "챌린지가 다른 요청에 의해 변경되었습니다. 다시 시도해 주세요.";

static CHALLENGE_SERVICE_INSTANCE: OnceCell<Arc<ChallengeService>> = OnceCell::new();

pub struct ChallengeService {
    challenge_repo: Arc<ChallengeRepository>,

    user_repo: Arc<UserRepository>,
}

impl ChallengeService {
    fn new() -> Self {
        Self {
            challenge_repo: ChallengeRepository::instance(),
            user_repo: UserRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        CHALLENGE_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub async fn create(&self, author_id: &str, request: ChallengeRequest) -> Result<Challenge, AppError> {
        let challenge = Challenge::new(author_id.to_string(), request.into())?;
        let challenge = self.challenge_repo.create(challenge).await?;

        log::info!("챌린지 생성: {} (author={})", challenge.title, author_id);
        Ok(challenge)
    }

    /// # Errors
    ///
    /// * `AppError::NotFound("챌린지를 찾을 수 없습니다.")`
    pub async fn get(&self, id: &str) -> Result<Challenge, AppError> {
        self.challenge_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(CHALLENGE_NOT_FOUND.to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Challenge>, AppError> {
        self.challenge_repo.find_by_id(id).await
    }

    /// 최신순. 상태 필터가 작성자 필터보다 우선합니다.
    pub async fn list(
        &self,
        status: Option<ChallengeStatus>,
        author_id: Option<&str>,
    ) -> Result<Vec<Challenge>, AppError> {
        match (status, author_id) {
            (Some(status), _) => self.challenge_repo.find_by_status(status).await,
            (None, Some(author_id)) => self.challenge_repo.find_by_author(author_id).await,
            (None, None) => self.challenge_repo.find_all().await,
        }
    }

    pub async fn update(
        &self,
        id: &str,
        user: &AuthenticatedUser,
        request: ChallengeRequest,
    ) -> Result<Challenge, AppError> {
        let mut challenge = self.get(id).await?;
        challenge.ensure_manageable(&user.user_id, user.is_admin())?;

        let expected_status = challenge.status;
        challenge.update_details(request.into())?;
        self.save_details(&challenge, expected_status).await?;

        Ok(challenge)
    }

    async fn save_details(&self, challenge: &Challenge, expected_status: ChallengeStatus) -> Result<(), AppError> {
        if !self.challenge_repo.save_details(challenge, expected_status).await? {
            return Err(AppError::ConflictError(CHALLENGE_CHANGED.to_string()));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// * `AppError::NotFound` - 챌린지 없음
    /// * `AppError::ValidationError` - 참여 규칙 위반 (엔티티 검사 순서)
    /// * `AppError::ConflictError` - 규칙은 만족하지만 동시 변경으로 반영되지 않음
    pub async fn participate(&self, id: &str, user_id: &str) -> Result<Challenge, AppError> {
        let today = Self::today();
        let mut snapshot = self.get(id).await?;
        snapshot.add_participant(user_id, today)?;

        match self.challenge_repo.add_participant(id, user_id, today).await? {
            Some(challenge) => {
                log::info!("챌린지 참여: {} ← {}", challenge.title, user_id);
                Ok(challenge)
            }
            None => {
                let latest = self.challenge_repo.find_by_id(id).await?;
                Err(join_rejection(latest, user_id, today))
            }
        }
    }

    pub async fn leave(&self, id: &str, user_id: &str) -> Result<Challenge, AppError> {
        let mut snapshot = self.get(id).await?;
        snapshot.remove_participant(user_id)?;

        match self.challenge_repo.remove_participant(id, user_id).await? {
            Some(challenge) => Ok(challenge),
            None => {
                let latest = self.challenge_repo.find_by_id(id).await?;
                Err(leave_rejection(latest, user_id))
            }
        }
    }

    pub async fn is_participant(&self, id: &str, user_id: &str) -> Result<bool, AppError> {
        Ok(self.get(id).await?.is_participant(user_id))
    }

    pub async fn start(&self, id: &str, user: &AuthenticatedUser) -> Result<Challenge, AppError> {
        self.transition(id, user, Challenge::start).await
    }

    pub async fn complete(&self, id: &str, user: &AuthenticatedUser) -> Result<Challenge, AppError> {
        self.transition(id, user, Challenge::complete).await
    }

    pub async fn reopen(&self, id: &str, user: &AuthenticatedUser) -> Result<Challenge, AppError> {
        self.transition(id, user, Challenge::reopen).await
    }

    async fn transition<F>(&self, id: &str, user: &AuthenticatedUser, apply: F) -> Result<Challenge, AppError>
    where
        F: FnOnce(&mut Challenge) -> Result<(), AppError>,
    {
        let mut challenge = self.get(id).await?;
        challenge.ensure_manageable(&user.user_id, user.is_admin())?;

        let expected_status = challenge.status;
        apply(&mut challenge)?;
        self.save_details(&challenge, expected_status).await?;

        log::info!("챌린지 상태 변경: {} → {}", challenge.title, challenge.status);
        Ok(challenge)
    }

    pub async fn delete(&self, id: &str, user: &AuthenticatedUser) -> Result<(), AppError> {
        let challenge = self.get(id).await?;
        challenge.ensure_manageable(&user.user_id, user.is_admin())?;

        if !self.challenge_repo.delete(id).await? {
            return Err(AppError::NotFound(CHALLENGE_NOT_FOUND.to_string()));
        }

        log::warn!("챌린지 삭제: {} (by {})", challenge.title, user.email);
        Ok(())
    }

    /// 탈퇴 등으로 사라진 사용자는 결과에서 빠집니다.
    pub async fn participants(&self, challenge: &Challenge) -> Result<Vec<ParticipantResponse>, AppError> {
        let users = self.user_repo.find_by_ids(&challenge.participant_ids).await?;
        Ok(users.iter().map(ParticipantResponse::from).collect())
    }
}

/// 조건부 참여가 거절된 이유를 최신 문서로 판정합니다.
pub(crate) fn join_rejection(latest: Option<Challenge>, user_id: &str, today: NaiveDate) -> AppError {
    match latest {
        None => AppError::NotFound(CHALLENGE_NOT_FOUND.to_string()),
        Some(mut challenge) => match challenge.add_participant(user_id, today) {
            Err(e) => e,
            Ok(()) => AppError::ConflictError(CHALLENGE_CHANGED.to_string()),
        },
    }
}

pub(crate) fn leave_rejection(latest: Option<Challenge>, user_id: &str) -> AppError {
    match latest {
        None => AppError::NotFound(CHALLENGE_NOT_FOUND.to_string()),
        Some(mut challenge) => match challenge.remove_participant(user_id) {
            Err(e) => e,
            Ok(()) => AppError::ConflictError(CHALLENGE_CHANGED.to_string()),
        },
    }
}

fn challenge_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(ChallengeService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "challenge_service",
        constructor: challenge_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::challenges::ChallengeDetails;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn challenge(participants: &[&str]) -> Challenge {
        let details = ChallengeDetails {
            title: "주간 러닝".to_string(),
            description: None,
            tags: vec![],
            reward_amount: None,
            reward_type: None,
            start_date: date(2025, 1, 1),
            end_date: date(2025, 1, 31),
        };
        let mut challenge = Challenge::new("author".to_string(), details).unwrap();
        challenge.participant_ids = participants.iter().map(|p| p.to_string()).collect();
        challenge
    }

    fn message(error: AppError) -> String {
        match error {
            AppError::ValidationError(msg) | AppError::ConflictError(msg) | AppError::NotFound(msg) => msg,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_join_reports_already_joined() {
        // 같은 사용자의 동시 요청 중 하나가 먼저 반영된 상태
        let latest = challenge(&["u1"]);
        let error = join_rejection(Some(latest), "u1", date(2025, 1, 10));
        assert_eq!(message(error), "이미 참여한 챌린지입니다.");
    }

    #[test]
    fn test_join_rejected_after_concurrent_start() {
        let mut latest = challenge(&[]);
        latest.start().unwrap();

        let error = join_rejection(Some(latest), "u1", date(2025, 1, 10));
        assert_eq!(message(error), "챌린지 모집 상태가 아닙니다.");
    }

    #[test]
    fn test_join_rejected_for_deleted_challenge() {
        let error = join_rejection(None, "u1", date(2025, 1, 10));
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[test]
    fn test_join_rejection_without_rule_violation_is_conflict() {
        let error = join_rejection(Some(challenge(&[])), "u1", date(2025, 1, 10));
        assert!(matches!(error, AppError::ConflictError(_)));
    }

    #[test]
    fn test_leave_rejection_after_concurrent_leave() {
        let error = leave_rejection(Some(challenge(&["u2"])), "u1");
        assert_eq!(message(error), "참여하지 않은 챌린지입니다.");

        let error = leave_rejection(Some(challenge(&["u1"])), "u1");
        assert!(matches!(error, AppError::ConflictError(_)));
    }
}
