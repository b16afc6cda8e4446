//! 챌린지 핸들러
//!
//! 모든 엔드포인트는 인증이 필요합니다. 수정/상태 변경/삭제는 작성자 또는 관리자만 가능합니다.
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `POST` | `/api/challenges` | 챌린지 생성 |
//! | `GET` | `/api/challenges?status=&authorId=` | 챌린지 목록 |
//! | `GET` | `/api/challenges/{id}` | 챌린지 조회 |
//! | `PUT` | `/api/challenges/{id}` | 챌린지 수정 |
//! | `DELETE` | `/api/challenges/{id}` | 챌린지 삭제 |
//! | `POST` | `/api/challenges/{id}/participate` | 참여 |
//! | `DELETE` | `/api/challenges/{id}/participate` | 참여 취소 |
//! | `GET` | `/api/challenges/{id}/participation-status` | 참여 여부 |
//! | `GET` | `/api/challenges/{id}/participants` | 참가자 목록 |
//! | `GET` | `/api/challenges/{id}/reward-info` | 포상 정보 |
//! | `GET` | `/api/challenges/{id}/reward-histories` | 포상 지급 이력 |
//! | `PATCH` | `/api/challenges/{id}/start` | 시작 |
//! | `PATCH` | `/api/challenges/{id}/complete` | 완료 |
//! | `PATCH` | `/api/challenges/{id}/reopen` | 재모집 |
//! | `POST` | `/api/challenges/{id}/rewards` | 포상 지급 |
//! | `GET` | `/api/challenges/{id}/rewards` | 챌린지 포상 목록 |
//! | `GET` | `/api/challenges/{id}/rewards/{rewardId}` | 포상 조회 |
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    core::errors::AppError,
    domain::{
        dto::{
            challenges::{ChallengeListQuery, ChallengeRequest, ChallengeResponse, CreateChallengeRewardRequest},
            common::now_timestamp,
        },
        entities::challenges::{Challenge, ChallengeStatus},
        models::auth::AuthenticatedUser,
    },
    services::{
        challenges::{ChallengeRewardService, ChallengeService},
        rewards::RewardService,
    },
};

/// `{success, message, challenge, timestamp}` 응답
fn challenge_message(message: &str, challenge: Challenge) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "challenge": ChallengeResponse::from(challenge),
        "timestamp": now_timestamp(),
    }))
}

#[post("")]
pub async fn create_challenge(
    user: AuthenticatedUser,
    payload: web::Json<ChallengeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let challenge = ChallengeService::instance()
        .create(&user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Challenge created successfully",
        "challenge": ChallengeResponse::from(challenge),
        "timestamp": now_timestamp(),
    })))
}

/// 챌린지 목록
///
/// 잘못된 `status`는 400 "Invalid status: X"입니다.
#[get("")]
pub async fn list_challenges(query: web::Query<ChallengeListQuery>) -> Result<HttpResponse, AppError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<ChallengeStatus>)
        .transpose()?;

    let challenges: Vec<ChallengeResponse> = ChallengeService::instance()
        .list(status, query.author_id.as_deref())
        .await?
        .into_iter()
        .map(ChallengeResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": challenges.len(),
        "challenges": challenges,
        "timestamp": now_timestamp(),
    })))
}

#[get("/{challenge_id}")]
pub async fn get_challenge(challenge_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let challenge = ChallengeService::instance().get(&challenge_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "challenge": ChallengeResponse::from(challenge),
        "timestamp": now_timestamp(),
    })))
}

#[put("/{challenge_id}")]
pub async fn update_challenge(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<ChallengeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let challenge = ChallengeService::instance()
        .update(&challenge_id, &user, payload.into_inner())
        .await?;

    Ok(challenge_message("챌린지가 수정되었습니다.", challenge))
}

#[delete("/{challenge_id}")]
pub async fn delete_challenge(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    ChallengeService::instance().delete(&challenge_id, &user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "챌린지가 삭제되었습니다.",
        "timestamp": now_timestamp(),
    })))
}

#[post("/{challenge_id}/participate")]
pub async fn participate(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let challenge = ChallengeService::instance()
        .participate(&challenge_id, &user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Successfully joined the challenge",
        "participantCount": challenge.participant_count(),
        "challenge": ChallengeResponse::from(challenge),
        "timestamp": now_timestamp(),
    })))
}

#[delete("/{challenge_id}/participate")]
pub async fn leave(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let challenge = ChallengeService::instance()
        .leave(&challenge_id, &user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Successfully left the challenge",
        "participantCount": challenge.participant_count(),
        "challenge": ChallengeResponse::from(challenge),
        "timestamp": now_timestamp(),
    })))
}

#[get("/{challenge_id}/participation-status")]
pub async fn participation_status(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let is_participant = ChallengeService::instance()
        .is_participant(&challenge_id, &user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "isParticipant": is_participant,
        "userId": user.user_id,
        "challengeId": challenge_id.into_inner(),
        "timestamp": now_timestamp(),
    })))
}

#[get("/{challenge_id}/participants")]
pub async fn participants(challenge_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = ChallengeService::instance();
    let challenge = service.get(&challenge_id).await?;
    let participants = service.participants(&challenge).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": participants.len(),
        "participants": participants,
        "timestamp": now_timestamp(),
    })))
}

#[get("/{challenge_id}/reward-info")]
pub async fn reward_info(challenge_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let challenge = ChallengeService::instance().get(&challenge_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "participantCount": challenge.participant_count(),
        "challenge": ChallengeResponse::from(challenge),
        "timestamp": now_timestamp(),
    })))
}

#[get("/{challenge_id}/reward-histories")]
pub async fn reward_histories(challenge_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let reward_service = RewardService::instance();
    let rewarded_participant_ids = reward_service.rewarded_participant_ids(&challenge_id).await?;
    let rewarded_count = reward_service.rewarded_count(&challenge_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "challengeId": challenge_id.into_inner(),
        "rewardedParticipantIds": rewarded_participant_ids,
        "rewardedCount": rewarded_count,
        "timestamp": now_timestamp(),
    })))
}

#[patch("/{challenge_id}/start")]
pub async fn start_challenge(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let challenge = ChallengeService::instance().start(&challenge_id, &user).await?;
    Ok(challenge_message("챌린지가 시작되었습니다.", challenge))
}

#[patch("/{challenge_id}/complete")]
pub async fn complete_challenge(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let challenge = ChallengeService::instance().complete(&challenge_id, &user).await?;
    Ok(challenge_message("챌린지가 완료되었습니다.", challenge))
}

#[patch("/{challenge_id}/reopen")]
pub async fn reopen_challenge(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let challenge = ChallengeService::instance().reopen(&challenge_id, &user).await?;
    Ok(challenge_message("챌린지가 다시 열렸습니다.", challenge))
}

/// 포상 지급
#[post("/{challenge_id}/rewards")]
pub async fn create_reward(
    challenge_id: web::Path<String>,
    user: AuthenticatedUser,
    payload: web::Json<CreateChallengeRewardRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let reward = ChallengeRewardService::instance()
        .create_reward(&challenge_id, payload.into_inner(), &user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "포상이 성공적으로 지급되었습니다.",
        "reward": reward,
        "timestamp": now_timestamp(),
    })))
}

#[get("/{challenge_id}/rewards")]
pub async fn list_rewards(challenge_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let rewards = ChallengeRewardService::instance()
        .rewards_by_challenge(&challenge_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": rewards.len(),
        "rewards": rewards,
        "timestamp": now_timestamp(),
    })))
}

#[get("/{challenge_id}/rewards/{reward_id}")]
pub async fn get_reward(path: web::Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (challenge_id, reward_id) = path.into_inner();

    let reward = ChallengeRewardService::instance()
        .reward_by_id(&reward_id)
        .await?
        .filter(|reward| reward.challenge_id == challenge_id)
        .ok_or_else(|| AppError::NotFound("포상 내역을 찾을 수 없습니다.".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "reward": reward,
        "timestamp": now_timestamp(),
    })))
}
