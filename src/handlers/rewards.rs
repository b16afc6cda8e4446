//! 포상/결제 이력 핸들러
//!
//! | 메서드 | 경로 | 인증 | 설명 |
//! |--------|------|------|------|
//! | `GET` | `/api/rewards/my` | 필요 | 내 포상 내역 |
//! | `GET` | `/api/rewards/statistics` | 필요 | 포상 통계 |
//! | `POST` | `/api/reward-histories` | - | 포상 이력 저장 |
//! | `GET` | `/api/reward-histories/challenges/{id}` | - | 챌린지 포상 이력 |
//! | `POST` | `/api/payment-histories` | - | 결제 이력 저장 |
//! | `GET` | `/api/payment-histories/{paymentId}` | - | 결제 이력 조회 |
//!
//! 이력 저장 요청 본문은 임의의 JSON 객체이며, 숫자와 숫자 문자열을 모두 받습니다.
use actix_web::{get, post, web, HttpResponse};
use serde_json::{json, Map, Value};

use crate::{
    core::errors::AppError,
    domain::{
        dto::{common::now_timestamp, rewards::RewardHistoryResponse},
        models::auth::AuthenticatedUser,
    },
    services::{
        challenges::ChallengeRewardService,
        payments::PaymentHistoryService,
        rewards::RewardHistoryService,
    },
};

#[get("/my")]
pub async fn my_rewards(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let rewards = ChallengeRewardService::instance()
        .rewards_by_participant(&user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": rewards.len(),
        "rewards": rewards,
        "timestamp": now_timestamp(),
    })))
}

#[get("/statistics")]
pub async fn reward_statistics() -> Result<HttpResponse, AppError> {
    let statistics = ChallengeRewardService::instance().statistics().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "statistics": statistics,
        "timestamp": now_timestamp(),
    })))
}

#[post("")]
pub async fn save_reward_history(payload: web::Json<Map<String, Value>>) -> Result<HttpResponse, AppError> {
    let history = RewardHistoryService::instance()
        .save_reward_history(&payload)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Reward history saved successfully",
        "challengeId": history.challenge_id,
        "participantId": history.participant_id,
        "rewardAmount": history.reward_amount,
        "rewardType": history.reward_type,
        "timestamp": now_timestamp(),
    })))
}

#[get("/challenges/{challenge_id}")]
pub async fn challenge_reward_histories(challenge_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let histories: Vec<RewardHistoryResponse> = RewardHistoryService::instance()
        .reward_history(&challenge_id)
        .await?
        .into_iter()
        .map(RewardHistoryResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "challengeId": challenge_id.into_inner(),
        "count": histories.len(),
        "histories": histories,
        "timestamp": now_timestamp(),
    })))
}

#[post("")]
pub async fn save_payment_history(payload: web::Json<Map<String, Value>>) -> Result<HttpResponse, AppError> {
    let payment = PaymentHistoryService::instance()
        .save_payment_history(&payload)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Payment history saved successfully",
        "paymentId": payment.payment_id,
        "transactionType": payment.transaction_type,
        "txId": payment.tx_id,
        "status": payment.status,
        "timestamp": now_timestamp(),
    })))
}

#[get("/{payment_id}")]
pub async fn get_payment_history(payment_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let payment = PaymentHistoryService::instance()
        .find_by_payment_id(&payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("결제 이력을 찾을 수 없습니다: {}", payment_id)))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "paymentId": payment.payment_id,
        "transactionType": payment.transaction_type,
        "txId": payment.tx_id,
        "amount": payment.amount,
        "currency": payment.currency,
        "status": payment.status,
        "challengeId": payment.challenge_id,
        "participantId": payment.participant_id,
        "timestamp": now_timestamp(),
    })))
}
