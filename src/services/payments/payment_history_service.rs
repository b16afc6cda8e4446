//! 결제 이력 수신 서비스
//!
//! 외부 결제 시스템의 결과를 받아 그대로 보관합니다. 원본 요청은
//! `raw_data`에 JSON 문자열로 남깁니다.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};

use crate::{
    core::{
        errors::{AppError, ErrorContext},
        registry::ServiceRegistration,
    },
    domain::entities::payments::PaymentHistory,
    repositories::payments::PaymentHistoryRepository,
    utils::value_utils::{extract_f64, extract_id, extract_string},
};

const MISSING_FIELDS_MESSAGE: &str = "Required fields are missing: paymentId, transactionType, txId";

static PAYMENT_HISTORY_SERVICE_INSTANCE: OnceCell<Arc<PaymentHistoryService>> = OnceCell::new();

pub struct PaymentHistoryService {
    payment_history_repo: Arc<PaymentHistoryRepository>,
}

impl PaymentHistoryService {
    fn new() -> Self {
        Self {
            payment_history_repo: PaymentHistoryRepository::instance(),
        }
    }

    pub fn instance() -> Arc<Self> {
        PAYMENT_HISTORY_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    /// # Errors
    ///
    /// * `AppError::ValidationError` - paymentId/transactionType/txId 누락
    /// * `AppError::ConflictError` - 이미 저장된 paymentId
    pub async fn save_payment_history(&self, data: &Map<String, Value>) -> Result<PaymentHistory, AppError> {
        let payment = build_payment_history(data)?;
        let saved = self.payment_history_repo.create(payment).await?;

        log::info!(
            "결제 이력 저장: {} ({}, tx={})",
            saved.payment_id,
            saved.transaction_type,
            saved.tx_id
        );
        Ok(saved)
    }

    pub async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<PaymentHistory>, AppError> {
        self.payment_history_repo.find_by_payment_id(payment_id).await
    }
}

/// 선택 필드는 해석할 수 없으면 비워 둡니다.
pub fn build_payment_history(data: &Map<String, Value>) -> Result<PaymentHistory, AppError> {
    let payment_id = extract_id(data, "paymentId");
    let transaction_type = extract_string(data, "transactionType");
    let tx_id = extract_id(data, "txId");

    let (Some(payment_id), Some(transaction_type), Some(tx_id)) = (payment_id, transaction_type, tx_id) else {
        return Err(AppError::ValidationError(MISSING_FIELDS_MESSAGE.to_string()));
    };

    let raw_data = serde_json::to_string(data).context("결제 원본 직렬화 실패")?;

    let mut payment = PaymentHistory::new(payment_id, transaction_type, tx_id);
    payment.update_additional_info(
        extract_f64(data, "amount"),
        extract_id(data, "challengeId"),
        extract_id(data, "participantId"),
        raw_data,
    );

    Ok(payment)
}

fn payment_history_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(PaymentHistoryService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "payment_history_service",
        constructor: payment_history_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::payments::PaymentStatus;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_build_payment_history() {
        let data = map(json!({
            "paymentId": "pay_123",
            "transactionType": "PAYMENT",
            "txId": "tx_9",
            "amount": "15000",
            "challengeId": 7,
            "participantId": "not-parsed-as-number-but-kept",
        }));

        let payment = build_payment_history(&data).unwrap();
        assert_eq!(payment.payment_id, "pay_123");
        assert_eq!(payment.amount, Some(15000.0));
        assert_eq!(payment.challenge_id.as_deref(), Some("7"));
        assert_eq!(payment.currency, "KRW");
        assert_eq!(payment.status, PaymentStatus::Paid);

        let raw: Value = serde_json::from_str(&payment.raw_data).unwrap();
        assert_eq!(raw["txId"], "tx_9");
    }

    #[test]
    fn test_unparseable_optionals_are_dropped() {
        let data = map(json!({
            "paymentId": "pay_1",
            "transactionType": "PAYMENT",
            "txId": "tx_1",
            "amount": "abc",
            "challengeId": null,
        }));

        let payment = build_payment_history(&data).unwrap();
        assert!(payment.amount.is_none());
        assert!(payment.challenge_id.is_none());
        assert!(payment.participant_id.is_none());
    }

    #[test]
    fn test_required_fields() {
        let data = map(json!({ "paymentId": "pay_1", "txId": "tx_1" }));

        match build_payment_history(&data) {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, MISSING_FIELDS_MESSAGE),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }
}
