//! 결제 이력 엔티티
//!
//! 결제 웹훅으로 받은 원본 요청을 `raw_data`에 그대로 보관합니다.

use std::fmt;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "KRW";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Cancelled,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Cancelled => "CANCELLED",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistory {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 결제 대행사 결제 ID (unique)
    pub payment_id: String,
    pub transaction_type: String,
    pub tx_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    /// 요청 본문 전체 (JSON 문자열)
    #[serde(default)]
    pub raw_data: String,
    pub created_at: DateTime,
}

impl PaymentHistory {
    /// 통화는 KRW, 상태는 PAID로 시작합니다.
    pub fn new(payment_id: String, transaction_type: String, tx_id: String) -> Self {
        Self {
            id: None,
            payment_id,
            transaction_type,
            tx_id,
            amount: None,
            currency: DEFAULT_CURRENCY.to_string(),
            status: PaymentStatus::Paid,
            challenge_id: None,
            participant_id: None,
            raw_data: "{}".to_string(),
            created_at: DateTime::now(),
        }
    }

    pub fn update_additional_info(
        &mut self,
        amount: Option<f64>,
        challenge_id: Option<String>,
        participant_id: Option<String>,
        raw_data: String,
    ) {
        self.amount = amount;
        self.challenge_id = challenge_id;
        self.participant_id = participant_id;
        self.raw_data = raw_data;
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let payment = PaymentHistory::new("pay_1".to_string(), "PAYMENT".to_string(), "tx_1".to_string());
        assert_eq!(payment.currency, "KRW");
        assert!(payment.is_paid());
        assert!(payment.amount.is_none());
        assert_eq!(payment.status.to_string(), "PAID");
    }

    #[test]
    fn test_update_additional_info() {
        let mut payment = PaymentHistory::new("pay_1".to_string(), "PAYMENT".to_string(), "tx_1".to_string());
        payment.update_additional_info(Some(1500.5), Some("c1".to_string()), None, r#"{"a":1}"#.to_string());

        assert_eq!(payment.amount, Some(1500.5));
        assert_eq!(payment.challenge_id.as_deref(), Some("c1"));
        assert!(payment.participant_id.is_none());
        assert_eq!(payment.raw_data, r#"{"a":1}"#);
    }
}
