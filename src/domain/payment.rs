use crate::domain::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a payment applies to the student's obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    OneTime,
    Installment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

/// A payment attempt as recorded by the storage collaborator.
///
/// The reconciler only ever reads these. Records with any status other than
/// `Success` are inert for plan-state purposes; they stay visible for audit
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique external reference handed to the gateway.
    pub order_id: String,
    pub student_id: String,
    pub amount: Money,
    pub payment_type: PaymentType,
    /// 1-based; present only for installment payments.
    pub installment_number: Option<u8>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn is_success(&self) -> bool {
        self.status == PaymentStatus::Success
    }
}

/// Generates a unique external order reference in the gateway's expected
/// shape: a millisecond timestamp plus a random suffix.
pub fn generate_order_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::random();
    format!("order_{millis}_{suffix:08x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_record_csv_round_trip() {
        let csv = "order_id,student_id,amount,payment_type,installment_number,status,created_at\n\
                   order_1,stu_9,25333,installment,1,success,2026-01-05T10:00:00Z";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let record: PaymentRecord = reader
            .deserialize()
            .next()
            .unwrap()
            .expect("failed to deserialize payment record");

        assert_eq!(record.order_id, "order_1");
        assert_eq!(record.student_id, "stu_9");
        assert_eq!(record.amount, Money::new(25_333));
        assert_eq!(record.payment_type, PaymentType::Installment);
        assert_eq!(record.installment_number, Some(1));
        assert!(record.is_success());
    }

    #[test]
    fn test_onetime_record_has_no_installment_number() {
        let csv = "order_id,student_id,amount,payment_type,installment_number,status,created_at\n\
                   order_2,stu_9,70000,onetime,,pending,2026-01-05T10:00:00Z";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let record: PaymentRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(record.payment_type, PaymentType::OneTime);
        assert_eq!(record.installment_number, None);
        assert_eq!(record.status, PaymentStatus::Pending);
        assert!(!record.is_success());
    }

    #[test]
    fn test_order_ids_are_unique() {
        let a = generate_order_id();
        let b = generate_order_id();
        assert!(a.starts_with("order_"));
        assert_ne!(a, b);
    }
}
