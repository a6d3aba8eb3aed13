use chrono::{DateTime, Duration, TimeZone, Utc};
use feeplan::domain::money::Money;
use feeplan::domain::payment::{PaymentRecord, PaymentStatus, PaymentType};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap()
}

pub fn success_installment(
    order: &str,
    student: &str,
    amount: i64,
    n: u8,
    minutes: i64,
) -> PaymentRecord {
    PaymentRecord {
        order_id: order.to_string(),
        student_id: student.to_string(),
        amount: Money::new(amount),
        payment_type: PaymentType::Installment,
        installment_number: Some(n),
        status: PaymentStatus::Success,
        created_at: base_time() + Duration::minutes(minutes),
    }
}

pub fn success_onetime(order: &str, student: &str, amount: i64) -> PaymentRecord {
    PaymentRecord {
        order_id: order.to_string(),
        student_id: student.to_string(),
        amount: Money::new(amount),
        payment_type: PaymentType::OneTime,
        installment_number: None,
        status: PaymentStatus::Success,
        created_at: base_time(),
    }
}
