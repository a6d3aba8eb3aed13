use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::domain::ports::{CourseCatalog, PaymentStore};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory payment store, keyed by student.
///
/// `Clone` shares the underlying map, so a cloned handle can observe what a
/// `PaymentDesk` wrote through its boxed copy.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<String, Vec<PaymentRecord>>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn record(&self, payment: PaymentRecord) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments
            .entry(payment.student_id.clone())
            .or_default()
            .push(payment);
        Ok(())
    }

    async fn update_status(&self, order_id: &str, status: PaymentStatus) -> Result<()> {
        let mut payments = self.payments.write().await;
        for records in payments.values_mut() {
            if let Some(record) = records.iter_mut().find(|r| r.order_id == order_id) {
                record.status = status;
                return Ok(());
            }
        }
        Err(PaymentError::Validation(format!(
            "unknown order id: {order_id}"
        )))
    }

    async fn payments_for(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.get(student_id).cloned().unwrap_or_default())
    }

    async fn student_ids(&self) -> Result<Vec<String>> {
        let payments = self.payments.read().await;
        let mut ids: Vec<String> = payments.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// An in-memory course catalog with optional per-student overrides.
///
/// The CLI seeds the default fee list from its `--fee` arguments; tests seed
/// per-student entries directly.
#[derive(Default, Clone)]
pub struct InMemoryCourseCatalog {
    default_fees: Vec<String>,
    by_student: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl InMemoryCourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_fees(fees: Vec<String>) -> Self {
        Self {
            default_fees: fees,
            ..Self::default()
        }
    }

    pub async fn set_fees(&self, student_id: &str, fees: Vec<String>) {
        let mut by_student = self.by_student.write().await;
        by_student.insert(student_id.to_string(), fees);
    }
}

#[async_trait]
impl CourseCatalog for InMemoryCourseCatalog {
    async fn course_fees(&self, student_id: &str) -> Result<Vec<String>> {
        let by_student = self.by_student.read().await;
        Ok(by_student
            .get(student_id)
            .cloned()
            .unwrap_or_else(|| self.default_fees.clone()))
    }
}
