use crate::domain::money::Money;
use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Read/write access to the payment records owned by the storage
/// collaborator. Uniqueness of `(student, type, installment)` among
/// successful records is this collaborator's responsibility, not the
/// core's.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn record(&self, payment: PaymentRecord) -> Result<()>;
    async fn update_status(&self, order_id: &str, status: PaymentStatus) -> Result<()>;
    /// All records for one student, in no particular order.
    async fn payments_for(&self, student_id: &str) -> Result<Vec<PaymentRecord>>;
    /// Every student with at least one record.
    async fn student_ids(&self) -> Result<Vec<String>>;
}

/// Read access to the raw fee strings of a student's selected courses.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn course_fees(&self, student_id: &str) -> Result<Vec<String>>;
}

/// An order handed to the gateway for checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub order_id: String,
    pub student_id: String,
    pub amount: Money,
}

/// Handle to a hosted checkout session created by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHandle {
    pub order_id: String,
    pub session_id: String,
}

/// Outcome of a single verification call for an order.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayVerification {
    pub status: PaymentStatus,
    pub amount: Money,
    pub method: Option<String>,
}

/// The external payment gateway, reduced to the two calls the portal makes.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_session(&self, order: OrderRequest) -> Result<SessionHandle>;
    async fn verify_payment(&self, order_id: &str) -> Result<GatewayVerification>;
}

pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type CourseCatalogBox = Box<dyn CourseCatalog>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
