use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::domain::ports::{PaymentStore, PaymentStoreBox};
use crate::error::Result;
use async_trait::async_trait;
use tracing::warn;

/// Two-tier read policy over a primary store and a same-shape cache.
///
/// Reads hit the primary first and fall back to the cache when the primary
/// fails; writes go to the primary and are mirrored into the cache on a
/// best-effort basis. This puts the "remote store or local copy" policy in
/// one place instead of scattering the conditional through callers.
pub struct TieredPaymentStore {
    primary: PaymentStoreBox,
    cache: PaymentStoreBox,
}

impl TieredPaymentStore {
    pub fn new(primary: PaymentStoreBox, cache: PaymentStoreBox) -> Self {
        Self { primary, cache }
    }
}

#[async_trait]
impl PaymentStore for TieredPaymentStore {
    async fn record(&self, payment: PaymentRecord) -> Result<()> {
        self.primary.record(payment.clone()).await?;
        if let Err(e) = self.cache.record(payment).await {
            warn!(error = %e, "failed to mirror payment into cache");
        }
        Ok(())
    }

    async fn update_status(&self, order_id: &str, status: PaymentStatus) -> Result<()> {
        self.primary.update_status(order_id, status).await?;
        if let Err(e) = self.cache.update_status(order_id, status).await {
            warn!(error = %e, order_id, "failed to mirror status update into cache");
        }
        Ok(())
    }

    async fn payments_for(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        match self.primary.payments_for(student_id).await {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(error = %e, student_id, "primary store read failed, serving from cache");
                self.cache.payments_for(student_id).await
            }
        }
    }

    async fn student_ids(&self) -> Result<Vec<String>> {
        match self.primary.student_ids().await {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!(error = %e, "primary store read failed, serving from cache");
                self.cache.student_ids().await
            }
        }
    }
}
