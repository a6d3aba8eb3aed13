use crate::domain::payment::PaymentStatus;
use crate::domain::ports::{GatewayVerification, OrderRequest, PaymentGateway, SessionHandle};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A stand-in for the hosted payment gateway.
///
/// Creates checkout sessions in memory and reports an order with whatever
/// status [`SandboxGateway::settle`] last assigned it, which is how tests
/// and the CLI simulate a student completing (or abandoning) checkout.
#[derive(Default, Clone)]
pub struct SandboxGateway {
    orders: Arc<RwLock<HashMap<String, (OrderRequest, PaymentStatus)>>>,
}

impl SandboxGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an order as settled with the given status.
    pub async fn settle(&self, order_id: &str, status: PaymentStatus) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(order_id) {
            Some(entry) => {
                entry.1 = status;
                Ok(())
            }
            None => Err(PaymentError::Gateway(format!("unknown order: {order_id}"))),
        }
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn create_payment_session(&self, order: OrderRequest) -> Result<SessionHandle> {
        let session = SessionHandle {
            order_id: order.order_id.clone(),
            session_id: format!("session_{}", order.order_id),
        };
        let mut orders = self.orders.write().await;
        orders.insert(order.order_id.clone(), (order, PaymentStatus::Pending));
        Ok(session)
    }

    async fn verify_payment(&self, order_id: &str) -> Result<GatewayVerification> {
        let orders = self.orders.read().await;
        let (order, status) = orders
            .get(order_id)
            .ok_or_else(|| PaymentError::Gateway(format!("unknown order: {order_id}")))?;
        Ok(GatewayVerification {
            status: *status,
            amount: order.amount,
            method: Some("sandbox".to_string()),
        })
    }
}
