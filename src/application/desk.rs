use crate::domain::money::Money;
use crate::domain::payment::{PaymentRecord, PaymentStatus, PaymentType, generate_order_id};
use crate::domain::ports::{
    CourseCatalog, CourseCatalogBox, OrderRequest, PaymentGateway, PaymentGatewayBox,
    PaymentStore, PaymentStoreBox, SessionHandle,
};
use crate::domain::pricing::{PlanChoice, PricingPlan, calculate_pricing, minimum_fee};
use crate::domain::reconcile::{self, ObligationState};
use crate::error::{PaymentError, Result};
use chrono::Utc;
use tracing::{info, warn};

/// Orchestrates fee pricing, obligation projection, and payment initiation.
///
/// Owns the storage and gateway collaborators behind their ports. Every
/// decision about what a student owes or may pay is delegated to the pure
/// functions in [`crate::domain::reconcile`], re-derived from a fresh read
/// of the record list on every call rather than cached.
pub struct PaymentDesk {
    payments: PaymentStoreBox,
    catalog: CourseCatalogBox,
    gateway: PaymentGatewayBox,
}

impl PaymentDesk {
    pub fn new(
        payments: PaymentStoreBox,
        catalog: CourseCatalogBox,
        gateway: PaymentGatewayBox,
    ) -> Self {
        Self {
            payments,
            catalog,
            gateway,
        }
    }

    /// Every student known to the payment store.
    pub async fn student_ids(&self) -> Result<Vec<String>> {
        self.payments.student_ids().await
    }

    /// Derives the pricing plan for a student from their selected courses.
    /// When several courses are selected the cheapest one sets the base fee.
    pub async fn pricing_for(&self, student_id: &str) -> Result<PricingPlan> {
        let fees = self.catalog.course_fees(student_id).await?;
        let base_fee = minimum_fee(&fees).ok_or_else(|| {
            PaymentError::Validation(format!("student {student_id} has no selected courses"))
        })?;
        if base_fee == Money::ZERO {
            warn!(
                student_id,
                ?fees,
                "base fee parsed to zero; fee data needs operator review"
            );
        }
        Ok(calculate_pricing(base_fee))
    }

    /// Recomputes the obligation state from the current record list.
    pub async fn obligation(&self, student_id: &str) -> Result<(PricingPlan, ObligationState)> {
        let plan = self.pricing_for(student_id).await?;
        let records = self.payments.payments_for(student_id).await?;
        let state = ObligationState::project(&plan, &records);
        Ok((plan, state))
    }

    /// Starts a checkout session for one payment action, after validating
    /// that the action is currently legal for this student.
    ///
    /// A `Pending` record is written before the student is handed to the
    /// hosted checkout; [`PaymentDesk::confirm_payment`] settles it once the
    /// gateway has been asked for the outcome.
    pub async fn initiate_payment(
        &self,
        student_id: &str,
        option: PlanChoice,
        installment: Option<u8>,
    ) -> Result<SessionHandle> {
        let plan = self.pricing_for(student_id).await?;
        let records = self.payments.payments_for(student_id).await?;

        let (amount, payment_type, installment_number) = match option {
            PlanChoice::OneTime => {
                if reconcile::is_payment_option_disabled(&records, &plan, option) {
                    return Err(PaymentError::NotAllowed(
                        "full payment is not currently available".to_string(),
                    ));
                }
                (plan.full_payment, PaymentType::OneTime, None)
            }
            _ => {
                let n = installment.ok_or_else(|| {
                    PaymentError::Validation(
                        "installment number is required for installment plans".to_string(),
                    )
                })?;
                if reconcile::is_installment_button_disabled(&records, &plan, option, n) {
                    return Err(PaymentError::NotAllowed(format!(
                        "installment {n} of the {} plan is not currently payable",
                        option.label()
                    )));
                }
                let amount = plan
                    .installments(option)
                    .and_then(|schedule| schedule.get(usize::from(n) - 1))
                    .copied()
                    .ok_or_else(|| {
                        PaymentError::Validation(format!("installment {n} is out of range"))
                    })?;
                (amount, PaymentType::Installment, Some(n))
            }
        };

        let order_id = generate_order_id();
        let session = self
            .gateway
            .create_payment_session(OrderRequest {
                order_id: order_id.clone(),
                student_id: student_id.to_string(),
                amount,
            })
            .await?;

        self.payments
            .record(PaymentRecord {
                order_id: order_id.clone(),
                student_id: student_id.to_string(),
                amount,
                payment_type,
                installment_number,
                status: PaymentStatus::Pending,
                created_at: Utc::now(),
            })
            .await?;

        info!(student_id, %order_id, %amount, "payment session created");
        Ok(session)
    }

    /// Verifies an order with the gateway (one call, no retries) and settles
    /// the stored record with the verified status.
    pub async fn confirm_payment(&self, order_id: &str) -> Result<PaymentStatus> {
        let verification = self.gateway.verify_payment(order_id).await?;
        self.payments
            .update_status(order_id, verification.status)
            .await?;
        info!(order_id, status = ?verification.status, "payment verified");
        Ok(verification.status)
    }
}
