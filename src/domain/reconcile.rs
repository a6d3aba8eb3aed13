//! Projects a student's payment history onto the pricing plan.
//!
//! The portal never records which installment plan a student picked; the
//! only durable signal is the amount of the first successful installment
//! payment. Every question the payment UI asks — what has been paid, which
//! plan is in force, which buttons are live — is answered here as a pure
//! projection over the record list, recomputed on every read and never
//! stored.
//!
//! Every function is total: empty lists mean "nothing paid yet", and
//! malformed records (an installment with an out-of-range number, a missing
//! number) are simply never matched by the predicates.

use crate::domain::money::Money;
use crate::domain::payment::{PaymentRecord, PaymentType};
use crate::domain::pricing::{PlanChoice, PricingPlan};
use serde::Serialize;

/// Absolute tolerance, in rupees, when matching a first-installment amount
/// against the schedules. Absorbs the rounding slack of the even split and
/// small drift from historical pricing changes.
pub const PLAN_MATCH_TOLERANCE: i64 = 10;

/// Sum of all successful payments, regardless of type.
pub fn total_paid(records: &[PaymentRecord]) -> Money {
    records
        .iter()
        .filter(|r| r.is_success())
        .map(|r| r.amount)
        .sum()
}

/// Whether a single one-time payment has discharged the full fee.
///
/// `>=` rather than `==`: a legacy record captured under an older, slightly
/// different price is still honored as a completed obligation.
pub fn is_full_payment_done(records: &[PaymentRecord], plan: &PricingPlan) -> bool {
    records.iter().any(|r| {
        r.is_success() && r.payment_type == PaymentType::OneTime && r.amount >= plan.full_payment
    })
}

/// Infers which installment plan the student has committed to.
///
/// The amount of the first successful installment (number 1, earliest by
/// `created_at` if duplicated) is matched against the opening installment of
/// each schedule — two, then three, then four — within
/// [`PLAN_MATCH_TOLERANCE`]. No successful first installment, or an amount
/// no schedule explains, means no active plan: ambiguous history
/// conservatively re-opens every option rather than guessing.
///
/// This is the only place that performs the inference; everything else
/// consumes its result.
pub fn active_installment_plan(
    records: &[PaymentRecord],
    plan: &PricingPlan,
) -> Option<PlanChoice> {
    let first = records
        .iter()
        .filter(|r| {
            r.is_success()
                && r.payment_type == PaymentType::Installment
                && r.installment_number == Some(1)
        })
        .min_by_key(|r| r.created_at)?;

    [
        PlanChoice::TwoInstallments,
        PlanChoice::ThreeInstallments,
        PlanChoice::FourInstallments,
    ]
    .into_iter()
    .find(|choice| match plan.installments(*choice) {
        Some(schedule) => first.amount.abs_diff(schedule[0]) <= PLAN_MATCH_TOLERANCE,
        None => false,
    })
}

/// Whether installment `n` has a successful payment. The records carry no
/// plan identity, so this is plan-agnostic by construction.
pub fn is_installment_paid(records: &[PaymentRecord], n: u8) -> bool {
    records.iter().any(|r| {
        r.is_success()
            && r.payment_type == PaymentType::Installment
            && r.installment_number == Some(n)
    })
}

/// Plan-level mutual exclusivity.
///
/// A discharged full payment closes every option, full payment included. An
/// active installment plan closes full payment and every other plan; only
/// the active plan's own option stays open for its remaining installments.
/// With no commitment yet, everything is open.
pub fn is_payment_option_disabled(
    records: &[PaymentRecord],
    plan: &PricingPlan,
    option: PlanChoice,
) -> bool {
    if is_full_payment_done(records, plan) {
        return true;
    }
    match active_installment_plan(records, plan) {
        Some(active) => option != active,
        None => false,
    }
}

/// Button-level gating for one installment within one plan option.
///
/// On top of plan exclusivity, installments are strictly sequential:
/// installment `n` opens only once `n - 1` has a successful record, an
/// installment that already succeeded never opens again, and out-of-range
/// numbers are never payable. Skipping ahead would desynchronize the
/// first-payment plan inference.
pub fn is_installment_button_disabled(
    records: &[PaymentRecord],
    plan: &PricingPlan,
    option: PlanChoice,
    n: u8,
) -> bool {
    if is_payment_option_disabled(records, plan, option) {
        return true;
    }
    let Some(schedule) = plan.installments(option) else {
        // One-time payment has no installment buttons.
        return true;
    };
    if n == 0 || usize::from(n) > schedule.len() {
        return true;
    }
    if is_installment_paid(records, n) {
        return true;
    }
    n > 1 && !is_installment_paid(records, n - 1)
}

/// Whether the student's obligation is fully discharged.
///
/// Either a full one-time payment exists, or the successful payments add up
/// to the nominal full fee. The second arm deliberately uses the base fee
/// even under an installment plan whose surcharged total is higher: the
/// surcharge is treated as a financing cost, not part of the core debt, so
/// a student who has covered the base amount owes nothing more.
pub fn is_obligation_complete(records: &[PaymentRecord], plan: &PricingPlan) -> bool {
    is_full_payment_done(records, plan) || total_paid(records) >= plan.full_payment
}

/// The derived state of a student's payment obligation.
///
/// A pure projection over the plan and the record list, computed fresh on
/// every read and discarded after use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObligationState {
    pub total_paid: Money,
    pub active_plan: Option<PlanChoice>,
    pub is_complete: bool,
}

impl ObligationState {
    pub fn project(plan: &PricingPlan, records: &[PaymentRecord]) -> Self {
        let active_plan = if is_full_payment_done(records, plan) {
            Some(PlanChoice::OneTime)
        } else {
            active_installment_plan(records, plan)
        };
        Self {
            total_paid: total_paid(records),
            active_plan,
            is_complete: is_obligation_complete(records, plan),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentStatus;
    use crate::domain::pricing::calculate_pricing;
    use chrono::{Duration, TimeZone, Utc};

    fn record(
        order: &str,
        amount: i64,
        payment_type: PaymentType,
        installment: Option<u8>,
        status: PaymentStatus,
        minutes: i64,
    ) -> PaymentRecord {
        PaymentRecord {
            order_id: order.to_string(),
            student_id: "stu_1".to_string(),
            amount: Money::new(amount),
            payment_type,
            installment_number: installment,
            status,
            created_at: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    fn paid_installment(order: &str, amount: i64, n: u8, minutes: i64) -> PaymentRecord {
        record(
            order,
            amount,
            PaymentType::Installment,
            Some(n),
            PaymentStatus::Success,
            minutes,
        )
    }

    // base 70000: full 70000, two [36000], three [25333], four [19500]
    fn plan() -> PricingPlan {
        calculate_pricing(Money::new(70_000))
    }

    #[test]
    fn test_no_records_means_nothing_owed_yet() {
        let plan = plan();
        assert_eq!(total_paid(&[]), Money::ZERO);
        assert_eq!(active_installment_plan(&[], &plan), None);
        assert!(!is_full_payment_done(&[], &plan));
        assert!(!is_obligation_complete(&[], &plan));
        for option in [
            PlanChoice::OneTime,
            PlanChoice::TwoInstallments,
            PlanChoice::ThreeInstallments,
            PlanChoice::FourInstallments,
        ] {
            assert!(!is_payment_option_disabled(&[], &plan, option));
        }

        let state = ObligationState::project(&plan, &[]);
        assert_eq!(state.total_paid, Money::ZERO);
        assert_eq!(state.active_plan, None);
        assert!(!state.is_complete);
    }

    #[test]
    fn test_total_paid_ignores_non_success_records() {
        let records = vec![
            paid_installment("o1", 25_333, 1, 0),
            record(
                "o2",
                25_333,
                PaymentType::Installment,
                Some(2),
                PaymentStatus::Pending,
                5,
            ),
            record(
                "o3",
                25_333,
                PaymentType::Installment,
                Some(2),
                PaymentStatus::Failed,
                10,
            ),
            record(
                "o4",
                25_333,
                PaymentType::Installment,
                Some(2),
                PaymentStatus::Refunded,
                15,
            ),
        ];
        assert_eq!(total_paid(&records), Money::new(25_333));
        assert!(!is_installment_paid(&records, 2));
    }

    #[test]
    fn test_full_payment_honors_legacy_higher_amount() {
        let plan = plan();
        let exact = vec![record(
            "o1",
            70_000,
            PaymentType::OneTime,
            None,
            PaymentStatus::Success,
            0,
        )];
        let higher = vec![record(
            "o1",
            72_500,
            PaymentType::OneTime,
            None,
            PaymentStatus::Success,
            0,
        )];
        let lower = vec![record(
            "o1",
            69_999,
            PaymentType::OneTime,
            None,
            PaymentStatus::Success,
            0,
        )];
        assert!(is_full_payment_done(&exact, &plan));
        assert!(is_full_payment_done(&higher, &plan));
        assert!(!is_full_payment_done(&lower, &plan));
    }

    #[test]
    fn test_full_payment_disables_everything() {
        let plan = plan();
        let records = vec![record(
            "o1",
            70_000,
            PaymentType::OneTime,
            None,
            PaymentStatus::Success,
            0,
        )];
        for option in [
            PlanChoice::OneTime,
            PlanChoice::TwoInstallments,
            PlanChoice::ThreeInstallments,
            PlanChoice::FourInstallments,
        ] {
            assert!(is_payment_option_disabled(&records, &plan, option));
        }
        let state = ObligationState::project(&plan, &records);
        assert_eq!(state.active_plan, Some(PlanChoice::OneTime));
        assert!(state.is_complete);
    }

    #[test]
    fn test_plan_inference_from_first_installment_amount() {
        let plan = plan();
        let two = vec![paid_installment("o1", 36_000, 1, 0)];
        let three = vec![paid_installment("o1", 25_333, 1, 0)];
        let four = vec![paid_installment("o1", 19_500, 1, 0)];
        assert_eq!(
            active_installment_plan(&two, &plan),
            Some(PlanChoice::TwoInstallments)
        );
        assert_eq!(
            active_installment_plan(&three, &plan),
            Some(PlanChoice::ThreeInstallments)
        );
        assert_eq!(
            active_installment_plan(&four, &plan),
            Some(PlanChoice::FourInstallments)
        );
    }

    #[test]
    fn test_plan_inference_tolerance_boundary() {
        let plan = plan();
        let within = vec![paid_installment("o1", 25_333 + PLAN_MATCH_TOLERANCE, 1, 0)];
        let beyond = vec![paid_installment("o1", 25_333 + PLAN_MATCH_TOLERANCE + 1, 1, 0)];
        assert_eq!(
            active_installment_plan(&within, &plan),
            Some(PlanChoice::ThreeInstallments)
        );
        assert_eq!(active_installment_plan(&beyond, &plan), None);
    }

    #[test]
    fn test_plan_inference_ignores_later_installments() {
        // Only installment number 1 carries the plan signal.
        let plan = plan();
        let records = vec![paid_installment("o1", 25_333, 2, 0)];
        assert_eq!(active_installment_plan(&records, &plan), None);
    }

    #[test]
    fn test_plan_inference_uses_earliest_duplicate_first_installment() {
        // A two-tab race can leave two records for installment 1; the
        // earliest one decides.
        let plan = plan();
        let records = vec![
            paid_installment("o2", 19_500, 1, 30),
            paid_installment("o1", 25_333, 1, 0),
        ];
        assert_eq!(
            active_installment_plan(&records, &plan),
            Some(PlanChoice::ThreeInstallments)
        );
    }

    #[test]
    fn test_ambiguous_amount_reopens_all_options() {
        let plan = plan();
        let records = vec![paid_installment("o1", 30_000, 1, 0)];
        assert_eq!(active_installment_plan(&records, &plan), None);
        for option in [
            PlanChoice::OneTime,
            PlanChoice::TwoInstallments,
            PlanChoice::ThreeInstallments,
            PlanChoice::FourInstallments,
        ] {
            assert!(!is_payment_option_disabled(&records, &plan, option));
        }
    }

    #[test]
    fn test_active_plan_locks_out_other_options() {
        let plan = plan();
        let records = vec![paid_installment("o1", 25_333, 1, 0)];
        assert!(is_payment_option_disabled(
            &records,
            &plan,
            PlanChoice::OneTime
        ));
        assert!(is_payment_option_disabled(
            &records,
            &plan,
            PlanChoice::TwoInstallments
        ));
        assert!(!is_payment_option_disabled(
            &records,
            &plan,
            PlanChoice::ThreeInstallments
        ));
        assert!(is_payment_option_disabled(
            &records,
            &plan,
            PlanChoice::FourInstallments
        ));
    }

    #[test]
    fn test_installments_are_strictly_sequential() {
        let plan = plan();
        let records = vec![paid_installment("o1", 25_333, 1, 0)];
        let three = PlanChoice::ThreeInstallments;

        // 1 already paid, 2 next, 3 blocked until 2 succeeds.
        assert!(is_installment_button_disabled(&records, &plan, three, 1));
        assert!(!is_installment_button_disabled(&records, &plan, three, 2));
        assert!(is_installment_button_disabled(&records, &plan, three, 3));

        let records = vec![
            paid_installment("o1", 25_333, 1, 0),
            paid_installment("o2", 25_333, 2, 60),
        ];
        assert!(is_installment_button_disabled(&records, &plan, three, 2));
        assert!(!is_installment_button_disabled(&records, &plan, three, 3));
    }

    #[test]
    fn test_first_installment_eligible_with_no_history() {
        let plan = plan();
        for option in [
            PlanChoice::TwoInstallments,
            PlanChoice::ThreeInstallments,
            PlanChoice::FourInstallments,
        ] {
            assert!(!is_installment_button_disabled(&[], &plan, option, 1));
            assert!(is_installment_button_disabled(&[], &plan, option, 2));
        }
    }

    #[test]
    fn test_out_of_range_installments_never_payable() {
        let plan = plan();
        let two = PlanChoice::TwoInstallments;
        assert!(is_installment_button_disabled(&[], &plan, two, 0));
        assert!(is_installment_button_disabled(&[], &plan, two, 3));
        assert!(is_installment_button_disabled(
            &[],
            &plan,
            PlanChoice::OneTime,
            1
        ));
    }

    #[test]
    fn test_obligation_completes_at_base_fee_under_installments() {
        // Surcharged three-plan total is 75999 but the obligation is the
        // base 70000; the third payment crosses it.
        let plan = plan();
        let two_paid = vec![
            paid_installment("o1", 25_333, 1, 0),
            paid_installment("o2", 25_333, 2, 60),
        ];
        assert!(!is_obligation_complete(&two_paid, &plan));

        let three_paid = vec![
            paid_installment("o1", 25_333, 1, 0),
            paid_installment("o2", 25_333, 2, 60),
            paid_installment("o3", 25_333, 3, 120),
        ];
        assert!(is_obligation_complete(&three_paid, &plan));

        let state = ObligationState::project(&plan, &three_paid);
        assert_eq!(state.total_paid, Money::new(75_999));
        assert_eq!(state.active_plan, Some(PlanChoice::ThreeInstallments));
        assert!(state.is_complete);
    }

    #[test]
    fn test_last_installment_is_only_enabled_button_midway() {
        let plan = plan();
        let records = vec![
            paid_installment("o1", 25_333, 1, 0),
            paid_installment("o2", 25_333, 2, 60),
        ];
        let state = ObligationState::project(&plan, &records);
        assert!(!state.is_complete);

        let mut enabled = Vec::new();
        for option in [
            PlanChoice::TwoInstallments,
            PlanChoice::ThreeInstallments,
            PlanChoice::FourInstallments,
        ] {
            for n in 1..=4u8 {
                if !is_installment_button_disabled(&records, &plan, option, n) {
                    enabled.push((option, n));
                }
            }
        }
        assert_eq!(enabled, vec![(PlanChoice::ThreeInstallments, 3)]);
    }

    #[test]
    fn test_malformed_records_are_ignored() {
        let plan = plan();
        let records = vec![
            // Installment type but no number: matched by nothing.
            record(
                "o1",
                25_333,
                PaymentType::Installment,
                None,
                PaymentStatus::Success,
                0,
            ),
            // Out-of-range installment number.
            paid_installment("o2", 25_333, 9, 5),
        ];
        assert_eq!(active_installment_plan(&records, &plan), None);
        assert!(!is_installment_paid(&records, 1));
        // Amounts still count toward the total; they were real money.
        assert_eq!(total_paid(&records), Money::new(50_666));
    }
}
