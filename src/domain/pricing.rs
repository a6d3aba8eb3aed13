use crate::domain::money::Money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::str::FromStr;
use tracing::warn;

/// Flat processing surcharge added on top of the base fee for each
/// installment count. A flat addend keeps every installment a round figure,
/// unlike the percentage fee this replaced.
pub const TWO_INSTALLMENT_SURCHARGE: i64 = 2_000;
pub const THREE_INSTALLMENT_SURCHARGE: i64 = 6_000;
pub const FOUR_INSTALLMENT_SURCHARGE: i64 = 8_000;

/// A payment option a student can commit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanChoice {
    OneTime,
    TwoInstallments,
    ThreeInstallments,
    FourInstallments,
}

impl PlanChoice {
    pub fn label(&self) -> &'static str {
        match self {
            PlanChoice::OneTime => "one_time",
            PlanChoice::TwoInstallments => "two_installments",
            PlanChoice::ThreeInstallments => "three_installments",
            PlanChoice::FourInstallments => "four_installments",
        }
    }
}

/// The full set of payment options derived from a course's base fee.
///
/// Recomputed on demand whenever the fee is read and never persisted; it has
/// no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPlan {
    /// Paying in one go costs exactly the base fee, no surcharge.
    pub full_payment: Money,
    pub two_installments: [Money; 2],
    pub three_installments: [Money; 3],
    pub four_installments: [Money; 4],
}

impl PricingPlan {
    /// The installment schedule for a plan option, or `None` for one-time
    /// payment, which has no schedule.
    pub fn installments(&self, choice: PlanChoice) -> Option<&[Money]> {
        match choice {
            PlanChoice::OneTime => None,
            PlanChoice::TwoInstallments => Some(&self.two_installments),
            PlanChoice::ThreeInstallments => Some(&self.three_installments),
            PlanChoice::FourInstallments => Some(&self.four_installments),
        }
    }
}

/// The surcharge for a plan of `installments` payments. One payment carries
/// no surcharge.
pub fn surcharge(installments: usize) -> Money {
    match installments {
        2 => Money::new(TWO_INSTALLMENT_SURCHARGE),
        3 => Money::new(THREE_INSTALLMENT_SURCHARGE),
        4 => Money::new(FOUR_INSTALLMENT_SURCHARGE),
        _ => Money::ZERO,
    }
}

/// Parses a human-entered fee string into whole rupees.
///
/// Accepts anything operators type into the fee field: "₹5,000", "96000",
/// "Rs. 12,500.50". Every character that is not a digit or a decimal point
/// is stripped before parsing, and the result is rounded half up to the
/// nearest rupee.
///
/// Malformed or empty input falls back to zero instead of failing, because
/// a bad fee field must never crash a caller. The fallback is logged: a zero
/// base fee means free enrollment and has to reach an operator as a
/// data-quality problem, not be trusted as a price.
pub fn parse_fee(raw: &str) -> Money {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        warn!(raw, "fee string has no numeric content, falling back to zero");
        return Money::ZERO;
    }

    match Decimal::from_str(&cleaned) {
        Ok(value) => {
            let rounded =
                value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            Money::new(rounded.to_i64().unwrap_or_default())
        }
        Err(_) => {
            warn!(raw, "unparseable fee string, falling back to zero");
            Money::ZERO
        }
    }
}

/// The base fee for plan purposes when a student selected several courses:
/// the cheapest course sets the base. `None` when no courses were selected.
pub fn minimum_fee<I, S>(fees: I) -> Option<Money>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fees.into_iter().map(|fee| parse_fee(fee.as_ref())).min()
}

/// Derives the full pricing plan from a base fee.
///
/// Each installment plan adds its flat surcharge to the base fee and splits
/// the total evenly, rounding half up. Every installment within a plan is
/// identical; no remainder is pushed onto the last payment. The sum of a
/// plan may therefore differ from its nominal total by at most `n - 1`
/// rupees, accepted slack in exchange for predictable, equal installments.
///
/// Pure and total: any non-negative fee yields a fully populated plan.
pub fn calculate_pricing(base_fee: Money) -> PricingPlan {
    PricingPlan {
        full_payment: base_fee,
        two_installments: [even_split(base_fee, 2); 2],
        three_installments: [even_split(base_fee, 3); 3],
        four_installments: [even_split(base_fee, 4); 4],
    }
}

fn even_split(base_fee: Money, installments: usize) -> Money {
    let total = Decimal::from(base_fee.value() + surcharge(installments).value());
    let each = (total / Decimal::from(installments as i64))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Money::new(each.to_i64().unwrap_or_default())
}
