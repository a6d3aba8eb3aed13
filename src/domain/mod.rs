//! Pure fee-pricing and reconciliation logic, plus the ports to the outside
//! collaborators. Nothing in this layer performs IO.

pub mod money;
pub mod payment;
pub mod ports;
pub mod pricing;
pub mod reconcile;
