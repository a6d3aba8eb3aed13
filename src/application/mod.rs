//! Application layer orchestrating pricing, reconciliation, and the payment
//! collaborators behind the domain ports.

pub mod desk;
