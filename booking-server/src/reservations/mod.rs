//! Reservation domain core
//!
//! - [`orchestrator`]: claim slots, create bookings, open checkout,
//!   compensate on failure
//! - [`reconciler`]: webhook-driven payment state machine
//! - [`pricing`]: vendor-tier price table
//! - [`expiry`]: reclaims slots from abandoned checkouts

pub mod expiry;
pub mod orchestrator;
pub mod pricing;
pub mod reconciler;
