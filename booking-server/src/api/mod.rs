//! HTTP API
//!
//! One module per resource; each exposes a `router()` merged by
//! `core::server::build_app`.

pub mod booth_slots;
pub mod bookings;
pub mod events;
pub mod health;
pub mod webhook;
