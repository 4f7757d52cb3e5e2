//! Shared types for the booth booking backend
//!
//! Common types used across crates: models, request/response payloads,
//! and the unified error system.

pub mod error;
pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Booking, BookingState, BoothSlot, Event, VendorDetails, VendorKind};
