//! Utility module
//!
//! - [`AppError`] / [`ApiResponse`] re-exported from `shared::error`
//! - Logging setup and validation helpers

pub mod logger;
pub mod validation;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
