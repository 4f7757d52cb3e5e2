//! Unified error codes for the booking backend
//!
//! This module defines all error codes used across the server and any
//! future clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Booking / inventory errors
//! - 5xxx: Payment / webhook errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Booking / Inventory ====================
    /// Booking not found
    BookingNotFound = 4001,
    /// No available slot for the requested event
    NoAvailableInventory = 4002,
    /// The requested slot is no longer available
    SlotUnavailable = 4003,
    /// No event exists on the requested date
    EventDateUnavailable = 4004,
    /// Event not found
    EventNotFound = 4005,
    /// Slot not found
    SlotNotFound = 4006,
    /// Booking has already been paid
    BookingAlreadyPaid = 4007,
    /// Empty reservation batch
    EmptyBatch = 4008,

    // ==================== 5xxx: Payment / Webhook ====================
    /// Checkout session creation failed
    CheckoutFailed = 5001,
    /// Webhook signature verification failed
    WebhookSignatureInvalid = 5002,
    /// Webhook payload could not be parsed
    WebhookPayloadInvalid = 5003,
    /// Webhook references a booking we do not know
    CorrelationNotFound = 5004,
    /// Payment provider returned an error
    ProviderError = 5005,
    /// Webhook secret is not configured
    WebhookNotConfigured = 5006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Spreadsheet sync failed (logged only, never surfaced to vendors)
    SyncFailure = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Booking / Inventory
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::NoAvailableInventory => "No available spots for this event",
            ErrorCode::SlotUnavailable => "This booth slot is no longer available",
            ErrorCode::EventDateUnavailable => "No event exists on the requested date",
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::SlotNotFound => "Booth slot not found",
            ErrorCode::BookingAlreadyPaid => "Booking has already been paid",
            ErrorCode::EmptyBatch => "Reservation batch is empty",

            // Payment / Webhook
            ErrorCode::CheckoutFailed => "Failed to create checkout session",
            ErrorCode::WebhookSignatureInvalid => "Webhook signature verification failed",
            ErrorCode::WebhookPayloadInvalid => "Webhook payload is invalid",
            ErrorCode::CorrelationNotFound => "Webhook references an unknown booking",
            ErrorCode::ProviderError => "Payment provider error",
            ErrorCode::WebhookNotConfigured => "Webhook secret not configured",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SyncFailure => "Spreadsheet sync failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,

            4001 => ErrorCode::BookingNotFound,
            4002 => ErrorCode::NoAvailableInventory,
            4003 => ErrorCode::SlotUnavailable,
            4004 => ErrorCode::EventDateUnavailable,
            4005 => ErrorCode::EventNotFound,
            4006 => ErrorCode::SlotNotFound,
            4007 => ErrorCode::BookingAlreadyPaid,
            4008 => ErrorCode::EmptyBatch,

            5001 => ErrorCode::CheckoutFailed,
            5002 => ErrorCode::WebhookSignatureInvalid,
            5003 => ErrorCode::WebhookPayloadInvalid,
            5004 => ErrorCode::CorrelationNotFound,
            5005 => ErrorCode::ProviderError,
            5006 => ErrorCode::WebhookNotConfigured,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::NetworkError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,
            9101 => ErrorCode::SyncFailure,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NoAvailableInventory.code(), 4002);
        assert_eq!(ErrorCode::CorrelationNotFound.code(), 5004);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NoAvailableInventory,
            ErrorCode::WebhookSignatureInvalid,
            ErrorCode::SyncFailure,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value).unwrap(), code);
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_display_zero_padded() {
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "0002");
        assert_eq!(ErrorCode::BookingNotFound.to_string(), "4001");
    }
}
