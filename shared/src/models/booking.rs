//! Booking Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vendor kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum VendorKind {
    General,
    Food,
}

impl VendorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Food => "food",
        }
    }
}

/// Kind-specific intake details, stored as a tagged JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VendorDetails {
    General {
        products_selling: String,
        /// Whether the vendor brings an electricity cord
        electricity_cord: bool,
    },
    Food {
        cuisine_type: String,
        food_items: String,
        setup_size: String,
        /// Whether the vendor brings a generator
        generator: bool,
    },
}

impl VendorDetails {
    pub fn kind(&self) -> VendorKind {
        match self {
            Self::General { .. } => VendorKind::General,
            Self::Food { .. } => VendorKind::Food,
        }
    }
}

/// Booking lifecycle state, derived from correlation fields
///
/// `Created -> SessionAttached -> Authorized -> Captured`; transitions only
/// move forward, and redelivered notifications never downgrade a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    Created,
    SessionAttached,
    Authorized,
    Captured,
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub event_id: i64,
    pub slot_id: i64,

    // Vendor intake
    pub vendor_kind: VendorKind,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub preferred_name: Option<String>,
    pub pronouns: Option<String>,
    pub instagram: Option<String>,
    pub social_media_consent: bool,
    pub photo_consent: bool,
    pub noise_sensitivity: bool,
    pub booth_sharing: bool,
    pub partner_instagram: Option<String>,
    pub price_range: Option<String>,
    pub additional_notes: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub details: VendorDetails,

    // Payment correlation
    pub checkout_session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub is_paid: bool,

    // Spreadsheet sync marker (durable across restarts)
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Derive the lifecycle state from correlation fields
    pub fn state(&self) -> BookingState {
        if self.is_paid {
            BookingState::Captured
        } else if self.payment_intent_id.is_some() {
            BookingState::Authorized
        } else if self.checkout_session_id.is_some() {
            BookingState::SessionAttached
        } else {
            BookingState::Created
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        Booking {
            id: 1,
            event_id: 1,
            slot_id: 1,
            vendor_kind: VendorKind::General,
            first_name: "Ada".to_string(),
            last_name: "Chen".to_string(),
            email: "ada@example.com".to_string(),
            phone: "5551234567".to_string(),
            business_name: "Ada Ceramics".to_string(),
            preferred_name: None,
            pronouns: None,
            instagram: Some("@adaceramics".to_string()),
            social_media_consent: true,
            photo_consent: true,
            noise_sensitivity: false,
            booth_sharing: false,
            partner_instagram: None,
            price_range: Some("$10-$60".to_string()),
            additional_notes: None,
            details: VendorDetails::General {
                products_selling: "Hand-thrown mugs".to_string(),
                electricity_cord: false,
            },
            checkout_session_id: None,
            payment_intent_id: None,
            is_paid: false,
            synced_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_state_progression() {
        let mut booking = sample_booking();
        assert_eq!(booking.state(), BookingState::Created);

        booking.checkout_session_id = Some("cs_test_123".to_string());
        assert_eq!(booking.state(), BookingState::SessionAttached);

        booking.payment_intent_id = Some("pi_test_123".to_string());
        assert_eq!(booking.state(), BookingState::Authorized);

        booking.is_paid = true;
        assert_eq!(booking.state(), BookingState::Captured);
    }

    #[test]
    fn test_captured_wins_over_missing_fields() {
        // A paid record stays CAPTURED even if session arrived out of order
        let mut booking = sample_booking();
        booking.is_paid = true;
        assert_eq!(booking.state(), BookingState::Captured);
    }

    #[test]
    fn test_details_tagged_json() {
        let details = VendorDetails::Food {
            cuisine_type: "Taiwanese".to_string(),
            food_items: "Popcorn chicken".to_string(),
            setup_size: "10x10".to_string(),
            generator: true,
        };
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"kind\":\"food\""));
        let back: VendorDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
        assert_eq!(back.kind(), VendorKind::Food);
    }
}
