//! SheetsSync: best-effort spreadsheet mirror of paid bookings
//!
//! Pushes one flattened row per captured booking to a configured
//! Apps-Script-style webhook. Strictly fire-and-forget: failures are the
//! caller's to log, never to propagate into the payment path.

use reqwest::Client;
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Booking, BoothSlot, Event, VendorDetails};

/// One spreadsheet row, flattened for the staff sheet
#[derive(Debug, Clone, Serialize)]
pub struct SheetsRow {
    pub booking_id: i64,
    pub event_name: String,
    pub event_date: String,
    pub spot_number: String,

    pub vendor_kind: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_name: Option<String>,
    pub pronouns: Option<String>,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub instagram: Option<String>,
    pub social_media_consent: bool,
    pub photo_consent: bool,
    pub noise_sensitivity: bool,
    pub booth_sharing: bool,
    pub partner_instagram: Option<String>,
    pub price_range: Option<String>,
    pub additional_notes: Option<String>,

    // Kind-specific columns; blank for the other kind
    pub products_selling: Option<String>,
    pub electricity_cord: Option<bool>,
    pub cuisine_type: Option<String>,
    pub food_items: Option<String>,
    pub setup_size: Option<String>,
    pub generator: Option<bool>,

    pub checkout_session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub is_paid: bool,
}

impl SheetsRow {
    pub fn from_booking(booking: &Booking, event: &Event, slot: &BoothSlot) -> Self {
        let mut row = Self {
            booking_id: booking.id,
            event_name: event.name.clone(),
            event_date: event.date.to_string(),
            spot_number: slot.spot_number.clone(),
            vendor_kind: booking.vendor_kind.as_str().to_string(),
            first_name: booking.first_name.clone(),
            last_name: booking.last_name.clone(),
            preferred_name: booking.preferred_name.clone(),
            pronouns: booking.pronouns.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            business_name: booking.business_name.clone(),
            instagram: booking.instagram.clone(),
            social_media_consent: booking.social_media_consent,
            photo_consent: booking.photo_consent,
            noise_sensitivity: booking.noise_sensitivity,
            booth_sharing: booking.booth_sharing,
            partner_instagram: booking.partner_instagram.clone(),
            price_range: booking.price_range.clone(),
            additional_notes: booking.additional_notes.clone(),
            products_selling: None,
            electricity_cord: None,
            cuisine_type: None,
            food_items: None,
            setup_size: None,
            generator: None,
            checkout_session_id: booking.checkout_session_id.clone(),
            payment_intent_id: booking.payment_intent_id.clone(),
            is_paid: booking.is_paid,
        };

        match &booking.details {
            VendorDetails::General {
                products_selling,
                electricity_cord,
            } => {
                row.products_selling = Some(products_selling.clone());
                row.electricity_cord = Some(*electricity_cord);
            }
            VendorDetails::Food {
                cuisine_type,
                food_items,
                setup_size,
                generator,
            } => {
                row.cuisine_type = Some(cuisine_type.clone());
                row.food_items = Some(food_items.clone());
                row.setup_size = Some(setup_size.clone());
                row.generator = Some(*generator);
            }
        }

        row
    }
}

/// HTTP client for the spreadsheet webhook
pub struct SheetsSync {
    client: Client,
    webhook_url: Option<String>,
}

impl SheetsSync {
    pub fn new(webhook_url: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Whether a webhook URL is configured
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Push one row to the spreadsheet webhook
    pub async fn push_row(&self, row: &SheetsRow) -> AppResult<()> {
        let Some(url) = &self.webhook_url else {
            return Err(AppError::with_message(
                ErrorCode::SyncFailure,
                "SHEETS_WEBHOOK_URL is not configured",
            ));
        };

        let response = self
            .client
            .post(url)
            .json(row)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(ErrorCode::SyncFailure, format!("Sheets push failed: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(AppError::with_message(
                ErrorCode::SyncFailure,
                format!("Sheets webhook returned HTTP {}", response.status()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use shared::models::VendorKind;

    #[test]
    fn test_disabled_when_unconfigured() {
        let sync = SheetsSync::new(None).unwrap();
        assert!(!sync.is_enabled());
    }

    #[test]
    fn test_row_flattens_food_details() {
        let event = Event {
            id: 1,
            name: "Night Market".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            location: "Main Plaza".to_string(),
            description: None,
            price_cents: 3500,
            total_capacity: 20,
            available_count: 19,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let slot = BoothSlot {
            id: 7,
            event_id: 1,
            spot_number: "007".to_string(),
            is_available: false,
            claimed: true,
            created_at: Utc::now(),
        };
        let booking = Booking {
            id: 42,
            event_id: 1,
            slot_id: 7,
            vendor_kind: VendorKind::Food,
            first_name: "Mei".to_string(),
            last_name: "Lin".to_string(),
            email: "mei@example.com".to_string(),
            phone: "5559876543".to_string(),
            business_name: "Night Snacks".to_string(),
            preferred_name: None,
            pronouns: None,
            instagram: None,
            social_media_consent: false,
            photo_consent: false,
            noise_sensitivity: false,
            booth_sharing: false,
            partner_instagram: None,
            price_range: None,
            additional_notes: None,
            details: VendorDetails::Food {
                cuisine_type: "Taiwanese".to_string(),
                food_items: "Popcorn chicken".to_string(),
                setup_size: "10x10".to_string(),
                generator: true,
            },
            checkout_session_id: Some("cs_test_1".to_string()),
            payment_intent_id: Some("pi_test_1".to_string()),
            is_paid: true,
            synced_at: None,
            created_at: Utc::now(),
        };

        let row = SheetsRow::from_booking(&booking, &event, &slot);
        assert_eq!(row.spot_number, "007");
        assert_eq!(row.cuisine_type.as_deref(), Some("Taiwanese"));
        assert_eq!(row.generator, Some(true));
        assert!(row.products_selling.is_none());
        assert!(row.is_paid);
    }
}
