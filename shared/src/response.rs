//! Response types
//!
//! API response payloads shared between the server and clients.

use crate::models::{BookingState, BoothSlot, Event, VendorKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response for a reservation that opened a hosted checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_dates: Option<u32>,
}

/// Event detail including its slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub price: Decimal,
    pub slots: Vec<BoothSlot>,
}

/// Compact calendar entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub available_count: i64,
    pub is_sold_out: bool,
}

impl From<&Event> for CalendarEntry {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            date: event.date,
            available_count: event.available_count,
            is_sold_out: event.is_sold_out(),
        }
    }
}

/// One booking inside a checkout status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusEntry {
    pub booking_id: i64,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub spot_number: String,
    pub state: BookingState,
}

/// Aggregated status of a checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusResponse {
    pub session_id: String,
    pub vendor_kind: VendorKind,
    pub all_paid: bool,
    pub total_price: Decimal,
    pub num_dates: u32,
    pub bookings: Vec<BookingStatusEntry>,
}
