//! Event Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market event entity (one market day)
///
/// `total_capacity` is the staff-configured number of booth slots;
/// `available_count` is the live counter, decremented on payment capture
/// and never driven below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
    /// Booth price in cents (per day, general-vendor tier)
    pub price_cents: i64,
    pub total_capacity: i64,
    pub available_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Booth price in currency units
    pub fn price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }

    /// Whether any spot is still available
    pub fn is_sold_out(&self) -> bool {
        self.available_count <= 0
    }
}

/// Create event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub total_capacity: i64,
}

/// Capacity reconcile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCapacityUpdate {
    pub total_capacity: i64,
}
