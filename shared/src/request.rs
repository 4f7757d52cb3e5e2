//! Request types
//!
//! Common request payloads and query parameters used across the API.

use crate::error::{AppError, AppResult};
use crate::models::{VendorDetails, VendorKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page (default: 20, max: 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationQuery {
    /// Get the offset for database queries
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) as u64 * self.per_page as u64
    }

    /// Get the limit (clamped to max 100)
    pub fn limit(&self) -> u32 {
        std::cmp::min(self.per_page, 100)
    }
}

/// Vendor intake payload for a reservation
///
/// Kind-specific fields are flat and optional here; `vendor_details()`
/// enforces the per-kind required set and builds the typed payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReserveRequest {
    pub vendor_kind: VendorKind,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 200))]
    pub business_name: String,

    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub social_media_consent: bool,
    #[serde(default)]
    pub photo_consent: bool,
    #[serde(default)]
    pub noise_sensitivity: bool,
    #[serde(default)]
    pub booth_sharing: bool,
    #[serde(default)]
    pub partner_instagram: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,

    // General vendor fields
    #[serde(default)]
    pub products_selling: Option<String>,
    #[serde(default)]
    pub electricity_cord: Option<bool>,

    // Food vendor fields
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub food_items: Option<String>,
    #[serde(default)]
    pub setup_size: Option<String>,
    #[serde(default)]
    pub generator: Option<bool>,
}

impl ReserveRequest {
    /// Resolve the kind-specific details, enforcing per-kind required fields
    pub fn vendor_details(&self) -> AppResult<VendorDetails> {
        fn required(field: &Option<String>, name: &str) -> AppResult<String> {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::validation(format!("Missing required field: {}", name))
                        .with_detail("field", name)
                })
        }

        match self.vendor_kind {
            VendorKind::General => Ok(VendorDetails::General {
                products_selling: required(&self.products_selling, "products_selling")?,
                electricity_cord: self.electricity_cord.unwrap_or(false),
            }),
            VendorKind::Food => Ok(VendorDetails::Food {
                cuisine_type: required(&self.cuisine_type, "cuisine_type")?,
                food_items: required(&self.food_items, "food_items")?,
                setup_size: required(&self.setup_size, "setup_size")?,
                generator: self.generator.unwrap_or(false),
            }),
        }
    }
}

/// One entry of a multi-date reservation batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiReserveEntry {
    pub event_date: NaiveDate,
    pub reservation_data: ReserveRequest,
}

/// Atomic multi-date reservation batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiReserveRequest {
    pub reservations: Vec<MultiReserveEntry>,
}
