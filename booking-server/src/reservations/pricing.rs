//! Vendor-tier price table
//!
//! Booth pricing is per vendor kind, per market day. Prices are handled
//! as integer cents everywhere; `Decimal` only at the API boundary.

use rust_decimal::Decimal;
use shared::models::VendorKind;

/// General vendor booth, per day
const GENERAL_DAILY_CENTS: i64 = 3_500;
/// Food vendor booth, per day
const FOOD_DAILY_CENTS: i64 = 10_000;

/// Daily booth rate in cents for a vendor kind
pub fn daily_rate_cents(kind: VendorKind) -> i64 {
    match kind {
        VendorKind::General => GENERAL_DAILY_CENTS,
        VendorKind::Food => FOOD_DAILY_CENTS,
    }
}

/// Total price in cents for a batch of dates
pub fn total_cents(kind: VendorKind, num_dates: u32) -> i64 {
    daily_rate_cents(kind) * num_dates as i64
}

/// Convert cents to a display amount
pub fn to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_rates() {
        assert_eq!(daily_rate_cents(VendorKind::General), 3500);
        assert_eq!(daily_rate_cents(VendorKind::Food), 10000);
    }

    #[test]
    fn test_batch_total() {
        assert_eq!(total_cents(VendorKind::General, 3), 10500);
        assert_eq!(total_cents(VendorKind::Food, 2), 20000);
        assert_eq!(total_cents(VendorKind::General, 0), 0);
    }

    #[test]
    fn test_decimal_display() {
        assert_eq!(to_decimal(3500).to_string(), "35.00");
        assert_eq!(to_decimal(10500).to_string(), "105.00");
    }
}
