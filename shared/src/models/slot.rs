//! Booth Slot Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booth slot entity
///
/// `claimed` is the short-lived reservation hold set while a checkout is
/// in flight; `is_available` flips false exactly once, on payment capture,
/// and never reverts automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BoothSlot {
    pub id: i64,
    pub event_id: i64,
    /// Zero-padded label, unique per event ("001", "002", ...)
    pub spot_number: String,
    pub is_available: bool,
    pub claimed: bool,
    pub created_at: DateTime<Utc>,
}

impl BoothSlot {
    /// Whether the orchestrator may still claim this slot
    pub fn is_claimable(&self) -> bool {
        self.is_available && !self.claimed
    }
}

/// Format a slot index as a spot label
pub fn spot_label(index: i64) -> String {
    format!("{:03}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_label() {
        assert_eq!(spot_label(1), "001");
        assert_eq!(spot_label(42), "042");
        assert_eq!(spot_label(1000), "1000");
    }

    #[test]
    fn test_claimable() {
        let slot = BoothSlot {
            id: 1,
            event_id: 1,
            spot_number: "001".to_string(),
            is_available: true,
            claimed: false,
            created_at: Utc::now(),
        };
        assert!(slot.is_claimable());

        let held = BoothSlot {
            claimed: true,
            ..slot.clone()
        };
        assert!(!held.is_claimable());

        let sold = BoothSlot {
            is_available: false,
            ..slot
        };
        assert!(!sold.is_claimable());
    }
}
