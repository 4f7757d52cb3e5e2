//! Booth Slot Repository

use super::RepoResult;
use shared::models::BoothSlot;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, event_id, spot_number, is_available, claimed, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<BoothSlot>> {
    let slot =
        sqlx::query_as::<_, BoothSlot>(&format!("SELECT {COLUMNS} FROM booth_slot WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(slot)
}

pub async fn find_by_event(pool: &SqlitePool, event_id: i64) -> RepoResult<Vec<BoothSlot>> {
    let slots = sqlx::query_as::<_, BoothSlot>(&format!(
        "SELECT {COLUMNS} FROM booth_slot WHERE event_id = ? \
         ORDER BY CAST(spot_number AS INTEGER)"
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(slots)
}

/// List still-claimable slots of an event, ordered by spot label
pub async fn list_available(
    pool: &SqlitePool,
    event_id: i64,
    limit: u32,
    offset: u64,
) -> RepoResult<Vec<BoothSlot>> {
    let slots = sqlx::query_as::<_, BoothSlot>(&format!(
        "SELECT {COLUMNS} FROM booth_slot \
         WHERE event_id = ? AND is_available = 1 AND claimed = 0 \
         ORDER BY CAST(spot_number AS INTEGER) LIMIT ? OFFSET ?"
    ))
    .bind(event_id)
    .bind(limit)
    .bind(offset as i64)
    .fetch_all(pool)
    .await?;
    Ok(slots)
}

/// Claim a specific slot (atomic check-and-set)
///
/// Returns whether the claim won; a lost claim means the slot was taken
/// or sold between read and write.
pub async fn claim(conn: &mut SqliteConnection, slot_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE booth_slot SET claimed = 1 WHERE id = ? AND is_available = 1 AND claimed = 0",
    )
    .bind(slot_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Claim the first available unclaimed slot of an event
///
/// Returns the claimed slot id, or None when the event is sold out.
/// The subquery and update run as one statement, so two concurrent
/// callers can never claim the same slot. Labels are compared
/// numerically; lexicographic order breaks past "999".
pub async fn claim_first_available(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> RepoResult<Option<i64>> {
    let slot_id: Option<i64> = sqlx::query_scalar(
        "UPDATE booth_slot SET claimed = 1 WHERE id = ( \
           SELECT id FROM booth_slot \
           WHERE event_id = ? AND is_available = 1 AND claimed = 0 \
           ORDER BY CAST(spot_number AS INTEGER) LIMIT 1) \
         RETURNING id",
    )
    .bind(event_id)
    .fetch_optional(conn)
    .await?;
    Ok(slot_id)
}

/// Release a reservation hold (compensation or hold expiry)
pub async fn unclaim(conn: &mut SqliteConnection, slot_id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE booth_slot SET claimed = 0 WHERE id = ?")
        .bind(slot_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Commit a slot on payment capture; flips `is_available` exactly once
///
/// Returns whether this call performed the flip; a redelivered capture
/// notification finds the guard already spent and reports false.
pub async fn mark_sold(conn: &mut SqliteConnection, slot_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE booth_slot SET is_available = 0 WHERE id = ? AND is_available = 1")
        .bind(slot_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
