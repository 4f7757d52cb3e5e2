//! Booking Repository

use super::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use shared::models::{Booking, VendorDetails};
use shared::request::ReserveRequest;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, event_id, slot_id, vendor_kind, first_name, last_name, email, phone, \
                       business_name, preferred_name, pronouns, instagram, social_media_consent, \
                       photo_consent, noise_sensitivity, booth_sharing, partner_instagram, \
                       price_range, additional_notes, details, checkout_session_id, \
                       payment_intent_id, is_paid, synced_at, created_at";

/// Insert an unpaid booking, returning its id
pub async fn insert(
    conn: &mut SqliteConnection,
    event_id: i64,
    slot_id: i64,
    intake: &ReserveRequest,
    details: &VendorDetails,
) -> RepoResult<i64> {
    let details_json = serde_json::to_string(details)
        .map_err(|e| RepoError::Database(format!("Failed to serialize details: {e}")))?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO booking ( \
           event_id, slot_id, vendor_kind, first_name, last_name, email, phone, \
           business_name, preferred_name, pronouns, instagram, social_media_consent, \
           photo_consent, noise_sensitivity, booth_sharing, partner_instagram, \
           price_range, additional_notes, details) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(event_id)
    .bind(slot_id)
    .bind(details.kind())
    .bind(&intake.first_name)
    .bind(&intake.last_name)
    .bind(&intake.email)
    .bind(&intake.phone)
    .bind(&intake.business_name)
    .bind(&intake.preferred_name)
    .bind(&intake.pronouns)
    .bind(&intake.instagram)
    .bind(intake.social_media_consent)
    .bind(intake.photo_consent)
    .bind(intake.noise_sensitivity)
    .bind(intake.booth_sharing)
    .bind(&intake.partner_instagram)
    .bind(&intake.price_range)
    .bind(&intake.additional_notes)
    .bind(details_json)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
    let booking =
        sqlx::query_as::<_, Booking>(&format!("SELECT {COLUMNS} FROM booking WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(booking)
}

/// Fetch a batch of bookings by id
pub async fn find_by_ids(conn: &mut SqliteConnection, ids: &[i64]) -> RepoResult<Vec<Booking>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT {COLUMNS} FROM booking WHERE id IN ({placeholders}) ORDER BY id");
    let mut query = sqlx::query_as::<_, Booking>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let bookings = query.fetch_all(conn).await?;
    Ok(bookings)
}

pub async fn find_by_session(pool: &SqlitePool, session_id: &str) -> RepoResult<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM booking WHERE checkout_session_id = ? ORDER BY id"
    ))
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(bookings)
}

pub async fn find_by_intent(
    conn: &mut SqliteConnection,
    intent_id: &str,
) -> RepoResult<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM booking WHERE payment_intent_id = ? ORDER BY id"
    ))
    .bind(intent_id)
    .fetch_all(conn)
    .await?;
    Ok(bookings)
}

/// Attach checkout correlation to a booking
///
/// COALESCE keeps already-set correlation fields, so redelivered or
/// out-of-order notifications never downgrade a record.
pub async fn attach_correlation(
    conn: &mut SqliteConnection,
    booking_id: i64,
    session_id: Option<&str>,
    intent_id: Option<&str>,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE booking SET \
           checkout_session_id = COALESCE(checkout_session_id, ?), \
           payment_intent_id = COALESCE(payment_intent_id, ?) \
         WHERE id = ?",
    )
    .bind(session_id)
    .bind(intent_id)
    .bind(booking_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Mark a booking paid, guarded so capture commits exactly once
pub async fn mark_paid(conn: &mut SqliteConnection, booking_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE booking SET is_paid = 1 WHERE id = ? AND is_paid = 0")
        .bind(booking_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete a batch of unpaid bookings (compensation and expiry paths)
///
/// Guarded on `is_paid = 0`: a capture committing between a caller's
/// read and this delete leaves the paid booking untouched.
pub async fn delete_unpaid(conn: &mut SqliteConnection, ids: &[i64]) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("DELETE FROM booking WHERE id IN ({placeholders}) AND is_paid = 0");
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.execute(conn).await?;
    Ok(rows.rows_affected())
}

/// Unpaid bookings older than the cutoff, for the hold expiry sweep
pub async fn find_expired_unpaid(
    conn: &mut SqliteConnection,
    cutoff: DateTime<Utc>,
) -> RepoResult<Vec<Booking>> {
    // created_at is written by datetime('now'); bind the cutoff in the
    // same "YYYY-MM-DD HH:MM:SS" shape so the TEXT comparison is sound
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM booking WHERE is_paid = 0 AND created_at < ? ORDER BY id"
    ))
    .bind(cutoff.format("%Y-%m-%d %H:%M:%S").to_string())
    .fetch_all(conn)
    .await?;
    Ok(bookings)
}

/// Stamp a booking as mirrored to the spreadsheet
///
/// Guarded on `synced_at IS NULL`: the stamp is durable, so a booking is
/// pushed at most once across process restarts.
pub async fn mark_synced(pool: &SqlitePool, booking_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE booking SET synced_at = datetime('now') WHERE id = ? AND synced_at IS NULL",
    )
    .bind(booking_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
