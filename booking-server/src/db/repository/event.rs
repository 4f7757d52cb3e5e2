//! Event Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{Event, EventCreate, spot_label};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, name, date, location, description, price_cents, \
                       total_capacity, available_count, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(&format!(
        "SELECT {COLUMNS} FROM event ORDER BY date, created_at"
    ))
    .fetch_all(pool)
    .await?;
    Ok(events)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(&format!("SELECT {COLUMNS} FROM event WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

/// Find the event on a date
///
/// When multiple events share a date, the earliest-created one wins; the
/// multi-date reservation flow resolves entries through this.
pub async fn find_by_date(
    conn: &mut SqliteConnection,
    date: NaiveDate,
) -> RepoResult<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(&format!(
        "SELECT {COLUMNS} FROM event WHERE date = ? ORDER BY created_at, id LIMIT 1"
    ))
    .bind(date)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(event)
}

/// Create an event and its labelled slots in one transaction
pub async fn create(pool: &SqlitePool, data: EventCreate) -> RepoResult<Event> {
    if data.total_capacity < 0 {
        return Err(RepoError::Validation("Capacity cannot be negative".into()));
    }

    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO event (name, date, location, description, price_cents, total_capacity, available_count) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.date)
    .bind(&data.location)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(data.total_capacity)
    .bind(data.total_capacity)
    .fetch_one(&mut *tx)
    .await?;

    for n in 1..=data.total_capacity {
        sqlx::query("INSERT INTO booth_slot (event_id, spot_number) VALUES (?, ?)")
            .bind(id)
            .bind(spot_label(n))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create event".into()))
}

/// Reconcile the slot count of an event to `capacity`
///
/// Adds labelled slots past the current maximum label; removes only
/// still-available, unclaimed slots. Shrinking below the committed floor
/// stops at the floor. `total_capacity` and `available_count` are
/// recomputed from the surviving rows.
pub async fn set_capacity(pool: &SqlitePool, event_id: i64, capacity: i64) -> RepoResult<Event> {
    if capacity < 0 {
        return Err(RepoError::Validation("Capacity cannot be negative".into()));
    }

    let mut tx = pool.begin().await?;

    let current: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM booth_slot WHERE event_id = ?")
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

    if capacity > current {
        // Continue numbering past the highest existing label
        let max_label: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(CAST(spot_number AS INTEGER)), 0) FROM booth_slot WHERE event_id = ?",
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        for n in 1..=(capacity - current) {
            sqlx::query("INSERT INTO booth_slot (event_id, spot_number) VALUES (?, ?)")
                .bind(event_id)
                .bind(spot_label(max_label + n))
                .execute(&mut *tx)
                .await?;
        }
    } else if capacity < current {
        sqlx::query(
            "DELETE FROM booth_slot WHERE id IN ( \
               SELECT id FROM booth_slot \
               WHERE event_id = ? AND is_available = 1 AND claimed = 0 \
               ORDER BY CAST(spot_number AS INTEGER) DESC LIMIT ?)",
        )
        .bind(event_id)
        .bind(current - capacity)
        .execute(&mut *tx)
        .await?;
    }

    let rows = sqlx::query(
        "UPDATE event SET \
           total_capacity = (SELECT COUNT(*) FROM booth_slot WHERE event_id = event.id), \
           available_count = (SELECT COUNT(*) FROM booth_slot WHERE event_id = event.id AND is_available = 1), \
           updated_at = datetime('now') \
         WHERE id = ?",
    )
    .bind(event_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Event {event_id} not found")));
    }

    tx.commit().await?;

    find_by_id(pool, event_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Event {event_id} not found")))
}

/// Decrement the live availability counter, never below zero
///
/// Returns whether a decrement happened.
pub async fn decrement_available(conn: &mut SqliteConnection, event_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE event SET available_count = available_count - 1, updated_at = datetime('now') \
         WHERE id = ? AND available_count > 0",
    )
    .bind(event_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}
