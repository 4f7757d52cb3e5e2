//! Webhook reconciler
//!
//! Consumes payment provider notifications and drives each booking
//! through `CREATED -> SESSION_ATTACHED -> AUTHORIZED -> CAPTURED`.
//! Delivery is at-least-once and unordered, so every transition is a
//! guarded check-and-set: redelivered or out-of-order notifications
//! converge on the same final state instead of failing.

use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Booking;

use crate::core::ServerState;
use crate::db::repository::{booking, event, slot};
use crate::services::SheetsRow;

/// Envelope of a provider notification
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub object: Value,
}

impl WebhookEvent {
    pub fn parse(payload: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| AppError::bad_payload(format!("Unparseable webhook body: {e}")))
    }
}

/// Booking ids from correlation metadata (`booking_id` or `booking_ids`)
fn correlation_ids(metadata: &Value) -> Vec<i64> {
    if let Some(single) = metadata.get("booking_id").and_then(Value::as_str) {
        return single.trim().parse().into_iter().collect();
    }
    metadata
        .get("booking_ids")
        .and_then(Value::as_str)
        .map(|joined| {
            joined
                .split(',')
                .filter_map(|id| id.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default()
}

fn object_str<'a>(object: &'a Value, field: &str) -> Option<&'a str> {
    object.get(field).and_then(Value::as_str)
}

/// Process one verified notification
pub async fn process(state: &ServerState, event: &WebhookEvent) -> AppResult<()> {
    match event.event_type.as_str() {
        "checkout.session.completed" => session_completed(state, &event.data.object).await,
        "payment_intent.requires_capture" => intent_authorized(state, &event.data.object).await,
        "payment_intent.succeeded" => intent_captured(state, &event.data.object).await,
        other => {
            tracing::debug!(event_type = %other, "Ignoring webhook event type");
            Ok(())
        }
    }
}

/// `checkout.session.completed`: attach the session (and intent, when
/// already present) to every booking in the batch
async fn session_completed(state: &ServerState, object: &Value) -> AppResult<()> {
    let session_id = object_str(object, "id")
        .ok_or_else(|| AppError::bad_payload("Session object missing id"))?;
    let intent_id = object_str(object, "payment_intent");

    let metadata = object.get("metadata").cloned().unwrap_or(Value::Null);
    let ids = correlation_ids(&metadata);
    if ids.is_empty() {
        tracing::warn!(session = %session_id, "Session notification without booking correlation");
        return Ok(());
    }

    let mut tx = state.pool.begin().await.map_err(db_err)?;

    let records = booking::find_by_ids(&mut *tx, &ids).await?;
    if records.len() != ids.len() {
        // The provider retries on client errors; a permanently unknown id
        // means the hold was reclaimed or the correlation is corrupt.
        return Err(AppError::new(ErrorCode::CorrelationNotFound)
            .with_detail("session_id", session_id)
            .with_detail("expected", ids.len())
            .with_detail("found", records.len()));
    }

    for record in &records {
        booking::attach_correlation(&mut *tx, record.id, Some(session_id), intent_id).await?;
    }

    tx.commit().await.map_err(db_err)?;

    tracing::info!(session = %session_id, count = records.len(), "Session attached to bookings");
    Ok(())
}

/// `payment_intent.requires_capture`: the authorization hold exists;
/// attach the intent id to the correlated bookings
async fn intent_authorized(state: &ServerState, object: &Value) -> AppResult<()> {
    let intent_id = object_str(object, "id")
        .ok_or_else(|| AppError::bad_payload("Intent object missing id"))?;

    let metadata = object.get("metadata").cloned().unwrap_or(Value::Null);
    let ids = correlation_ids(&metadata);
    if ids.is_empty() {
        tracing::warn!(intent = %intent_id, "Authorization without booking correlation, ignoring");
        return Ok(());
    }

    let mut tx = state.pool.begin().await.map_err(db_err)?;
    let records = booking::find_by_ids(&mut *tx, &ids).await?;
    for record in &records {
        booking::attach_correlation(&mut *tx, record.id, None, Some(intent_id)).await?;
    }
    tx.commit().await.map_err(db_err)?;

    tracing::info!(intent = %intent_id, count = records.len(), "Payment authorized");
    Ok(())
}

/// `payment_intent.succeeded`: commit the capture
///
/// Resolution falls back from the stored intent id to the intent's own
/// correlation metadata, which tolerates deliveries where the session
/// notification was never processed. For each record not already
/// captured, one transaction marks it paid, retires its slot, and
/// decrements the event counter; every statement is guarded, so a
/// redelivery finds nothing left to do.
async fn intent_captured(state: &ServerState, object: &Value) -> AppResult<()> {
    let intent_id = object_str(object, "id")
        .ok_or_else(|| AppError::bad_payload("Intent object missing id"))?;
    let metadata = object.get("metadata").cloned().unwrap_or(Value::Null);

    let mut tx = state.pool.begin().await.map_err(db_err)?;

    let mut records = booking::find_by_intent(&mut *tx, intent_id).await?;
    if records.is_empty() {
        let ids = correlation_ids(&metadata);
        records = booking::find_by_ids(&mut *tx, &ids).await?;
        // Out-of-order delivery: the intent was never attached, do it now
        for record in &records {
            booking::attach_correlation(&mut *tx, record.id, None, Some(intent_id)).await?;
        }
    }

    if records.is_empty() {
        // Hold may have been reclaimed by the expiry sweep; acknowledge
        tracing::warn!(intent = %intent_id, "Capture notification matched no bookings");
        tx.commit().await.map_err(db_err)?;
        return Ok(());
    }

    let mut captured = Vec::new();
    for record in &records {
        if booking::mark_paid(&mut *tx, record.id).await? {
            slot::mark_sold(&mut *tx, record.slot_id).await?;
            event::decrement_available(&mut *tx, record.event_id).await?;
            captured.push(record.id);
        }
    }

    tx.commit().await.map_err(db_err)?;

    if captured.is_empty() {
        tracing::info!(intent = %intent_id, "Capture redelivery, nothing to do");
    } else {
        tracing::info!(intent = %intent_id, count = captured.len(), "Payment captured");
    }

    // Best-effort spreadsheet mirror, after the transaction
    sync_captured(state, &records).await;

    Ok(())
}

/// Push captured, not-yet-synced bookings to the spreadsheet
///
/// Failures are logged and swallowed: the mirror must never fail the
/// payment path.
async fn sync_captured(state: &ServerState, records: &[Booking]) {
    if !state.sheets.is_enabled() {
        return;
    }

    for record in records {
        match push_row(state, record.id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(booking = record.id, "Booking already mirrored, skipping")
            }
            Err(e) => {
                tracing::warn!(booking = record.id, error = %e, "Spreadsheet sync failed");
            }
        }
    }
}

/// Returns whether this call pushed the row
async fn push_row(state: &ServerState, booking_id: i64) -> AppResult<bool> {
    let pool: &SqlitePool = &state.pool;

    let Some(record) = booking::find_by_id(pool, booking_id).await? else {
        return Ok(false);
    };
    if record.synced_at.is_some() || !record.is_paid {
        return Ok(false);
    }

    let the_event = event::find_by_id(pool, record.event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;
    let the_slot = slot::find_by_id(pool, record.slot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Slot"))?;

    let row = SheetsRow::from_booking(&record, &the_event, &the_slot);
    state.sheets.push_row(&row).await?;

    Ok(booking::mark_synced(pool, booking_id).await?)
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::database(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_correlation_single_id() {
        let metadata = json!({"booking_id": "42"});
        assert_eq!(correlation_ids(&metadata), vec![42]);
    }

    #[test]
    fn test_correlation_joined_ids() {
        let metadata = json!({"booking_ids": "1,2, 3"});
        assert_eq!(correlation_ids(&metadata), vec![1, 2, 3]);
    }

    #[test]
    fn test_correlation_missing() {
        assert!(correlation_ids(&json!({})).is_empty());
        assert!(correlation_ids(&Value::Null).is_empty());
        assert!(correlation_ids(&json!({"booking_id": "abc"})).is_empty());
    }

    #[test]
    fn test_parse_event_envelope() {
        let payload = br#"{
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_1", "metadata": {"booking_id": "7"}}}
        }"#;
        let event = WebhookEvent::parse(payload).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(object_str(&event.data.object, "id"), Some("pi_1"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = WebhookEvent::parse(b"not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::WebhookPayloadInvalid);
    }
}
