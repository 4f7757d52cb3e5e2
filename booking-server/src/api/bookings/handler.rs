//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;

use crate::core::ServerState;
use crate::db::repository::{booking, event, slot};
use crate::reservations::pricing;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::response::{BookingStatusEntry, BookingStatusResponse};

/// Aggregated booking status for a checkout session
///
/// Called by the post-checkout success page. The total comes from the
/// provider when a key is configured; otherwise it falls back to the
/// local price table so the page still renders in development.
pub async fn status(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<BookingStatusResponse>> {
    let bookings = booking::find_by_session(&state.pool, &session_id).await?;
    let Some(first) = bookings.first() else {
        return Err(AppError::with_message(
            ErrorCode::BookingNotFound,
            format!("No bookings for session {session_id}"),
        ));
    };

    let vendor_kind = first.vendor_kind;
    let num_dates = bookings.len() as u32;
    let all_paid = bookings.iter().all(|b| b.is_paid);
    let total_price = session_total(&state, &session_id)
        .await
        .unwrap_or_else(|| pricing::to_decimal(pricing::total_cents(vendor_kind, num_dates)));

    let mut entries = Vec::with_capacity(bookings.len());
    for record in &bookings {
        let market = event::find_by_id(&state.pool, record.event_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Event {}", record.event_id)))?;
        let spot = slot::find_by_id(&state.pool, record.slot_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::SlotNotFound,
                    format!("Slot {} not found", record.slot_id),
                )
            })?;
        entries.push(BookingStatusEntry {
            booking_id: record.id,
            event_name: market.name,
            event_date: market.date,
            spot_number: spot.spot_number,
            state: record.state(),
        });
    }

    Ok(Json(BookingStatusResponse {
        session_id,
        vendor_kind,
        all_paid,
        total_price,
        num_dates,
        bookings: entries,
    }))
}

/// Fetch the session total from the provider, tolerating failures
async fn session_total(state: &ServerState, session_id: &str) -> Option<Decimal> {
    if !state.stripe.is_configured() {
        return None;
    }
    match state.stripe.get_session(session_id).await {
        Ok(info) => info.amount_total.map(pricing::to_decimal),
        Err(e) => {
            tracing::warn!(session = session_id, error = %e, "Session lookup failed, using local price table");
            None
        }
    }
}
