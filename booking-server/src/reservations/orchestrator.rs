//! Reservation orchestrator
//!
//! Turns intake requests into claimed slots plus unpaid bookings, opens
//! the hosted checkout, and compensates (release + un-claim) whenever the
//! checkout call fails. Every claim is a guarded single-statement
//! check-and-set; multi-statement sequences run inside one transaction.

use sqlx::SqlitePool;
use validator::Validate;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Booking, VendorKind};
use shared::request::{MultiReserveRequest, ReserveRequest};
use shared::response::CheckoutResponse;

use crate::core::ServerState;
use crate::db::repository::{booking, event, slot};
use crate::reservations::pricing;
use crate::services::CheckoutParams;

/// Result of a staged reservation, before checkout
#[derive(Debug)]
pub struct ReservationOutcome {
    pub bookings: Vec<Booking>,
    pub vendor_kind: VendorKind,
    pub total_cents: i64,
    pub num_dates: u32,
    /// Line item label for the hosted checkout page
    pub description: String,
}

fn validate_intake(request: &ReserveRequest) -> AppResult<()> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(())
}

/// Reserve a specific booth slot
pub async fn reserve_slot(
    pool: &SqlitePool,
    slot_id: i64,
    request: &ReserveRequest,
) -> AppResult<ReservationOutcome> {
    validate_intake(request)?;
    let details = request.vendor_details()?;

    let the_slot = slot::find_by_id(pool, slot_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SlotNotFound).with_detail("slot_id", slot_id))?;
    let the_event = event::find_by_id(pool, the_slot.event_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    if !slot::claim(&mut *tx, slot_id).await? {
        return Err(AppError::slot_unavailable(slot_id));
    }
    let booking_id = booking::insert(&mut *tx, the_event.id, slot_id, request, &details).await?;

    tx.commit().await.map_err(db_err)?;

    let record = booking::find_by_id(pool, booking_id)
        .await?
        .ok_or_else(|| AppError::internal("Booking vanished after insert"))?;

    Ok(ReservationOutcome {
        vendor_kind: record.vendor_kind,
        total_cents: pricing::total_cents(record.vendor_kind, 1),
        num_dates: 1,
        description: format!("{} booth {}", the_event.name, the_slot.spot_number),
        bookings: vec![record],
    })
}

/// Reserve an auto-assigned slot for an event
///
/// The first available unclaimed slot (by spot label) wins; the claim and
/// the slot selection are one statement, so two concurrent vendors can
/// never hold the same slot.
pub async fn reserve_event(
    pool: &SqlitePool,
    event_id: i64,
    request: &ReserveRequest,
) -> AppResult<ReservationOutcome> {
    validate_intake(request)?;
    let details = request.vendor_details()?;

    let the_event = event::find_by_id(pool, event_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound).with_detail("event_id", event_id))?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    let slot_id = slot::claim_first_available(&mut *tx, event_id)
        .await?
        .ok_or_else(|| AppError::sold_out(event_id))?;
    let booking_id = booking::insert(&mut *tx, event_id, slot_id, request, &details).await?;

    tx.commit().await.map_err(db_err)?;

    let record = booking::find_by_id(pool, booking_id)
        .await?
        .ok_or_else(|| AppError::internal("Booking vanished after insert"))?;

    Ok(ReservationOutcome {
        vendor_kind: record.vendor_kind,
        total_cents: pricing::total_cents(record.vendor_kind, 1),
        num_dates: 1,
        description: format!("{} booth reservation", the_event.name),
        bookings: vec![record],
    })
}

/// Reserve one slot per date, all-or-nothing
///
/// Every entry is resolved (date → event), validated, and claimed inside
/// a single transaction; any failure rolls the whole batch back, leaving
/// no partial holds.
pub async fn reserve_multi(
    pool: &SqlitePool,
    request: &MultiReserveRequest,
) -> AppResult<ReservationOutcome> {
    if request.reservations.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyBatch));
    }

    let vendor_kind = request.reservations[0].reservation_data.vendor_kind;
    if request
        .reservations
        .iter()
        .any(|e| e.reservation_data.vendor_kind != vendor_kind)
    {
        return Err(AppError::validation(
            "All reservations in a batch must use the same vendor kind",
        ));
    }

    let mut tx = pool.begin().await.map_err(db_err)?;
    let mut booking_ids = Vec::with_capacity(request.reservations.len());

    for entry in &request.reservations {
        let intake = &entry.reservation_data;
        validate_intake(intake)?;
        let details = intake.vendor_details()?;

        let the_event = event::find_by_date(&mut *tx, entry.event_date)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::EventDateUnavailable)
                    .with_detail("date", entry.event_date.to_string())
            })?;

        let slot_id = slot::claim_first_available(&mut *tx, the_event.id)
            .await?
            .ok_or_else(|| AppError::sold_out(the_event.id))?;
        let booking_id = booking::insert(&mut *tx, the_event.id, slot_id, intake, &details).await?;
        booking_ids.push(booking_id);
    }

    // Re-read the staged records while still in the transaction
    let bookings = booking::find_by_ids(&mut *tx, &booking_ids).await?;

    tx.commit().await.map_err(db_err)?;

    let num_dates = bookings.len() as u32;
    Ok(ReservationOutcome {
        vendor_kind,
        total_cents: pricing::total_cents(vendor_kind, num_dates),
        num_dates,
        description: format!("Booth reservation ({num_dates} dates)"),
        bookings,
    })
}

/// Compensating transaction: delete bookings and un-claim their slots
pub async fn release_bookings(pool: &SqlitePool, bookings: &[Booking]) -> AppResult<()> {
    if bookings.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await.map_err(db_err)?;

    let ids: Vec<i64> = bookings.iter().map(|b| b.id).collect();
    booking::delete_unpaid(&mut *tx, &ids).await?;
    for record in bookings {
        slot::unclaim(&mut *tx, record.slot_id).await?;
    }

    tx.commit().await.map_err(db_err)?;

    tracing::info!(count = bookings.len(), "Released reservation holds");
    Ok(())
}

/// Open a hosted checkout session for a staged reservation
///
/// On any provider failure the reservation is released before the error
/// surfaces, so a failed checkout never strands inventory or leaves
/// orphaned unpaid records.
pub async fn open_checkout(
    state: &ServerState,
    outcome: &ReservationOutcome,
) -> AppResult<CheckoutResponse> {
    let params = CheckoutParams {
        amount_cents: outcome.total_cents,
        product_name: outcome.description.clone(),
        booking_ids: outcome.bookings.iter().map(|b| b.id).collect(),
        vendor_kind: outcome.vendor_kind,
        num_dates: outcome.num_dates,
        success_url: state.config.success_url(),
        cancel_url: state.config.cancel_url(),
        customer_email: outcome
            .bookings
            .first()
            .map(|b| b.email.clone())
            .unwrap_or_default(),
    };

    let session = match state.stripe.create_checkout_session(&params).await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "Checkout session creation failed, compensating");
            if let Err(release_err) = release_bookings(&state.pool, &outcome.bookings).await {
                tracing::error!(error = %release_err, "Compensation failed after checkout error");
            }
            return Err(err);
        }
    };

    let mut tx = state.pool.begin().await.map_err(db_err)?;
    for record in &outcome.bookings {
        booking::attach_correlation(
            &mut *tx,
            record.id,
            Some(&session.id),
            session.payment_intent.as_deref(),
        )
        .await?;
    }
    tx.commit().await.map_err(db_err)?;

    Ok(CheckoutResponse {
        checkout_url: session.url,
        session_id: session.id,
        total_price: (outcome.num_dates > 1).then(|| pricing::to_decimal(outcome.total_cents)),
        num_dates: (outcome.num_dates > 1).then_some(outcome.num_dates),
    })
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::database(e.to_string())
}
