//! Event API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{event, slot};
use crate::reservations::orchestrator;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Event, EventCapacityUpdate, EventCreate};
use shared::models::BoothSlot;
use shared::request::{MultiReserveRequest, PaginationQuery, ReserveRequest};
use shared::response::{CalendarEntry, CheckoutResponse, EventDetail};

/// List all events
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Event>>> {
    let events = event::find_all(&state.pool).await?;
    Ok(Json(events))
}

/// Compact calendar view
pub async fn calendar(State(state): State<ServerState>) -> AppResult<Json<Vec<CalendarEntry>>> {
    let events = event::find_all(&state.pool).await?;
    Ok(Json(events.iter().map(CalendarEntry::from).collect()))
}

/// Event detail including its slots
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EventDetail>> {
    let record = event::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound).with_detail("event_id", id))?;
    let slots = slot::find_by_event(&state.pool, id).await?;

    Ok(Json(EventDetail {
        price: record.price(),
        event: record,
        slots,
    }))
}

/// Claimable slots of an event, paginated
pub async fn available_slots(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<Json<Vec<BoothSlot>>> {
    if event::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::EventNotFound).with_detail("event_id", id));
    }
    let slots =
        slot::list_available(&state.pool, id, pagination.limit(), pagination.offset()).await?;
    Ok(Json(slots))
}

/// Staff: create an event and its labelled slots
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EventCreate>,
) -> AppResult<Json<Event>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.location, "location", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if payload.price_cents < 0 {
        return Err(AppError::validation("price_cents cannot be negative"));
    }

    let record = event::create(&state.pool, payload).await?;
    tracing::info!(event = record.id, capacity = record.total_capacity, "Event created");
    Ok(Json(record))
}

/// Staff: reconcile an event's slot count
pub async fn set_capacity(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EventCapacityUpdate>,
) -> AppResult<Json<Event>> {
    let record = event::set_capacity(&state.pool, id, payload.total_capacity).await?;
    tracing::info!(event = id, capacity = record.total_capacity, "Capacity reconciled");
    Ok(Json(record))
}

/// Reserve an auto-assigned slot and open checkout
pub async fn reserve(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReserveRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let outcome = orchestrator::reserve_event(&state.pool, id, &payload).await?;
    let response = orchestrator::open_checkout(&state, &outcome).await?;
    Ok(Json(response))
}

/// Atomic multi-date reservation and checkout
pub async fn reserve_multi(
    State(state): State<ServerState>,
    Json(payload): Json<MultiReserveRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let outcome = orchestrator::reserve_multi(&state.pool, &payload).await?;
    let response = orchestrator::open_checkout(&state, &outcome).await?;
    Ok(Json(response))
}
