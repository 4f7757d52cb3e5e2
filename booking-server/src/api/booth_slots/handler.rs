//! Booth Slot API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::slot;
use crate::reservations::orchestrator;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::BoothSlot;
use shared::request::ReserveRequest;
use shared::response::CheckoutResponse;

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BoothSlot>> {
    let record = slot::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::SlotNotFound, format!("Slot {id} not found"))
    })?;
    Ok(Json(record))
}

/// Reserve a specific slot and open checkout
pub async fn reserve(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReserveRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let outcome = orchestrator::reserve_slot(&state.pool, id, &payload).await?;
    let response = orchestrator::open_checkout(&state, &outcome).await?;
    Ok(Json(response))
}
