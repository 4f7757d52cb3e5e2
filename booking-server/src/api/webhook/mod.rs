//! Payment webhook endpoint
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/stripe-webhook | POST | Signed provider notifications |
//!
//! The handler takes the raw body because the signature is computed over
//! the exact bytes on the wire; parsing happens only after verification.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};

use crate::core::ServerState;
use crate::reservations::reconciler::{self, WebhookEvent};
use crate::utils::{ApiResponse, AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stripe-webhook", post(receive))
}

pub async fn receive(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<()>>> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::bad_signature("Missing Stripe-Signature header"))?;

    state.stripe.verify_signature(&body, signature)?;

    let event = WebhookEvent::parse(&body)?;
    tracing::debug!(event_type = %event.event_type, "Webhook received");

    reconciler::process(&state, &event).await?;

    Ok(Json(ApiResponse::ok()))
}
