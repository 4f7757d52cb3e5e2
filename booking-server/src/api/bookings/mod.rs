//! Booking API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/bookings/status/{session_id} | GET | Post-checkout booking status |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/status/{session_id}", get(handler::status))
}
