//! Booth slot API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/booth-slots/{id} | GET | Slot detail |
//! | /api/booth-slots/{id}/reserve | POST | Reserve a specific slot + checkout |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/booth-slots", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/reserve", post(handler::reserve))
}
