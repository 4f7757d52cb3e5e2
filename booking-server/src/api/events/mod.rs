//! Event API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/events | GET | List events |
//! | /api/events | POST | Staff: create event + slots |
//! | /api/events/calendar | GET | Calendar view |
//! | /api/events/{id} | GET | Event detail incl. slots |
//! | /api/events/{id}/available-slots | GET | Claimable slots, paginated |
//! | /api/events/{id}/capacity | PUT | Staff: reconcile capacity |
//! | /api/events/{id}/reserve | POST | Auto-assign reserve + checkout |
//! | /api/events/multi/reserve | POST | Atomic multi-date reserve + checkout |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/calendar", get(handler::calendar))
        .route("/multi/reserve", post(handler::reserve_multi))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/available-slots", get(handler::available_slots))
        .route("/{id}/capacity", put(handler::set_capacity))
        .route("/{id}/reserve", post(handler::reserve))
}
