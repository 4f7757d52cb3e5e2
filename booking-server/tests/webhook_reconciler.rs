//! Webhook reconciler integration tests
//!
//! Feeds provider notifications to the reconciler against a temporary
//! SQLite database and checks the state machine: attach, authorize,
//! capture, redelivery, out-of-order delivery, and captures that arrive
//! after a hold was reclaimed.

use booking_server::core::{Config, ServerState};
use booking_server::db::DbService;
use booking_server::db::repository::{booking, event, slot};
use booking_server::reservations::{expiry, orchestrator, reconciler};
use booking_server::reservations::reconciler::WebhookEvent;
use chrono::NaiveDate;
use serde_json::json;
use shared::error::ErrorCode;
use shared::models::{Booking, BookingState, EventCreate};
use shared::request::{MultiReserveEntry, MultiReserveRequest, ReserveRequest};
use tempfile::TempDir;

async fn setup() -> (ServerState, TempDir) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("bookings.db");
    let db = DbService::new(&db_path.to_string_lossy()).await.unwrap();

    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.stripe_secret_key = String::new();
    config.stripe_webhook_secret = String::new();
    config.sheets_webhook_url = None;

    let state = ServerState::with_pool(config, db.pool).unwrap();
    (state, dir)
}

async fn seed_event(state: &ServerState, date: &str, capacity: i64) -> shared::models::Event {
    event::create(
        &state.pool,
        EventCreate {
            name: "Night Market".to_string(),
            date: date.parse::<NaiveDate>().unwrap(),
            location: "Main Plaza".to_string(),
            description: None,
            price_cents: 3500,
            total_capacity: capacity,
        },
    )
    .await
    .unwrap()
}

fn general_request() -> ReserveRequest {
    serde_json::from_value(json!({
        "vendor_kind": "general",
        "first_name": "Ada",
        "last_name": "Chen",
        "email": "ada@example.com",
        "phone": "5551234567",
        "business_name": "Ada Ceramics",
        "products_selling": "Hand-thrown mugs"
    }))
    .unwrap()
}

async fn reserve_one(state: &ServerState, event_id: i64) -> Booking {
    orchestrator::reserve_event(&state.pool, event_id, &general_request())
        .await
        .unwrap()
        .bookings
        .remove(0)
}

fn session_completed(session_id: &str, intent: Option<&str>, metadata: serde_json::Value) -> WebhookEvent {
    let mut object = json!({"id": session_id, "metadata": metadata});
    if let Some(intent) = intent {
        object["payment_intent"] = json!(intent);
    }
    WebhookEvent::parse(
        json!({"type": "checkout.session.completed", "data": {"object": object}})
            .to_string()
            .as_bytes(),
    )
    .unwrap()
}

fn intent_event(event_type: &str, intent_id: &str, metadata: serde_json::Value) -> WebhookEvent {
    WebhookEvent::parse(
        json!({
            "type": event_type,
            "data": {"object": {"id": intent_id, "metadata": metadata}}
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap()
}

async fn fetch(state: &ServerState, id: i64) -> Booking {
    booking::find_by_id(&state.pool, id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_ordered_delivery_walks_the_state_machine() {
    let (state, _dir) = setup().await;
    let market = seed_event(&state, "2026-09-12", 2).await;
    let record = reserve_one(&state, market.id).await;
    assert_eq!(record.state(), BookingState::Created);

    let metadata = json!({"booking_id": record.id.to_string()});

    reconciler::process(&state, &session_completed("cs_1", None, metadata.clone()))
        .await
        .unwrap();
    assert_eq!(fetch(&state, record.id).await.state(), BookingState::SessionAttached);

    reconciler::process(
        &state,
        &intent_event("payment_intent.requires_capture", "pi_1", metadata.clone()),
    )
    .await
    .unwrap();
    assert_eq!(fetch(&state, record.id).await.state(), BookingState::Authorized);

    reconciler::process(
        &state,
        &intent_event("payment_intent.succeeded", "pi_1", metadata),
    )
    .await
    .unwrap();

    let captured = fetch(&state, record.id).await;
    assert_eq!(captured.state(), BookingState::Captured);
    assert!(captured.is_paid);

    // Capture commits inventory: the slot is retired, the counter drops
    let sold = slot::find_by_id(&state.pool, record.slot_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!sold.is_available);
    let after = event::find_by_id(&state.pool, market.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.available_count, 1);
}

#[tokio::test]
async fn test_capture_redelivery_is_idempotent() {
    let (state, _dir) = setup().await;
    let market = seed_event(&state, "2026-09-12", 1).await;
    let record = reserve_one(&state, market.id).await;
    let metadata = json!({"booking_id": record.id.to_string()});

    let capture = intent_event("payment_intent.succeeded", "pi_1", metadata);
    reconciler::process(&state, &capture).await.unwrap();
    reconciler::process(&state, &capture).await.unwrap();
    reconciler::process(&state, &capture).await.unwrap();

    // One decrement, not three
    let after = event::find_by_id(&state.pool, market.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.available_count, 0);
    assert!(fetch(&state, record.id).await.is_paid);
}

#[tokio::test]
async fn test_capture_before_session_resolves_by_metadata() {
    let (state, _dir) = setup().await;
    let market = seed_event(&state, "2026-09-12", 1).await;
    let record = reserve_one(&state, market.id).await;
    let metadata = json!({"booking_id": record.id.to_string()});

    // The capture arrives first; no session or intent is attached yet
    reconciler::process(
        &state,
        &intent_event("payment_intent.succeeded", "pi_9", metadata.clone()),
    )
    .await
    .unwrap();

    let captured = fetch(&state, record.id).await;
    assert!(captured.is_paid);
    assert_eq!(captured.payment_intent_id.as_deref(), Some("pi_9"));

    // The late session notification attaches without downgrading
    reconciler::process(&state, &session_completed("cs_9", Some("pi_9"), metadata))
        .await
        .unwrap();
    let settled = fetch(&state, record.id).await;
    assert_eq!(settled.state(), BookingState::Captured);
    assert_eq!(settled.checkout_session_id.as_deref(), Some("cs_9"));
}

#[tokio::test]
async fn test_batch_session_attaches_every_booking() {
    let (state, _dir) = setup().await;
    seed_event(&state, "2026-09-12", 1).await;
    seed_event(&state, "2026-09-13", 1).await;

    let outcome = orchestrator::reserve_multi(
        &state.pool,
        &MultiReserveRequest {
            reservations: vec![
                MultiReserveEntry {
                    event_date: "2026-09-12".parse().unwrap(),
                    reservation_data: general_request(),
                },
                MultiReserveEntry {
                    event_date: "2026-09-13".parse().unwrap(),
                    reservation_data: general_request(),
                },
            ],
        },
    )
    .await
    .unwrap();

    let joined = outcome
        .bookings
        .iter()
        .map(|b| b.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let metadata = json!({"booking_ids": joined, "vendor_kind": "general", "num_dates": "2"});

    reconciler::process(&state, &session_completed("cs_batch", None, metadata.clone()))
        .await
        .unwrap();
    for record in &outcome.bookings {
        assert_eq!(fetch(&state, record.id).await.state(), BookingState::SessionAttached);
    }

    reconciler::process(
        &state,
        &intent_event("payment_intent.succeeded", "pi_batch", metadata),
    )
    .await
    .unwrap();
    for record in &outcome.bookings {
        assert!(fetch(&state, record.id).await.is_paid);
    }
}

#[tokio::test]
async fn test_session_with_unknown_booking_errors() {
    let (state, _dir) = setup().await;
    seed_event(&state, "2026-09-12", 1).await;

    let err = reconciler::process(
        &state,
        &session_completed("cs_x", None, json!({"booking_id": "9999"})),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::CorrelationNotFound);
}

#[tokio::test]
async fn test_capture_after_reclaim_is_acknowledged() {
    let (state, _dir) = setup().await;
    let market = seed_event(&state, "2026-09-12", 1).await;
    let record = reserve_one(&state, market.id).await;
    let metadata = json!({"booking_id": record.id.to_string()});

    // The sweep reclaims the hold before the capture arrives
    assert_eq!(expiry::sweep(&state.pool, -1).await.unwrap(), 1);

    reconciler::process(
        &state,
        &intent_event("payment_intent.succeeded", "pi_late", metadata),
    )
    .await
    .unwrap();

    // Nothing was paid and inventory is untouched
    let after = event::find_by_id(&state.pool, market.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.available_count, 1);
}

#[tokio::test]
async fn test_unrelated_event_types_are_ignored() {
    let (state, _dir) = setup().await;

    reconciler::process(
        &state,
        &intent_event("charge.refunded", "ch_1", json!({})),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_notifications_without_correlation_are_acknowledged() {
    let (state, _dir) = setup().await;

    reconciler::process(&state, &session_completed("cs_empty", None, json!({})))
        .await
        .unwrap();
    reconciler::process(
        &state,
        &intent_event("payment_intent.requires_capture", "pi_empty", json!({})),
    )
    .await
    .unwrap();
}
