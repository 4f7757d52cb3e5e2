//! Data models
//!
//! Shared between booking-server and any future clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod booking;
pub mod event;
pub mod slot;

// Re-exports
pub use booking::*;
pub use event::*;
pub use slot::*;
