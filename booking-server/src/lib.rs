//! Booth Booking Server
//!
//! Reservation backend for recurring vendor markets: vendors browse
//! events, reserve a booth, and pay through a hosted Stripe Checkout
//! flow; payment webhooks drive the booking state machine and commit
//! inventory; paid bookings are mirrored to a staff spreadsheet.
//!
//! # Module structure
//!
//! ```text
//! booking-server/src/
//! ├── core/          # Config, state, server, background tasks
//! ├── db/            # SQLite pool + repositories
//! ├── reservations/  # Orchestrator, pricing, webhook reconciler, hold expiry
//! ├── services/      # Stripe checkout client, spreadsheet sync
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logger, validation helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod reservations;
pub mod services;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____              __  __
   / __ )____  ____  / /_/ /_
  / __  / __ \/ __ \/ __/ __ \
 / /_/ / /_/ / /_/ / /_/ / / /
/_____/\____/\____/\__/_/ /_/
    "#
    );
}
