//! External service clients

pub mod sheets;
pub mod stripe;

pub use sheets::{SheetsRow, SheetsSync};
pub use stripe::{CheckoutParams, CheckoutSession, StripeService};
