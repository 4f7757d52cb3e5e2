use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/booking | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP service port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | FRONTEND_BASE_URL | http://localhost:5173 | Base URL for checkout redirects |
/// | STRIPE_SECRET_KEY | (empty) | Stripe API secret key |
/// | STRIPE_WEBHOOK_SECRET | (empty) | Stripe webhook endpoint secret |
/// | SHEETS_WEBHOOK_URL | (unset) | Spreadsheet sync webhook; sync disabled when unset |
/// | HOLD_EXPIRY_MINUTES | 30 | Unpaid reservation hold window |
/// | SWEEP_INTERVAL_SECS | 60 | Hold expiry sweep period |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/booking HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API service port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Frontend base URL (success/cancel redirect targets)
    pub frontend_base_url: String,
    /// Stripe API secret key
    pub stripe_secret_key: String,
    /// Stripe webhook endpoint secret (whsec_...)
    pub stripe_webhook_secret: String,
    /// Spreadsheet webhook URL; sync is disabled when None
    pub sheets_webhook_url: Option<String>,
    /// Minutes an unpaid reservation holds its slot before the sweep reclaims it
    pub hold_expiry_minutes: i64,
    /// Hold expiry sweep interval in seconds
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/booking".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            frontend_base_url: std::env::var("FRONTEND_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            sheets_webhook_url: std::env::var("SHEETS_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            hold_expiry_minutes: std::env::var("HOLD_EXPIRY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Override work_dir and port, commonly for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Database directory under the working directory
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Ensure the work_dir structure exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("logs"))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Checkout success redirect, with the session id placeholder Stripe expands
    pub fn success_url(&self) -> String {
        format!(
            "{}/booking/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.frontend_base_url
        )
    }

    /// Checkout cancel redirect
    pub fn cancel_url(&self) -> String {
        format!("{}/booking/cancelled", self.frontend_base_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/booking-test", 8080);
        assert_eq!(config.work_dir, "/tmp/booking-test");
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn test_redirect_urls() {
        let mut config = Config::with_overrides("/tmp/booking-test", 8080);
        config.frontend_base_url = "https://market.example.com".to_string();
        assert_eq!(
            config.success_url(),
            "https://market.example.com/booking/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            config.cancel_url(),
            "https://market.example.com/booking/cancelled"
        );
    }
}
