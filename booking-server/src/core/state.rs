use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::services::{SheetsSync, StripeService};
use crate::utils::AppResult;

/// Server state: shared handles for every request
///
/// Cloning is cheap: the pool and services are reference-counted.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Immutable configuration |
/// | pool | SqlitePool | SQLite connection pool (WAL) |
/// | stripe | Arc<StripeService> | Stripe Checkout API client |
/// | sheets | Arc<SheetsSync> | Best-effort spreadsheet mirror |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub stripe: Arc<StripeService>,
    pub sheets: Arc<SheetsSync>,
}

impl ServerState {
    /// Initialize server state
    ///
    /// 1. Ensure the work_dir structure exists
    /// 2. Open the database (work_dir/database/bookings.db) and run migrations
    /// 3. Build the Stripe and spreadsheet clients
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| crate::utils::AppError::internal(format!("Work dir setup failed: {e}")))?;

        let db_path = config.database_dir().join("bookings.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Self::with_pool(config.clone(), db_service.pool)
    }

    /// Build state around an existing pool (used by tests with a tempdir database)
    pub fn with_pool(config: Config, pool: SqlitePool) -> AppResult<Self> {
        let stripe = Arc::new(StripeService::new(
            config.stripe_secret_key.clone(),
            config.stripe_webhook_secret.clone(),
        )?);
        let sheets = Arc::new(SheetsSync::new(config.sheets_webhook_url.clone())?);

        Ok(Self {
            config,
            pool,
            stripe,
            sheets,
        })
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
