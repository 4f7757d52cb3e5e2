//! Hold expiry sweep
//!
//! A reservation hold is time-boxed: unpaid bookings older than the
//! configured window are deleted and their slots un-claimed, so
//! abandoned checkouts do not strand inventory. A capture notification
//! arriving after the reclaim matches no booking and is acknowledged by
//! the reconciler, consistent with the at-least-once delivery model.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use shared::error::AppResult;

use crate::core::ServerState;
use crate::db::repository::{booking, slot};

/// Reclaim expired holds; returns the number of bookings released
pub async fn sweep(pool: &SqlitePool, hold_minutes: i64) -> AppResult<usize> {
    let cutoff = Utc::now() - Duration::minutes(hold_minutes);

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| shared::error::AppError::database(e.to_string()))?;

    let expired = booking::find_expired_unpaid(&mut *tx, cutoff).await?;
    if expired.is_empty() {
        return Ok(0);
    }

    let ids: Vec<i64> = expired.iter().map(|b| b.id).collect();
    booking::delete_unpaid(&mut *tx, &ids).await?;
    for record in &expired {
        slot::unclaim(&mut *tx, record.slot_id).await?;
    }

    tx.commit()
        .await
        .map_err(|e| shared::error::AppError::database(e.to_string()))?;

    tracing::info!(count = expired.len(), "Reclaimed expired reservation holds");
    Ok(expired.len())
}

/// Periodic background worker around [`sweep`]
pub struct HoldExpiryWorker {
    state: ServerState,
    shutdown: CancellationToken,
}

impl HoldExpiryWorker {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    pub async fn run(self) {
        let period = std::time::Duration::from_secs(self.state.config.sweep_interval_secs);
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // skip immediate tick

        tracing::info!(
            hold_minutes = self.state.config.hold_expiry_minutes,
            period_secs = self.state.config.sweep_interval_secs,
            "HoldExpiryWorker started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("HoldExpiryWorker shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) =
                        sweep(&self.state.pool, self.state.config.hold_expiry_minutes).await
                    {
                        tracing::error!(error = %e, "Hold expiry sweep failed");
                    }
                }
            }
        }
    }
}
