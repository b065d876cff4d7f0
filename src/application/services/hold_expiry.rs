//! Background task that cancels stale pending holds.
//!
//! Runs in a tokio::spawn loop, checking every `check_interval_secs` for
//! Pending reservations older than the hold TTL and cancelling them
//! through the engine, so the usual idempotency and notification rules
//! apply. Confirmed reservations are never touched.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::time::Duration;
use tracing::{info, warn};

use crate::application::availability::AvailabilityEngine;
use crate::domain::RepositoryProvider;
use crate::shared::shutdown::ShutdownSignal;

/// Start the hold-expiry background task.
pub fn start_hold_expiry_task(
    repos: Arc<dyn RepositoryProvider>,
    engine: Arc<AvailabilityEngine>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
    hold_ttl_minutes: i64,
) {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            hold_ttl_minutes, "Hold expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = expire_stale_holds(&repos, &engine, hold_ttl_minutes).await {
                        warn!(error = %e, "Hold expiry sweep error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Hold expiry task shutting down");
                    break;
                }
            }
        }

        info!("Hold expiry task stopped");
    });
}

async fn expire_stale_holds(
    repos: &Arc<dyn RepositoryProvider>,
    engine: &Arc<AvailabilityEngine>,
    hold_ttl_minutes: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let cutoff = Utc::now() - ChronoDuration::minutes(hold_ttl_minutes);
    let stale = repos.reservations().find_stale_pending(cutoff).await?;

    if stale.is_empty() {
        return Ok(());
    }

    info!(count = stale.len(), "Cancelling stale pending holds");

    for reservation in stale {
        if let Err(e) = engine.cancel(&reservation.id).await {
            warn!(reservation_id = %reservation.id, error = %e, "Failed to expire hold");
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
