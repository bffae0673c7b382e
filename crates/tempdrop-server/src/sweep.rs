//! Periodic purge of expired files

use crate::store::FileStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Handle to the background sweep task
pub struct SweepHandle {
    shutdown_token: CancellationToken,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the sweep and wait for the task to finish
    pub async fn shutdown(self) {
        self.shutdown_token.cancel();
        if let Err(e) = self.task.await {
            error!(error = %e, "Sweep task panicked");
        }
    }
}

/// Start sweeping expired files every `period`. The first sweep runs one
/// full period after startup.
pub fn spawn(store: Arc<dyn FileStore>, period: Duration) -> SweepHandle {
    let shutdown_token = CancellationToken::new();
    let token = shutdown_token.clone();

    let task = tokio::spawn(async move {
        info!(period_secs = period.as_secs(), "Starting expired file sweep");
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Expired file sweep stopped");
                    break;
                }
                _ = ticker.tick() => {
                    sweep_once(store.as_ref()).await;
                }
            }
        }
    });

    SweepHandle {
        shutdown_token,
        task,
    }
}

/// Delete everything that has expired. Errors are logged and swallowed so
/// the next tick simply tries again.
pub async fn sweep_once(store: &dyn FileStore) -> Option<u64> {
    match store.delete_expired_before(Utc::now()).await {
        Ok(0) => {
            debug!("Sweep found no expired files");
            Some(0)
        }
        Ok(count) => {
            info!(count, "Cleaned up expired files");
            Some(count)
        }
        Err(e) => {
            error!(error = %e, "Expired file sweep failed");
            None
        }
    }
}
