//! ExpirySweeper - Background loop that runs the subscription expiry sweep.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 1h | Time between sweeps; the first runs immediately |
//!
//! ## Failure handling
//!
//! A failed sweep is logged and retried on the next tick. The loop only
//! ends on the shutdown signal or when the signal's sender is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::application::{ExpireSubscriptionsCommand, ExpireSubscriptionsHandler};
use crate::domain::foundation::Timestamp;

pub struct ExpirySweeper {
    handler: Arc<ExpireSubscriptionsHandler>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(handler: Arc<ExpireSubscriptionsHandler>, interval: Duration) -> Self {
        Self { handler, interval }
    }

    /// Run the sweep loop until shutdown is signalled.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.interval.as_secs(), "Expiry sweeper started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Expiry sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Run a single sweep, returning how many subscriptions expired.
    ///
    /// Errors are logged and reported as zero.
    pub async fn sweep_once(&self) -> usize {
        let cmd = ExpireSubscriptionsCommand {
            now: Timestamp::now(),
        };
        match self.handler.handle(cmd).await {
            Ok(result) => result.expired_count,
            Err(e) => {
                warn!(
                    error = %e,
                    retryable = e.is_retryable(),
                    "Subscription expiry sweep failed"
                );
                0
            }
        }
    }
}
