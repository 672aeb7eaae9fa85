//! Per-minute dispatch sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::{DeliveryAdapter, Scheduler};

/// Upper bound on a single delivery attempt.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// The recurring dispatch sweep.
///
/// Ticks on wall-clock minute boundaries, extracts the due prefix of
/// the queue, and hands each record to the delivery adapter. Delivery
/// is at-most-once: records are removed from the queue before delivery
/// is attempted, and failures are logged, never retried.
pub struct Sweep {
    scheduler: Arc<Scheduler>,
    adapter: Arc<dyn DeliveryAdapter>,
}

impl Sweep {
    /// Create a sweep over `scheduler`, delivering through `adapter`.
    pub fn new(scheduler: Arc<Scheduler>, adapter: Arc<dyn DeliveryAdapter>) -> Self {
        Self { scheduler, adapter }
    }

    /// Run the sweep loop until `shutdown_rx` flips to `true`.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("dispatch sweep starting");

        loop {
            if *shutdown_rx.borrow() {
                info!("dispatch sweep shutting down");
                break;
            }

            // Recomputed every iteration so per-tick processing time
            // cannot skew later ticks off the minute boundary.
            let pause = until_next_minute(Utc::now());

            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("dispatch sweep received shutdown signal");
                    }
                }
                _ = sleep(pause) => {
                    self.tick(Utc::now().timestamp()).await;
                }
            }
        }

        info!("dispatch sweep shut down");
    }

    /// One sweep pass: extract the due prefix and deliver each record
    /// independently.
    pub async fn tick(&self, now: i64) {
        let due = match self.scheduler.extract_due(now).await {
            Ok(due) => due,
            Err(e) => {
                error!(error = %e, "sweep failed to extract due records");
                return;
            }
        };

        if due.is_empty() {
            return;
        }

        let mut delivered = 0usize;
        for record in &due {
            match timeout(DELIVERY_TIMEOUT, self.adapter.deliver(record)).await {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    warn!(id = %record.id, error = %e, "delivery failed, dropping record");
                }
                Err(_) => {
                    warn!(id = %record.id, "delivery timed out, dropping record");
                }
            }
        }

        info!(due = due.len(), delivered, "sweep finished");
    }
}

/// Time remaining until the next wall-clock minute boundary.
fn until_next_minute(now: DateTime<Utc>) -> Duration {
    let next_boundary = (now.timestamp() / 60 + 1) * 60;
    let millis = next_boundary * 1000 - now.timestamp_millis();
    Duration::from_millis(millis.max(0) as u64)
}
