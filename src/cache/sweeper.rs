//! Periodic expiry sweep.
//!
//! # Responsibilities
//! - Wake on a fixed interval
//! - Remove entries whose TTL has elapsed
//! - Stop when shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::cache::store::CacheStore;
use crate::observability::metrics;

pub struct Sweeper<V> {
    store: Arc<CacheStore<V>>,
    interval: Duration,
}

impl<V: Send + Sync + 'static> Sweeper<V> {
    pub fn new(store: Arc<CacheStore<V>>, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval = ?self.interval, "Cache sweeper starting");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; nothing can have expired yet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.store.purge_expired();
                    metrics::record_sweep(removed);
                    if removed > 0 {
                        tracing::debug!(removed, remaining = self.store.len(), "Swept expired cache entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Cache sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run on the current runtime until shutdown.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
