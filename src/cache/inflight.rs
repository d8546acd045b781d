//! Per-key miss coalescing.
//!
//! The first caller to miss on a key becomes the leader and performs the
//! fetch; callers arriving while it runs become followers and wait for the
//! leader's result instead of contacting the origin themselves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;

use crate::cache::key::CacheKey;

type Pending<T> = DashMap<CacheKey, (u64, watch::Receiver<Option<T>>)>;

/// Registry of fetches currently in progress.
pub struct InFlight<T> {
    pending: Arc<Pending<T>>,
    next_id: AtomicU64,
}

/// Role assigned to a caller by [`InFlight::join`].
pub enum Flight<T> {
    /// Caller must perform the fetch and publish through the guard.
    Leader(FlightGuard<T>),
    /// Another caller is fetching; wait on the receiver.
    Follower(Waiter<T>),
}

/// Held by the leader. Dropping it without publishing releases followers
/// with [`Abandoned`].
pub struct FlightGuard<T> {
    key: CacheKey,
    id: u64,
    tx: watch::Sender<Option<T>>,
    pending: Arc<Pending<T>>,
}

pub struct Waiter<T> {
    rx: watch::Receiver<Option<T>>,
}

/// The leader went away without publishing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("in-flight fetch ended without a result")]
pub struct Abandoned;

impl<T: Clone> InFlight<T> {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register interest in `key`.
    pub fn join(&self, key: CacheKey) -> Flight<T> {
        match self.pending.entry(key) {
            Entry::Occupied(entry) => Flight::Follower(Waiter {
                rx: entry.get().1.clone(),
            }),
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = watch::channel(None);
                entry.insert((id, rx));
                Flight::Leader(FlightGuard {
                    key,
                    id,
                    tx,
                    pending: Arc::clone(&self.pending),
                })
            }
        }
    }

    /// Number of keys currently being fetched.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T: Clone> Default for InFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FlightGuard<T> {
    /// Hand the result to every follower and retire the key.
    pub fn complete(self, value: T) {
        self.retire();
        self.tx.send_replace(Some(value));
    }

    // A newer leader may already own the slot; only our own registration goes.
    fn retire(&self) {
        self.pending.remove_if(&self.key, |_, (id, _)| *id == self.id);
    }
}

impl<T> Drop for FlightGuard<T> {
    fn drop(&mut self) {
        self.retire();
    }
}

impl<T: Clone> Waiter<T> {
    /// Wait for the leader's result.
    pub async fn wait(mut self) -> Result<T, Abandoned> {
        let value = self.rx.wait_for(Option::is_some).await.map_err(|_| Abandoned)?;
        value.clone().ok_or(Abandoned)
    }
}
