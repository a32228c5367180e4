//! The stale-while-revalidate coordinator.
//!
//! Each subscription immediately surfaces the store's current snapshot and
//! triggers exactly one background fetch. A successful fetch commits into
//! the store, which fans the new snapshot out to every subscriber; the
//! coordinator itself never emits fresh data directly. A failed fetch is
//! swallowed when cached zones exist (availability over freshness) and
//! surfaced as a single error emission when the cache is empty.
//!
//! There is no retry or polling loop: a new subscription, or an explicit
//! [`SyncCoordinator::refresh`], is required to try again.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use anyhow::Result;
use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::api::{FetchError, ZoneSource};
use crate::store::{ZoneSnapshot, ZoneStore};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for a subscription's update channel.
const UPDATE_CHANNEL_BUFFER: usize = 16;

/// Default bound on a background refresh.
/// Matches the HTTP client timeout so a degraded network cannot leave a
/// subscription refreshing forever.
const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 30;

/// Orchestrates refreshes of the local store from the remote source.
///
/// Owns nothing global: construct one with the store and source it should
/// reconcile and share it via `Arc` as needed.
pub struct SyncCoordinator {
    store: Arc<dyn ZoneStore>,
    source: Arc<dyn ZoneSource>,
    refresh_timeout: Duration,
}

impl SyncCoordinator {
    pub fn new(store: Arc<dyn ZoneStore>, source: Arc<dyn ZoneSource>) -> Self {
        Self {
            store,
            source,
            refresh_timeout: Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS),
        }
    }

    /// Override the refresh deadline. Mostly useful in tests.
    pub fn with_refresh_timeout(mut self, refresh_timeout: Duration) -> Self {
        self.refresh_timeout = refresh_timeout;
        self
    }

    /// Current cached snapshot, no network involved.
    pub fn snapshot(&self) -> ZoneSnapshot {
        self.store.snapshot()
    }

    /// Open a live subscription.
    ///
    /// The subscription first yields the current cached snapshot, then one
    /// update per committed store change. Dropping the handle cancels the
    /// in-flight fetch; a commit that has already started always completes.
    pub fn subscribe(&self) -> ZoneUpdates {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_BUFFER);

        let mut observed = self.store.observe();
        let forward_tx = tx.clone();
        let forwarder = tokio::spawn(async move {
            loop {
                let snapshot = observed.borrow_and_update().clone();
                if forward_tx.send(Ok(snapshot)).await.is_err() {
                    break; // subscriber gone
                }
                if observed.changed().await.is_err() {
                    break; // store gone
                }
            }
        });

        let store = Arc::clone(&self.store);
        let source = Arc::clone(&self.source);
        let refresh_timeout = self.refresh_timeout;
        let refresher = tokio::spawn(async move {
            match fetch_bounded(&*source, refresh_timeout).await {
                Ok(zones) => {
                    debug!(count = zones.len(), "refresh succeeded, committing snapshot");
                    // Detached commit: aborting this task must not leave a
                    // partially-applied replace behind.
                    let commit = tokio::spawn(async move {
                        if let Err(fault) = store.replace_all(zones).await {
                            error!(error = %fault, "failed to commit refreshed zones");
                        }
                    });
                    let _ = commit.await;
                }
                Err(err) if store.snapshot().is_empty() => {
                    warn!(error = %err, "refresh failed with no cached zones, surfacing error");
                    let _ = tx.send(Err(err)).await;
                }
                Err(err) => {
                    // Availability over freshness: keep serving the cache.
                    // Only telemetry sees this failure.
                    warn!(error = %err, "refresh failed, keeping cached zones");
                }
            }
        });

        ZoneUpdates {
            rx,
            forwarder,
            refresher,
        }
    }

    /// Explicit re-trigger: fetch once and commit on success.
    ///
    /// Unlike a subscription refresh the error is returned to the caller
    /// regardless of cache contents; a storage fault during the commit also
    /// surfaces here.
    pub async fn refresh(&self) -> Result<()> {
        let zones = fetch_bounded(&*self.source, self.refresh_timeout).await?;

        // Commit in a detached task so caller cancellation cannot interrupt
        // a replace already underway.
        let store = Arc::clone(&self.store);
        let commit = tokio::spawn(async move { store.replace_all(zones).await });
        commit.await??;
        Ok(())
    }
}

/// Run `fetch_all` under the refresh deadline, folding a timeout into the
/// network error taxonomy.
async fn fetch_bounded(
    source: &dyn ZoneSource,
    deadline: Duration,
) -> Result<Vec<crate::models::Zone>, FetchError> {
    match tokio::time::timeout(deadline, source.fetch_all()).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Network("zone refresh timed out".to_string())),
    }
}

/// Live subscription handle: a stream of cached-then-fresh snapshots.
///
/// Yields `Ok(snapshot)` per committed store state and at most one
/// `Err(FetchError)` (only when a refresh fails over an empty cache). The
/// stream stays open after an error; the store feed keeps flowing.
pub struct ZoneUpdates {
    rx: mpsc::Receiver<Result<ZoneSnapshot, FetchError>>,
    forwarder: JoinHandle<()>,
    refresher: JoinHandle<()>,
}

impl ZoneUpdates {
    /// Next emission. `None` only once the store itself has gone away.
    pub async fn recv(&mut self) -> Option<Result<ZoneSnapshot, FetchError>> {
        self.rx.recv().await
    }
}

impl Stream for ZoneUpdates {
    type Item = Result<ZoneSnapshot, FetchError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for ZoneUpdates {
    fn drop(&mut self) {
        // Cancels the in-flight fetch; a commit already spawned is detached
        // and finishes on its own.
        self.forwarder.abort();
        self.refresher.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================
