//! Local zone storage.
//!
//! The store is the single source of truth for what callers see: refreshes
//! commit into it, and every subscriber observes committed snapshots only.
//! Two implementations are provided: `MemoryZoneStore` for tests and
//! ephemeral use, and `FileZoneStore` persisting JSON to the cache
//! directory.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::warn;

use crate::models::Zone;

pub use file::FileZoneStore;
pub use memory::MemoryZoneStore;

/// Fatal persistence failure. Not retried by this layer.
#[derive(Error, Debug)]
pub enum StorageFault {
    #[error("failed to read zone cache: {0}")]
    Read(std::io::Error),

    #[error("failed to write zone cache: {0}")]
    Write(std::io::Error),

    #[error("zone cache is corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The full ordered set of zones held by a store at one instant.
///
/// `version` increases by one per committed change; subscribers can use it
/// to confirm they never see reordered or duplicate deliveries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneSnapshot {
    pub version: u64,
    pub zones: Vec<Zone>,
}

impl ZoneSnapshot {
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }
}

/// Durable keyed collection of zones, queryable as a snapshot and
/// observable as a feed of snapshots.
#[async_trait]
pub trait ZoneStore: Send + Sync {
    /// Current full contents. Never blocks on network.
    fn snapshot(&self) -> ZoneSnapshot;

    /// Observe committed snapshots. A new subscriber immediately sees the
    /// current snapshot; intermediate versions may be coalesced but a
    /// partially-applied state is never visible.
    fn observe(&self) -> watch::Receiver<ZoneSnapshot>;

    /// Atomically discard all existing records and install `zones`.
    /// Writers are serialized; the last committed write wins.
    async fn replace_all(&self, zones: Vec<Zone>) -> Result<(), StorageFault>;
}

/// Enforce id uniqueness, keeping the first occurrence and preserving order.
/// The server should never send duplicates; if it does, later ones lose.
pub(crate) fn dedupe_by_id(zones: Vec<Zone>) -> Vec<Zone> {
    let mut seen = std::collections::HashSet::with_capacity(zones.len());
    let mut unique = Vec::with_capacity(zones.len());
    for zone in zones {
        if seen.insert(zone.id) {
            unique.push(zone);
        } else {
            warn!(zone_id = zone.id, "dropping duplicate zone id from snapshot");
        }
    }
    unique
}
