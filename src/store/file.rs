//! File-backed zone store.
//!
//! Zones are persisted as a single JSON document in the cache directory,
//! together with the time they were fetched. Commits write a temp file and
//! rename it over the old one, so a crash mid-write leaves the previous
//! snapshot intact; observers only ever see the in-memory state swapped
//! after the rename succeeds.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::models::Zone;

use super::{dedupe_by_id, StorageFault, ZoneSnapshot, ZoneStore};

/// Cache file name inside the cache directory.
const ZONES_FILE: &str = "zones.json";

/// Consider the persisted snapshot stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct CachedZones {
    fetched_at: DateTime<Utc>,
    zones: Vec<Zone>,
}

/// Zone store persisting to a JSON file under the cache directory.
pub struct FileZoneStore {
    path: PathBuf,
    state: watch::Sender<ZoneSnapshot>,
    /// Serializes file writes; the watch channel serializes the in-memory
    /// swap on its own.
    write_lock: Mutex<()>,
    fetched_at: RwLock<Option<DateTime<Utc>>>,
}

impl FileZoneStore {
    /// Open the store, loading any previously persisted snapshot.
    ///
    /// A corrupted cache file is a `StorageFault::Corrupt`; callers that
    /// prefer to start over can delete the file and reopen.
    pub fn open(cache_dir: &Path) -> Result<Self, StorageFault> {
        std::fs::create_dir_all(cache_dir).map_err(StorageFault::Write)?;
        let path = cache_dir.join(ZONES_FILE);

        let (zones, fetched_at) = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(StorageFault::Read)?;
            let cached: CachedZones = serde_json::from_str(&contents)?;
            debug!(count = cached.zones.len(), "loaded persisted zones");
            (dedupe_by_id(cached.zones), Some(cached.fetched_at))
        } else {
            (Vec::new(), None)
        };

        let (state, _) = watch::channel(ZoneSnapshot { version: 0, zones });

        Ok(Self {
            path,
            state,
            write_lock: Mutex::new(()),
            fetched_at: RwLock::new(fetched_at),
        })
    }

    /// When the persisted snapshot was last fetched from the server.
    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        *self.fetched_at.read().expect("fetched_at lock poisoned")
    }

    /// Whether the persisted snapshot is old enough to warrant a refresh.
    /// No snapshot at all counts as stale.
    pub fn is_stale(&self) -> bool {
        match self.last_fetched_at() {
            Some(fetched_at) => (Utc::now() - fetched_at).num_minutes() > CACHE_STALE_MINUTES,
            None => true,
        }
    }

    fn persist(&self, cached: &CachedZones) -> Result<(), StorageFault> {
        let contents = serde_json::to_string_pretty(cached)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(StorageFault::Write)?;
        std::fs::rename(&tmp, &self.path).map_err(StorageFault::Write)?;
        Ok(())
    }
}

#[async_trait]
impl ZoneStore for FileZoneStore {
    fn snapshot(&self) -> ZoneSnapshot {
        self.state.borrow().clone()
    }

    fn observe(&self) -> watch::Receiver<ZoneSnapshot> {
        self.state.subscribe()
    }

    async fn replace_all(&self, zones: Vec<Zone>) -> Result<(), StorageFault> {
        let _guard = self.write_lock.lock().await;

        let zones = dedupe_by_id(zones);
        let cached = CachedZones {
            fetched_at: Utc::now(),
            zones,
        };

        if let Err(fault) = self.persist(&cached) {
            warn!(error = %fault, "failed to persist zone snapshot");
            return Err(fault);
        }

        *self.fetched_at.write().expect("fetched_at lock poisoned") = Some(cached.fetched_at);
        self.state.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.zones = cached.zones;
        });
        debug!(version = self.state.borrow().version, "replaced persisted zone snapshot");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
