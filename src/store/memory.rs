//! In-memory zone store.
//!
//! The watch channel holds the snapshot itself: `send_modify` swaps the
//! whole zone list under the channel's internal lock, so observers see
//! either the old or the new snapshot and never an intermediate state.
//! That same lock serializes concurrent `replace_all` calls.

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::models::Zone;

use super::{dedupe_by_id, StorageFault, ZoneSnapshot, ZoneStore};

/// In-process zone store. Cheap to construct, nothing persisted.
pub struct MemoryZoneStore {
    state: watch::Sender<ZoneSnapshot>,
}

impl MemoryZoneStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ZoneSnapshot::default());
        Self { state }
    }

    /// Start with pre-seeded contents, as if a previous run had cached them.
    pub fn with_zones(zones: Vec<Zone>) -> Self {
        let (state, _) = watch::channel(ZoneSnapshot {
            version: 1,
            zones: dedupe_by_id(zones),
        });
        Self { state }
    }
}

impl Default for MemoryZoneStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ZoneStore for MemoryZoneStore {
    fn snapshot(&self) -> ZoneSnapshot {
        self.state.borrow().clone()
    }

    fn observe(&self) -> watch::Receiver<ZoneSnapshot> {
        self.state.subscribe()
    }

    async fn replace_all(&self, zones: Vec<Zone>) -> Result<(), StorageFault> {
        let zones = dedupe_by_id(zones);
        self.state.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.zones = zones;
        });
        debug!(version = self.state.borrow().version, "replaced zone snapshot");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ZoneRecord;

    fn zone(id: i64) -> Zone {
        serde_json::from_str::<ZoneRecord>(&format!(
            r#"{{"id": {id}, "region": "서울", "type": "station", "latitude": 37.5, "longitude": 127.0}}"#
        ))
        .unwrap()
        .into_zone()
    }

    fn ids(snapshot: &ZoneSnapshot) -> Vec<i64> {
        snapshot.zones.iter().map(|z| z.id).collect()
    }

    #[tokio::test]
    async fn test_replace_then_snapshot_exact_contents() {
        let store = MemoryZoneStore::with_zones(vec![zone(1), zone(2)]);

        store
            .replace_all(vec![zone(3), zone(4), zone(5)])
            .await
            .unwrap();

        // Total replacement: nothing survives from before.
        assert_eq!(ids(&store.snapshot()), vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_dropped() {
        let store = MemoryZoneStore::new();
        store.replace_all(vec![zone(1), zone(1), zone(2)]).await.unwrap();
        assert_eq!(ids(&store.snapshot()), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_observer_sees_current_snapshot_on_subscribe() {
        let store = MemoryZoneStore::with_zones(vec![zone(1)]);
        let rx = store.observe();
        assert_eq!(ids(&rx.borrow()), vec![1]);
    }

    #[tokio::test]
    async fn test_observer_never_sees_empty_between_nonempty_states() {
        let store = MemoryZoneStore::with_zones(vec![zone(1)]);
        let mut rx = store.observe();

        store.replace_all(vec![zone(2), zone(3)]).await.unwrap();

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert!(!seen.is_empty(), "observed an intermediate empty snapshot");
        assert_eq!(ids(&seen), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_concurrent_replaces_are_linearized() {
        let store = std::sync::Arc::new(MemoryZoneStore::with_zones(vec![zone(0)]));
        let mut rx = store.observe();

        let writers: Vec<_> = (1..=10)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move { store.replace_all(vec![zone(i)]).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        // Every observed state is fully committed and versions only grow.
        let mut last_version = 0;
        loop {
            let snapshot = rx.borrow_and_update().clone();
            assert!(!snapshot.is_empty());
            assert!(snapshot.version > last_version || last_version == 0);
            last_version = snapshot.version;
            if rx.has_changed().map(|c| !c).unwrap_or(true) {
                break;
            }
        }
        assert_eq!(store.snapshot().version, 11);
    }
}
