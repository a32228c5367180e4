//! Stale-while-revalidate synchronization between the remote source and
//! the local store.

pub mod coordinator;

pub use coordinator::{SyncCoordinator, ZoneUpdates};
