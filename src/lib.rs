//! zonemap core - offline-first zone discovery.
//!
//! This crate is the synchronization engine behind the zonemap clients:
//! it reconciles the remote zone API with a local persistent cache and
//! exposes a single continuously-updating result stream, filtered by
//! location.
//!
//! The flow is stale-while-revalidate: opening a query immediately yields
//! whatever the local store holds (even fully offline), kicks one background
//! fetch, and converges to the server's snapshot when it lands. A failed
//! fetch never takes cached data away; it only surfaces as an error when
//! there is nothing cached to show.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use zonemap_core::api::ZoneApiClient;
//! use zonemap_core::config::Config;
//! use zonemap_core::query::ZoneQueryService;
//! use zonemap_core::store::FileZoneStore;
//! use zonemap_core::sync::SyncCoordinator;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let store = Arc::new(FileZoneStore::open(&config.cache_dir()?)?);
//! let client = Arc::new(ZoneApiClient::new(config.api_base_url.clone())?);
//!
//! let mut coordinator = SyncCoordinator::new(store, client);
//! if let Some(timeout) = config.refresh_timeout() {
//!     coordinator = coordinator.with_refresh_timeout(timeout);
//! }
//! let coordinator = Arc::new(coordinator);
//! let service = ZoneQueryService::new(coordinator);
//!
//! let mut query = service.query(37.5, 127.0, 1000.0);
//! while let Some(result) = query.recv().await {
//!     match result {
//!         Ok(zones) => println!("{} zones nearby", zones.len()),
//!         Err(err) => eprintln!("fetch failed with empty cache: {err}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod geo;
pub mod models;
pub mod query;
pub mod store;
pub mod sync;

pub use api::{FetchError, ZoneApiClient, ZoneImage, ZoneSource};
pub use config::Config;
pub use models::{NewZone, Zone, ZoneRecord};
pub use query::{ZoneQuery, ZoneQueryService};
pub use store::{FileZoneStore, MemoryZoneStore, StorageFault, ZoneSnapshot, ZoneStore};
pub use sync::{SyncCoordinator, ZoneUpdates};
