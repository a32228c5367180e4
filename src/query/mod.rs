//! Public query surface: synchronized zones filtered by location.
//!
//! `ZoneQueryService` is what the presentation layer talks to. It combines
//! the coordinator's snapshot stream with the geo filter, producing a
//! stream of ready-to-render zone lists.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;

use crate::api::FetchError;
use crate::geo;
use crate::models::Zone;
use crate::sync::{SyncCoordinator, ZoneUpdates};

/// Entry point for zone queries.
pub struct ZoneQueryService {
    coordinator: Arc<SyncCoordinator>,
}

impl ZoneQueryService {
    pub fn new(coordinator: Arc<SyncCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Open a continuously-updating query around the given origin.
    ///
    /// Each emission is the latest synchronized snapshot filtered to
    /// `radius_meters` of the origin; the (0.0, 0.0) origin sentinel
    /// disables filtering (see [`geo::filter_by_radius`]). A refresh
    /// failure over an empty cache comes through as a single `Err`.
    pub fn query(&self, origin_lat: f64, origin_lon: f64, radius_meters: f64) -> ZoneQuery {
        ZoneQuery {
            updates: self.coordinator.subscribe(),
            origin_lat,
            origin_lon,
            radius_meters,
        }
    }
}

/// Live query handle: a stream of filtered zone lists.
pub struct ZoneQuery {
    updates: ZoneUpdates,
    origin_lat: f64,
    origin_lon: f64,
    radius_meters: f64,
}

impl ZoneQuery {
    /// Next filtered result. `None` only once the store has gone away.
    pub async fn recv(&mut self) -> Option<Result<Vec<Zone>, FetchError>> {
        let emission = self.updates.recv().await?;
        Some(self.apply(emission))
    }

    fn apply(
        &self,
        emission: Result<crate::store::ZoneSnapshot, FetchError>,
    ) -> Result<Vec<Zone>, FetchError> {
        emission.map(|snapshot| {
            geo::filter_by_radius(
                &snapshot.zones,
                self.origin_lat,
                self.origin_lon,
                self.radius_meters,
            )
        })
    }
}

impl Stream for ZoneQuery {
    type Item = Result<Vec<Zone>, FetchError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.updates).poll_next(cx) {
            Poll::Ready(Some(emission)) => Poll::Ready(Some(self.apply(emission))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
