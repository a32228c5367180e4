//! Data models for zonemap entities.
//!
//! This module contains the data structures shared across the crate:
//!
//! - `Zone`: a stored geo-tagged point of interest
//! - `ZoneRecord`: the wire-format record as the API sends it
//! - `NewZone`: metadata for a zone creation request

pub mod zone;

pub use zone::{NewZone, Zone, ZoneRecord, UNKNOWN_REGION, UNKNOWN_TYPE};
