//! REST API client module for the zonemap backend.
//!
//! This module provides the `ZoneSource` trait describing the remote data
//! source and the `ZoneApiClient` implementation talking to the zonemap
//! API over HTTP.

pub mod client;
pub mod error;
pub mod source;

pub use client::ZoneApiClient;
pub use error::FetchError;
pub use source::{ZoneImage, ZoneSource};
