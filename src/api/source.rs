//! The remote-source seam.
//!
//! `ZoneSource` abstracts over where authoritative zone data comes from so
//! the sync layer can be driven by the real HTTP client or by a fake in
//! tests.

use async_trait::async_trait;

use crate::models::{NewZone, Zone};

use super::FetchError;

/// Wildcard mime for uploads whose concrete format is unknown.
const ANY_IMAGE_MIME: &str = "image/*";

/// Binary image payload attached to a zone creation request.
#[derive(Debug, Clone)]
pub struct ZoneImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    /// Mime type of the part; the backend accepts any image format, so the
    /// default stays wildcard rather than guessing from the bytes.
    pub mime_type: String,
}

impl ZoneImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "zone_image.jpg".to_string(),
            mime_type: ANY_IMAGE_MIME.to_string(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}


/// A stateless remote source of zone data.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Fetch the full authoritative zone list.
    async fn fetch_all(&self) -> Result<Vec<Zone>, FetchError>;

    /// Create a new zone. One-shot: no retry, no caching.
    async fn create_zone(
        &self,
        spec: NewZone,
        image: Option<ZoneImage>,
    ) -> Result<Zone, FetchError>;
}
