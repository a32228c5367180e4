//! HTTP client for the zonemap REST API.
//!
//! This module provides the `ZoneApiClient` struct implementing
//! [`ZoneSource`] against the zonemap backend.
//!
//! The fetch-all response wraps the zone list in an envelope whose `data`
//! object has carried the list under several different field names across
//! backend revisions. The candidates are tried in a fixed priority order and
//! the first one present wins, even when it holds an empty list; this is a
//! deliberate compatibility policy, not a bug.

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{NewZone, Zone, ZoneRecord};

use super::{FetchError, ZoneImage, ZoneSource};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fallback message when the server reports failure without one.
const UNKNOWN_API_ERROR: &str = "Unknown API error";

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    message: Option<String>,
    data: Option<ZoneListPayload>,
}

/// Alternative field names the backend has used for the zone list.
/// Resolution order: zones, content, zoneList, list, data, result.
#[derive(Debug, Default, Deserialize)]
struct ZoneListPayload {
    zones: Option<Vec<ZoneRecord>>,
    content: Option<Vec<ZoneRecord>>,
    #[serde(rename = "zoneList")]
    zone_list: Option<Vec<ZoneRecord>>,
    list: Option<Vec<ZoneRecord>>,
    data: Option<Vec<ZoneRecord>>,
    result: Option<Vec<ZoneRecord>>,
}

impl ZoneListPayload {
    /// First present candidate wins, even when it holds an empty list.
    fn into_records(self) -> Vec<ZoneRecord> {
        self.zones
            .or(self.content)
            .or(self.zone_list)
            .or(self.list)
            .or(self.data)
            .or(self.result)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct CreateEnvelope {
    success: bool,
    message: Option<String>,
    data: Option<ZoneRecord>,
}

/// Parse a fetch-all response body into domain zones.
///
/// `status` is the HTTP status code, used to label server-reported failures
/// that arrive inside a successful HTTP response.
fn parse_zone_list(status: u16, body: &str) -> Result<Vec<Zone>, FetchError> {
    let envelope: ListEnvelope = serde_json::from_str(body)?;

    if !envelope.success {
        return Err(FetchError::Server {
            code: status,
            message: envelope
                .message
                .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
        });
    }

    let payload = envelope.data.ok_or_else(|| FetchError::Server {
        code: status,
        message: envelope
            .message
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
    })?;

    Ok(payload
        .into_records()
        .into_iter()
        .map(ZoneRecord::into_zone)
        .collect())
}

// ============================================================================
// Client
// ============================================================================

/// API client for the zonemap backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ZoneApiClient {
    client: Client,
    base_url: String,
}

impl ZoneApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn zones_url(&self) -> String {
        format!("{}/zones", self.base_url)
    }

    /// Drop records whose coordinates fall outside valid degree ranges so
    /// nothing downstream has to re-check them.
    fn keep_valid(zones: Vec<Zone>) -> Vec<Zone> {
        zones
            .into_iter()
            .filter(|zone| {
                if zone.has_valid_coordinates() {
                    true
                } else {
                    warn!(
                        zone_id = zone.id,
                        latitude = zone.latitude,
                        longitude = zone.longitude,
                        "dropping zone with out-of-range coordinates"
                    );
                    false
                }
            })
            .collect()
    }
}

#[async_trait]
impl ZoneSource for ZoneApiClient {
    async fn fetch_all(&self) -> Result<Vec<Zone>, FetchError> {
        let url = self.zones_url();
        debug!(url = %url, "fetching all zones");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::from_status(status, &body));
        }

        let zones = parse_zone_list(status.as_u16(), &body)?;
        debug!(count = zones.len(), "fetched zones");

        Ok(Self::keep_valid(zones))
    }

    async fn create_zone(
        &self,
        spec: NewZone,
        image: Option<ZoneImage>,
    ) -> Result<Zone, FetchError> {
        let url = self.zones_url();
        debug!(url = %url, region = %spec.region, "creating zone");

        let metadata = serde_json::to_string(&spec)?;
        let mut form = multipart::Form::new().part(
            "zone",
            multipart::Part::text(metadata).mime_str("application/json")?,
        );

        if let Some(image) = image {
            form = form.part(
                "image",
                multipart::Part::bytes(image.bytes)
                    .file_name(image.file_name)
                    .mime_str(&image.mime_type)?,
            );
        }

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::from_status(status, &body));
        }

        let envelope: CreateEnvelope = serde_json::from_str(&body)?;
        match envelope.data {
            Some(record) if envelope.success => Ok(record.into_zone()),
            _ => Err(FetchError::Server {
                code: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
