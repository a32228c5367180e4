//! Domain model for zones.
//!
//! A `Zone` is a geo-tagged point of interest as stored locally and as
//! returned by the zonemap API. Wire-format records (`ZoneRecord`) are
//! converted at the API boundary so that stored zones always carry a
//! non-empty region and type.

use serde::{Deserialize, Serialize};

/// Placeholder substituted when the server omits a zone's region.
pub const UNKNOWN_REGION: &str = "Unknown Region";

/// Placeholder substituted when the server omits a zone's type.
pub const UNKNOWN_TYPE: &str = "Unknown Type";

/// A geo-located point-of-interest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub region: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub subtype: Option<String>,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub size: Option<String>,
    pub address: Option<String>,
    pub user: Option<String>,
    pub image: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl Zone {
    /// Whether the coordinates are plausible degrees.
    /// Records failing this are dropped at the API boundary, so anything
    /// reaching the store or the geo filter satisfies it.
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Raw zone record as the server sends it.
///
/// `region` and `type` are nullable on the wire; [`ZoneRecord::into_zone`]
/// substitutes fixed placeholders so stored records never carry an absent
/// region or type.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneRecord {
    pub id: i64,
    pub region: Option<String>,
    #[serde(rename = "type")]
    pub zone_type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl ZoneRecord {
    /// Convert to the domain model, substituting placeholders for missing
    /// region/type.
    pub fn into_zone(self) -> Zone {
        Zone {
            id: self.id,
            region: self.region.unwrap_or_else(|| UNKNOWN_REGION.to_string()),
            zone_type: self.zone_type.unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            subtype: self.subtype,
            description: self.description,
            latitude: self.latitude,
            longitude: self.longitude,
            size: self.size,
            address: self.address,
            user: self.user,
            image: self.image,
            name: self.name,
            image_url: self.image_url,
        }
    }
}

/// Metadata for a zone creation request.
///
/// Serialized as the JSON part of the multipart create-zone request. The
/// `image` field is always `null` on the wire; the binary image travels as a
/// separate multipart part.
#[derive(Debug, Clone, Serialize)]
pub struct NewZone {
    pub region: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub subtype: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub size: String,
    pub address: String,
    pub user: String,
    pub image: Option<String>,
}

/// Default subtype for newly reported zones ("outdoor").
const DEFAULT_SUBTYPE: &str = "실외";

/// Default size category for newly reported zones ("medium").
const DEFAULT_SIZE: &str = "중형";

impl NewZone {
    /// Build creation metadata from a user report.
    ///
    /// The region is the first whitespace-separated token of the address
    /// (province/city in the standard address format); the display name maps
    /// to the description field server-side.
    pub fn from_report(
        name: &str,
        address: &str,
        zone_type: &str,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        let region = address
            .split_whitespace()
            .next()
            .unwrap_or("Unknown")
            .to_string();

        Self {
            region,
            zone_type: zone_type.to_string(),
            subtype: DEFAULT_SUBTYPE.to_string(),
            description: name.to_string(),
            latitude,
            longitude,
            size: DEFAULT_SIZE.to_string(),
            address: address.to_string(),
            user: user_id.to_string(),
            image: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_substitutes_placeholders() {
        let record: ZoneRecord = serde_json::from_str(
            r#"{"id": 7, "region": null, "type": null, "latitude": 37.5, "longitude": 127.0}"#,
        )
        .unwrap();

        let zone = record.into_zone();
        assert_eq!(zone.region, UNKNOWN_REGION);
        assert_eq!(zone.zone_type, UNKNOWN_TYPE);
    }

    #[test]
    fn test_record_keeps_present_fields() {
        let record: ZoneRecord = serde_json::from_str(
            r#"{
                "id": 1,
                "region": "서울",
                "type": "station",
                "subtype": "실외",
                "latitude": 37.5,
                "longitude": 127.0,
                "imageUrl": "https://example.com/z.jpg"
            }"#,
        )
        .unwrap();

        let zone = record.into_zone();
        assert_eq!(zone.region, "서울");
        assert_eq!(zone.zone_type, "station");
        assert_eq!(zone.subtype.as_deref(), Some("실외"));
        assert_eq!(zone.image_url.as_deref(), Some("https://example.com/z.jpg"));
    }

    #[test]
    fn test_coordinate_validation() {
        let mut zone = ZoneRecord {
            id: 1,
            region: None,
            zone_type: None,
            subtype: None,
            description: None,
            latitude: 37.5,
            longitude: 127.0,
            size: None,
            address: None,
            user: None,
            image: None,
            name: None,
            image_url: None,
        }
        .into_zone();

        assert!(zone.has_valid_coordinates());
        zone.latitude = 91.0;
        assert!(!zone.has_valid_coordinates());
        zone.latitude = 37.5;
        zone.longitude = -180.5;
        assert!(!zone.has_valid_coordinates());
    }

    #[test]
    fn test_new_zone_region_from_address() {
        let new = NewZone::from_report(
            "역삼역 부근",
            "서울특별시 강남구 역삼동 123",
            "general",
            "user-1",
            37.5,
            127.03,
        );
        assert_eq!(new.region, "서울특별시");
        assert_eq!(new.description, "역삼역 부근");
        assert!(new.image.is_none());

        let json = serde_json::to_value(&new).unwrap();
        assert!(json.get("type").is_some());
        assert!(json["image"].is_null());
    }
}
