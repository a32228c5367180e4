//! Great-circle distance math and radius filtering.
//!
//! Pure functions; nothing here blocks or suspends. Distances use the
//! haversine formula on a sphere with the Earth mean radius.

use crate::models::Zone;

/// Earth mean radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in meters.
///
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`,
/// `d = 2·R·atan2(√a, √(1−a))`.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Keep the zones within `radius_meters` of the origin. Inclusive boundary.
///
/// Origin (0.0, 0.0) is the client's "no location available" sentinel:
/// filtering is skipped entirely and every zone is returned, regardless of
/// radius. This conflates the sentinel with the literal coordinate in the
/// Gulf of Guinea; no legitimate zones exist there, and changing it would
/// change observable behavior for location-less clients.
pub fn filter_by_radius(
    zones: &[Zone],
    origin_lat: f64,
    origin_lon: f64,
    radius_meters: f64,
) -> Vec<Zone> {
    if origin_lat == 0.0 && origin_lon == 0.0 {
        return zones.to_vec();
    }

    zones
        .iter()
        .filter(|zone| {
            distance_meters(origin_lat, origin_lon, zone.latitude, zone.longitude)
                <= radius_meters
        })
        .cloned()
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_at(id: i64, latitude: f64, longitude: f64) -> Zone {
        Zone {
            id,
            region: "서울".to_string(),
            zone_type: "station".to_string(),
            subtype: None,
            description: None,
            latitude,
            longitude,
            size: None,
            address: None,
            user: None,
            image: None,
            name: None,
            image_url: None,
        }
    }

    /// Latitude `meters` north of `lat`; moving along a meridian makes the
    /// haversine distance exactly `meters` up to floating error.
    fn lat_offset(lat: f64, meters: f64) -> f64 {
        lat + (meters / EARTH_RADIUS_METERS).to_degrees()
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_meters(37.5, 127.0, 37.5, 127.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let d1 = distance_meters(37.5, 127.0, 35.18, 129.08);
        let d2 = distance_meters(35.18, 129.08, 37.5, 127.0);
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_known_distance_along_meridian() {
        let d = distance_meters(37.5, 127.0, lat_offset(37.5, 900.0), 127.0);
        assert!((d - 900.0).abs() < 0.5, "expected ~900m, got {d}");
    }

    #[test]
    fn test_radius_filter_keeps_near_drops_far() {
        let near = zone_at(1, lat_offset(37.5, 900.0), 127.0);
        let far = zone_at(2, lat_offset(37.5, 1100.0), 127.0);

        let kept = filter_by_radius(&[near.clone(), far], 37.5, 127.0, 1000.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, near.id);
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        // Distance to self is exactly zero, so radius zero must keep it.
        let zone = zone_at(1, 37.5, 127.0);
        let kept = filter_by_radius(&[zone], 37.5, 127.0, 0.0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_origin_sentinel_skips_filtering() {
        let zones: Vec<Zone> = (0..5)
            .map(|i| zone_at(i, 37.5 + i as f64, 127.0 + i as f64))
            .collect();

        let kept = filter_by_radius(&zones, 0.0, 0.0, 1.0);
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn test_near_zero_origin_still_filters() {
        // The sentinel is the exact pair (0.0, 0.0); anything else is a
        // real origin.
        let zone = zone_at(1, 37.5, 127.0);
        let kept = filter_by_radius(&[zone], 0.0, 0.0001, 1000.0);
        assert!(kept.is_empty());
    }
}
