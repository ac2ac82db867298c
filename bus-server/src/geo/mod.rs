//! Great-circle geometry for nearby stop lookups.
//!
//! Nearby searches run in two passes: a cheap bounding-box query that the
//! database can answer from an index, then an exact great-circle filter over
//! the candidates.

mod validate;

pub use validate::{DEFAULT_TOLERANCE_KM, NearbyValidationError, validate_nearby_stops};

use crate::domain::{BusStop, GeoPoint};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres.
///
/// Uses the spherical law of cosines. The cosine is clamped to [-1, 1] so
/// rounding on near-identical points cannot produce NaN.
pub fn great_circle_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat().to_radians(), b.lat().to_radians());
    let delta_lng = (a.lng() - b.lng()).to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lng.cos();

    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM
}

/// A latitude/longitude box enclosing a circle on the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// The smallest box containing every point within `radius_km` of `center`.
    ///
    /// Does not wrap across the antimeridian: the longitude range is clamped
    /// to [-180, 180]. If the circle reaches a pole, the box spans all
    /// longitudes.
    pub fn around(center: GeoPoint, radius_km: f64) -> Self {
        let angular = radius_km / EARTH_RADIUS_KM;
        let delta_lat = angular.to_degrees();

        let min_lat = (center.lat() - delta_lat).max(-90.0);
        let max_lat = (center.lat() + delta_lat).min(90.0);

        let cos_lat = center.lat().to_radians().cos();
        let ratio = angular.sin() / cos_lat;

        let (min_lng, max_lng) = if min_lat <= -90.0 || max_lat >= 90.0 || ratio >= 1.0 {
            (-180.0, 180.0)
        } else {
            let delta_lng = ratio.asin().to_degrees();
            (
                (center.lng() - delta_lng).max(-180.0),
                (center.lng() + delta_lng).min(180.0),
            )
        };

        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Whether a latitude/longitude pair lies inside the box (inclusive).
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

/// A stop annotated with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop {
    pub stop: BusStop,
    pub distance_km: f64,
}

/// Keep the candidates within `radius_km` of `center`, nearest first.
///
/// Candidates whose stored location is invalid are skipped. Ties are broken
/// by stop code so the output is deterministic.
pub fn nearby_stops(candidates: Vec<BusStop>, center: GeoPoint, radius_km: f64) -> Vec<NearbyStop> {
    let mut nearby: Vec<NearbyStop> = candidates
        .into_iter()
        .filter_map(|stop| {
            let point = stop.point().ok()?;
            let distance_km = great_circle_distance_km(point, center);
            (distance_km <= radius_km).then_some(NearbyStop { stop, distance_km })
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.stop.bus_stop_code.cmp(&b.stop.bus_stop_code))
    });

    nearby
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{BusStop, BusStopCode, GeoPoint};

    /// Build a stop at the given coordinates.
    pub fn stop_at(code: &str, description: &str, lat: f64, lng: f64) -> BusStop {
        BusStop {
            bus_stop_code: BusStopCode::parse(code).unwrap(),
            road_name: "Test Rd".to_string(),
            description: description.to_string(),
            latitude: lat,
            longitude: lng,
            location: GeoPoint::new(lat, lng).unwrap().into(),
        }
    }
}
