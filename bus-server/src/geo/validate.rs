//! Validation of nearby-stop results against the full stop set.

use std::collections::HashSet;

use crate::domain::{BusStop, BusStopCode, GeoPoint};

use super::great_circle_distance_km;

/// Default slack around the search radius, in kilometres.
pub const DEFAULT_TOLERANCE_KM: f64 = 0.01;

/// A nearby-stop result that disagrees with the stop set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NearbyValidationError {
    #[error("the returned list of bus stops includes the stop {code} ({description}) more than once")]
    Duplicate {
        code: BusStopCode,
        description: String,
    },

    #[error(
        "bus stop {code} ({description}) is {distance_km}km from Lat: {lat}, Long: {lng} but it is not in the returned list of bus stops: {returned}"
    )]
    Missing {
        code: BusStopCode,
        description: String,
        distance_km: f64,
        lat: f64,
        lng: f64,
        returned: String,
    },

    #[error(
        "bus stop {code} ({description}) is {distance_km}km from Lat: {lat}, Long: {lng} but it is in the returned list of bus stops: {returned}"
    )]
    TooFar {
        code: BusStopCode,
        description: String,
        distance_km: f64,
        lat: f64,
        lng: f64,
        returned: String,
    },
}

/// Check that `returned` is exactly the set of stops within `distance_km`
/// of `point`, up to `tolerance_km` either side of the boundary.
///
/// Stops strictly closer than `distance_km - tolerance_km` must be present;
/// stops further than `distance_km + tolerance_km` must be absent; no stop
/// may be returned twice. Stops in `all_stops` with an invalid location are
/// ignored.
pub fn validate_nearby_stops(
    all_stops: &[BusStop],
    point: GeoPoint,
    returned: &[BusStop],
    distance_km: f64,
    tolerance_km: f64,
) -> Result<(), NearbyValidationError> {
    let mut returned_codes: Vec<BusStopCode> = Vec::with_capacity(returned.len());
    let mut seen = HashSet::with_capacity(returned.len());

    for stop in returned {
        if !seen.insert(stop.bus_stop_code) {
            return Err(NearbyValidationError::Duplicate {
                code: stop.bus_stop_code,
                description: stop.description.clone(),
            });
        }
        returned_codes.push(stop.bus_stop_code);
    }

    let returned_list = || {
        returned_codes
            .iter()
            .map(BusStopCode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    for stop in all_stops {
        let Ok(stop_point) = stop.point() else {
            continue;
        };
        let distance = great_circle_distance_km(stop_point, point);
        let rounded = (distance * 1000.0).round() / 1000.0;
        let included = seen.contains(&stop.bus_stop_code);

        if distance < distance_km - tolerance_km && !included {
            return Err(NearbyValidationError::Missing {
                code: stop.bus_stop_code,
                description: stop.description.clone(),
                distance_km: rounded,
                lat: point.lat(),
                lng: point.lng(),
                returned: returned_list(),
            });
        }

        if distance > distance_km + tolerance_km && included {
            return Err(NearbyValidationError::TooFar {
                code: stop.bus_stop_code,
                description: stop.description.clone(),
                distance_km: rounded,
                lat: point.lat(),
                lng: point.lng(),
                returned: returned_list(),
            });
        }
    }

    Ok(())
}
