//! Segment distance rules shared by the planner and the journey validator.

use crate::domain::{BusRoute, BusStopCode, JourneySegment};

/// Why a segment does not fit its service's route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("in segment {segment}: one or both bus stops not in this service's route, or the route does not exist")]
    NotOnRoute { segment: String },

    #[error("in segment {segment}: bus stop {origin} does not come before {destination} in this service's route")]
    WrongOrder {
        segment: String,
        origin: BusStopCode,
        destination: BusStopCode,
    },
}

/// Distance in km ridden on `route` for `segment`.
///
/// `route` must be the segment's service in stop-sequence order. Of the
/// entries for the segment's two stops, the first origin entry that is
/// directly followed by a destination entry is used. On loop services a
/// stop can appear more than once, so this picks the earliest ride that
/// does not pass either stop again on the way.
pub fn segment_distance_km(route: &[BusRoute], segment: &JourneySegment) -> Result<f64, SegmentError> {
    let (origin, destination) = (segment.origin_code, segment.destination_code);

    let relevant: Vec<&BusRoute> = route
        .iter()
        .filter(|r| r.bus_stop_code == origin || r.bus_stop_code == destination)
        .collect();

    let mut origin_seen = false;
    for (idx, entry) in relevant.iter().enumerate() {
        if entry.bus_stop_code != origin {
            continue;
        }
        origin_seen = true;
        match relevant.get(idx + 1) {
            Some(next) if next.bus_stop_code == destination => {
                return Ok(next.distance - entry.distance);
            }
            _ => {}
        }
    }

    if origin_seen {
        Err(SegmentError::WrongOrder {
            segment: segment.to_string(),
            origin,
            destination,
        })
    } else {
        Err(SegmentError::NotOnRoute {
            segment: segment.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{BusRoute, BusStopCode, Direction, ServiceNo};

    /// Route entries for `service`/`direction` calling at `stops` in order,
    /// each `(code, distance_km)`.
    pub fn route(service: &str, direction: Direction, stops: &[(&str, f64)]) -> Vec<BusRoute> {
        stops
            .iter()
            .enumerate()
            .map(|(idx, (code, distance))| BusRoute {
                service_no: ServiceNo::parse(service).unwrap(),
                operator: "SBST".to_string(),
                direction,
                stop_sequence: idx as u32 + 1,
                bus_stop_code: BusStopCode::parse(code).unwrap(),
                distance: *distance,
                wd_first_bus: None,
                wd_last_bus: None,
                sat_first_bus: None,
                sat_last_bus: None,
                sun_first_bus: None,
                sun_last_bus: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::route;
    use super::*;
    use crate::domain::{Direction, ServiceNo};

    fn segment(from: &str, to: &str) -> JourneySegment {
        JourneySegment {
            service_no: ServiceNo::parse("10").unwrap(),
            direction: Direction::One,
            origin_code: BusStopCode::parse(from).unwrap(),
            destination_code: BusStopCode::parse(to).unwrap(),
        }
    }

    fn line() -> Vec<BusRoute> {
        route(
            "10",
            Direction::One,
            &[("00001", 0.0), ("00002", 1.5), ("00003", 2.0), ("00004", 4.0)],
        )
    }

    #[test]
    fn forward_segment() {
        assert_eq!(segment_distance_km(&line(), &segment("00001", "00004")), Ok(4.0));
        assert_eq!(segment_distance_km(&line(), &segment("00002", "00003")), Ok(0.5));
    }

    #[test]
    fn backwards_segment_rejected() {
        let err = segment_distance_km(&line(), &segment("00004", "00001")).unwrap_err();
        assert!(matches!(err, SegmentError::WrongOrder { .. }));
        assert_eq!(
            err.to_string(),
            "in segment 10-1, 00004 to 00001: bus stop 00004 does not come before 00001 in this service's route"
        );
    }

    #[test]
    fn unknown_stop_rejected() {
        let err = segment_distance_km(&line(), &segment("00009", "00001")).unwrap_err();
        assert!(matches!(err, SegmentError::NotOnRoute { .. }));

        let err = segment_distance_km(&[], &segment("00001", "00002")).unwrap_err();
        assert!(matches!(err, SegmentError::NotOnRoute { .. }));
    }

    #[test]
    fn missing_destination_is_wrong_order() {
        let err = segment_distance_km(&line(), &segment("00001", "00009")).unwrap_err();
        assert!(matches!(err, SegmentError::WrongOrder { .. }));
    }

    #[test]
    fn loop_uses_first_direct_pair() {
        // Loop: 1 -> 2 -> 3 -> 1 -> 2
        let looped = route(
            "10",
            Direction::One,
            &[
                ("00001", 0.0),
                ("00002", 1.0),
                ("00003", 2.0),
                ("00001", 3.0),
                ("00002", 4.5),
            ],
        );

        assert_eq!(segment_distance_km(&looped, &segment("00001", "00002")), Ok(1.0));
        assert_eq!(segment_distance_km(&looped, &segment("00003", "00001")), Ok(1.0));
        // 00003 is not one of the segment's stops, so 2 -> 1 counts as direct.
        assert_eq!(segment_distance_km(&looped, &segment("00002", "00001")), Ok(2.0));
    }
}
