//! Validation of a journey against the route collection.

use crate::domain::{BusStopCode, Journey};
use crate::store::{BusStore, StoreError};

use super::config::JourneyConfig;
use super::estimate::{SegmentError, segment_distance_km};

/// Default allowed difference between claimed and recomputed time (minutes).
pub const DEFAULT_TIME_TOLERANCE_MINS: f64 = 1.0;

/// A journey that does not hold up against the route data.
#[derive(Debug, thiserror::Error)]
pub enum JourneyValidationError {
    #[error("journey does not have at least one segment")]
    Empty,

    #[error("in segment {segment}: OriginCode of the first segment is not {expected}")]
    WrongOrigin {
        segment: String,
        expected: BusStopCode,
    },

    #[error("in segment {segment}: DestinationCode of the last segment is not {expected}")]
    WrongDestination {
        segment: String,
        expected: BusStopCode,
    },

    #[error("in segment {segment}: expected OriginCode to be {expected}")]
    Disconnected {
        segment: String,
        expected: BusStopCode,
    },

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error("expected estimated time for the given journey to be {expected}, but received {received} instead")]
    WrongTime { expected: f64, received: f64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Check `journey` goes from `origin` to `destination` along real routes and
/// that its estimated time matches the recomputed one within `tolerance_mins`.
///
/// Returns the recomputed estimated time on success.
pub async fn validate_journey<S: BusStore>(
    store: &S,
    config: &JourneyConfig,
    origin: BusStopCode,
    destination: BusStopCode,
    journey: &Journey,
    tolerance_mins: f64,
) -> Result<f64, JourneyValidationError> {
    let (Some(first), Some(last)) = (journey.segments.first(), journey.segments.last()) else {
        return Err(JourneyValidationError::Empty);
    };

    if first.origin_code != origin {
        return Err(JourneyValidationError::WrongOrigin {
            segment: first.to_string(),
            expected: origin,
        });
    }

    if last.destination_code != destination {
        return Err(JourneyValidationError::WrongDestination {
            segment: last.to_string(),
            expected: destination,
        });
    }

    let mut expected_origin = origin;
    let mut ride_minutes = 0.0;
    for segment in &journey.segments {
        if segment.origin_code != expected_origin {
            return Err(JourneyValidationError::Disconnected {
                segment: segment.to_string(),
                expected: expected_origin,
            });
        }

        let route = store.route(&segment.service_no, segment.direction).await?;
        ride_minutes += config.ride_minutes(segment_distance_km(&route, segment)?);
        expected_origin = segment.destination_code;
    }

    let expected = ride_minutes + config.transfer_minutes(journey.segments.len());

    if (journey.estimated_time - expected).abs() > tolerance_mins {
        return Err(JourneyValidationError::WrongTime {
            expected,
            received: journey.estimated_time,
        });
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, JourneySegment, ServiceNo};
    use crate::planner::estimate::test_support::route;
    use crate::store::MemoryStore;

    fn code(s: &str) -> BusStopCode {
        BusStopCode::parse(s).unwrap()
    }

    fn segment(svc: &str, from: &str, to: &str) -> JourneySegment {
        JourneySegment {
            service_no: ServiceNo::parse(svc).unwrap(),
            direction: Direction::One,
            origin_code: code(from),
            destination_code: code(to),
        }
    }

    fn store() -> MemoryStore {
        let mut routes = route("10", Direction::One, &[("00001", 0.0), ("00002", 2.0)]);
        routes.extend(route("14", Direction::One, &[("00002", 0.0), ("00003", 4.0)]));
        MemoryStore::with_data(vec![], routes, vec![])
    }

    async fn validate(journey: &Journey, from: &str, to: &str) -> Result<f64, JourneyValidationError> {
        validate_journey(
            &store(),
            &JourneyConfig::default(),
            code(from),
            code(to),
            journey,
            DEFAULT_TIME_TOLERANCE_MINS,
        )
        .await
    }

    #[tokio::test]
    async fn valid_journey() {
        let journey = Journey {
            segments: vec![segment("10", "00001", "00002"), segment("14", "00002", "00003")],
            estimated_time: 28.5,
        };
        let expected = validate(&journey, "00001", "00003").await.unwrap();
        assert!((expected - 28.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_journey() {
        let journey = Journey {
            segments: vec![],
            estimated_time: 0.0,
        };
        let err = validate(&journey, "00001", "00003").await.unwrap_err();
        assert!(matches!(err, JourneyValidationError::Empty));
    }

    #[tokio::test]
    async fn wrong_endpoints() {
        let journey = Journey {
            segments: vec![segment("10", "00001", "00002")],
            estimated_time: 6.0,
        };

        let err = validate(&journey, "00002", "00002").await.unwrap_err();
        assert!(matches!(err, JourneyValidationError::WrongOrigin { .. }));

        let err = validate(&journey, "00001", "00003").await.unwrap_err();
        assert!(matches!(err, JourneyValidationError::WrongDestination { .. }));
    }

    #[tokio::test]
    async fn disconnected_segments() {
        let journey = Journey {
            segments: vec![segment("10", "00001", "00002"), segment("14", "00001", "00003")],
            estimated_time: 28.0,
        };
        let err = validate(&journey, "00001", "00003").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "in segment 14-1, 00001 to 00003: expected OriginCode to be 00002"
        );
    }

    #[tokio::test]
    async fn segment_not_on_route() {
        let journey = Journey {
            segments: vec![segment("14", "00001", "00003")],
            estimated_time: 12.0,
        };
        let err = validate(&journey, "00001", "00003").await.unwrap_err();
        assert!(matches!(
            err,
            JourneyValidationError::Segment(SegmentError::NotOnRoute { .. })
        ));
    }

    #[tokio::test]
    async fn time_outside_tolerance() {
        let journey = Journey {
            segments: vec![segment("10", "00001", "00002")],
            estimated_time: 8.0,
        };
        let err = validate(&journey, "00001", "00002").await.unwrap_err();
        assert!(matches!(
            err,
            JourneyValidationError::WrongTime { expected, received }
                if expected == 6.0 && received == 8.0
        ));
    }
}
