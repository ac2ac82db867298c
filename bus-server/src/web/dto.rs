//! Data transfer objects for web requests and responses.
//!
//! Stop, service and journey documents are returned as-is; only responses
//! that add computed fields get their own type here.

use serde::{Deserialize, Serialize};

use crate::domain::{BusStop, Direction, RatingSummary, ServiceNo};
use crate::geo::NearbyStop;

/// Query string for nearby stop searches.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyQuery {
    /// Search radius in km (defaults to the server's configured radius)
    pub radius_km: Option<f64>,
}

/// A stop in nearby search results.
#[derive(Debug, Serialize)]
pub struct NearbyStopResult {
    #[serde(flatten)]
    pub stop: BusStop,

    /// Great-circle distance from the query point
    #[serde(rename = "DistanceKm")]
    pub distance_km: f64,
}

impl From<NearbyStop> for NearbyStopResult {
    fn from(nearby: NearbyStop) -> Self {
        Self {
            stop: nearby.stop,
            distance_km: nearby.distance_km,
        }
    }
}

/// Rating statistics for a service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RatingSummaryResponse {
    pub service_no: ServiceNo,
    pub direction: Direction,
    /// Mean rating to 2 decimal places, `null` when unrated
    pub average_rating: Option<f64>,
    pub number_of_ratings: u64,
}

impl RatingSummaryResponse {
    pub fn new(service_no: ServiceNo, direction: Direction, summary: RatingSummary) -> Self {
        Self {
            service_no,
            direction,
            average_rating: summary.rounded_average(),
            number_of_ratings: summary.count,
        }
    }
}

/// Body of a rating submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitRatingRequest {
    pub rating: crate::domain::Rating,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::test_support::stop_at;
    use serde_json::json;

    #[test]
    fn nearby_result_flattens_stop() {
        let result = NearbyStopResult::from(NearbyStop {
            stop: stop_at("01012", "Hotel Grand Pacific", 1.3, 103.8),
            distance_km: 0.25,
        });

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["BusStopCode"], json!("01012"));
        assert_eq!(value["DistanceKm"], json!(0.25));
    }

    #[test]
    fn rating_summary_shape() {
        let response = RatingSummaryResponse::new(
            ServiceNo::parse("10").unwrap(),
            Direction::One,
            RatingSummary {
                average: Some(11.0 / 3.0),
                count: 3,
            },
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "ServiceNo": "10",
                "Direction": 1,
                "AverageRating": 3.67,
                "NumberOfRatings": 3
            })
        );
    }

    #[test]
    fn submit_request_parsing() {
        let req: SubmitRatingRequest =
            serde_json::from_str(r#"{"Rating": 4, "Comment": "Clean bus"}"#).unwrap();
        assert_eq!(req.rating.value(), 4);
        assert_eq!(req.comment.as_deref(), Some("Clean bus"));

        let req: SubmitRatingRequest = serde_json::from_str(r#"{"Rating": 1}"#).unwrap();
        assert_eq!(req.comment, None);

        let req: SubmitRatingRequest = serde_json::from_str(r#"{"Rating": 4.0}"#).unwrap();
        assert_eq!(req.rating.value(), 4);

        assert!(serde_json::from_str::<SubmitRatingRequest>(r#"{"Rating": 6}"#).is_err());
        assert!(serde_json::from_str::<SubmitRatingRequest>(r#"{}"#).is_err());
    }
}
