//! Service rating types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Direction, ServiceNo};

/// Error returned when a rating value is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid rating {0}: must be an integer from 1 to 5")]
pub struct InvalidRating(pub f64);

/// A rating from 1 (worst) to 5 (best).
///
/// Deserializes from any whole JSON number, so `4` and `4.0` are the same
/// rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, InvalidRating> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(InvalidRating(value as f64))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = InvalidRating;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl TryFrom<f64> for Rating {
    type Error = InvalidRating;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.fract() != 0.0 || !(f64::from(Self::MIN)..=f64::from(Self::MAX)).contains(&value) {
            return Err(InvalidRating(value));
        }
        Ok(Rating(value as u8))
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

/// A single submitted rating for a bus service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRating {
    pub service_no: ServiceNo,
    pub direction: Direction,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate rating statistics for one service direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    /// Mean rating, or `None` when there are no ratings.
    pub average: Option<f64>,
    /// Number of ratings submitted.
    pub count: u64,
}

impl RatingSummary {
    /// Summarise a set of ratings.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r.value()), count + 1));

        if count == 0 {
            return Self::default();
        }

        Self {
            average: Some(sum as f64 / count as f64),
            count,
        }
    }

    /// The average rounded to two decimal places, for display.
    pub fn rounded_average(&self) -> Option<f64> {
        self.average.map(|avg| (avg * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(v: i64) -> Rating {
        Rating::new(v).unwrap()
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
    }

    #[test]
    fn rating_rejects_fractional_json() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("4.5").is_err());
        assert!(serde_json::from_str::<Rating>("\"4\"").is_err());
    }

    #[test]
    fn rating_accepts_whole_floats() {
        assert_eq!(serde_json::from_str::<Rating>("4.0").unwrap(), r(4));
        assert_eq!(serde_json::from_str::<Rating>("1e0").unwrap(), r(1));
        assert_eq!(serde_json::to_string(&r(4)).unwrap(), "4");

        for bad in ["5.5", "0.0", "6.0", "-1", "NaN"] {
            assert!(serde_json::from_str::<Rating>(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn invalid_rating_message() {
        assert_eq!(
            Rating::try_from(6.0).unwrap_err().to_string(),
            "invalid rating 6: must be an integer from 1 to 5"
        );
        assert_eq!(
            Rating::new(0).unwrap_err().to_string(),
            "invalid rating 0: must be an integer from 1 to 5"
        );
    }

    #[test]
    fn empty_summary() {
        let summary = RatingSummary::from_ratings(Vec::new());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, None);
        assert_eq!(summary.rounded_average(), None);
    }

    #[test]
    fn summary_average() {
        let summary = RatingSummary::from_ratings([r(5), r(4), r(4)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.rounded_average(), Some(4.33));
    }
}
