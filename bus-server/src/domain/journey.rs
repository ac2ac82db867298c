//! Journey types.
//!
//! A `Journey` is a sequence of bus rides from an origin stop to a
//! destination stop, with an estimated total travel time in minutes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BusStopCode, Direction, ServiceNo};

/// One ride on a single service between two stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JourneySegment {
    pub service_no: ServiceNo,
    pub direction: Direction,
    pub origin_code: BusStopCode,
    pub destination_code: BusStopCode,
}

impl fmt::Display for JourneySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}, {} to {}",
            self.service_no, self.direction, self.origin_code, self.destination_code
        )
    }
}

/// A complete journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub segments: Vec<JourneySegment>,
    /// Estimated travel time in minutes, including transfers.
    pub estimated_time: f64,
}

impl Journey {
    /// Number of transfers between services.
    pub fn transfers(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}
