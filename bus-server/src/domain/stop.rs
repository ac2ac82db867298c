//! Bus stop, route and service documents.
//!
//! Field names follow the LTA DataMall datasets, which is also how the
//! documents are stored in MongoDB and how they are returned over HTTP.

use serde::{Deserialize, Serialize};

use super::{BusStopCode, Direction, GeoJsonPoint, GeoPoint, InvalidPoint, ServiceNo};

/// A bus stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusStop {
    pub bus_stop_code: BusStopCode,
    pub road_name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location: GeoJsonPoint,
}

impl BusStop {
    /// The stop's position, taken from its GeoJSON location.
    pub fn point(&self) -> Result<GeoPoint, InvalidPoint> {
        let [lng, lat] = self.location.coordinates;
        GeoPoint::new(lat, lng)
    }
}

/// One stop on a bus service's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRoute {
    #[serde(rename = "ServiceNo")]
    pub service_no: ServiceNo,
    #[serde(rename = "Operator", default)]
    pub operator: String,
    #[serde(rename = "Direction")]
    pub direction: Direction,
    #[serde(rename = "StopSequence")]
    pub stop_sequence: u32,
    #[serde(rename = "BusStopCode")]
    pub bus_stop_code: BusStopCode,
    /// Kilometres travelled from the start of the route.
    #[serde(rename = "Distance")]
    pub distance: f64,
    #[serde(rename = "WD_FirstBus", default, skip_serializing_if = "Option::is_none")]
    pub wd_first_bus: Option<String>,
    #[serde(rename = "WD_LastBus", default, skip_serializing_if = "Option::is_none")]
    pub wd_last_bus: Option<String>,
    #[serde(rename = "SAT_FirstBus", default, skip_serializing_if = "Option::is_none")]
    pub sat_first_bus: Option<String>,
    #[serde(rename = "SAT_LastBus", default, skip_serializing_if = "Option::is_none")]
    pub sat_last_bus: Option<String>,
    #[serde(rename = "SUN_FirstBus", default, skip_serializing_if = "Option::is_none")]
    pub sun_first_bus: Option<String>,
    #[serde(rename = "SUN_LastBus", default, skip_serializing_if = "Option::is_none")]
    pub sun_last_bus: Option<String>,
}

/// A bus service in one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusService {
    #[serde(rename = "ServiceNo")]
    pub service_no: ServiceNo,
    #[serde(rename = "Operator", default)]
    pub operator: String,
    #[serde(rename = "Direction")]
    pub direction: Direction,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "OriginCode")]
    pub origin_code: BusStopCode,
    #[serde(rename = "DestinationCode")]
    pub destination_code: BusStopCode,
    #[serde(rename = "AM_Peak_Freq", default, skip_serializing_if = "Option::is_none")]
    pub am_peak_freq: Option<String>,
    #[serde(rename = "AM_Offpeak_Freq", default, skip_serializing_if = "Option::is_none")]
    pub am_offpeak_freq: Option<String>,
    #[serde(rename = "PM_Peak_Freq", default, skip_serializing_if = "Option::is_none")]
    pub pm_peak_freq: Option<String>,
    #[serde(rename = "PM_Offpeak_Freq", default, skip_serializing_if = "Option::is_none")]
    pub pm_offpeak_freq: Option<String>,
    #[serde(rename = "LoopDesc", default, skip_serializing_if = "Option::is_none")]
    pub loop_desc: Option<String>,
}

/// A stop along a service's route, joined with its route position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStop {
    #[serde(rename = "StopSequence")]
    pub stop_sequence: u32,
    #[serde(rename = "Distance")]
    pub distance: f64,
    #[serde(flatten)]
    pub stop: BusStop,
}
