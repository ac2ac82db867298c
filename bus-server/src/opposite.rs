//! Pairing of bus stops on opposite sides of a road.
//!
//! Stops across the road from a landmark are conventionally described as
//! "Opp <landmark>", so `"Opp Blk 21"` faces `"Blk 21"` on the same road.

use std::collections::HashSet;

use crate::domain::{BusStop, BusStopCode};

const OPPOSITE_PREFIX: &str = "opp ";

/// Normalise a description for comparison.
fn normalise(description: &str) -> String {
    description.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// The landmark an "Opp ..." description refers to, if it is one.
fn opposite_of(description: &str) -> Option<String> {
    let normalised = normalise(description);
    normalised
        .strip_prefix(OPPOSITE_PREFIX)
        .map(str::to_string)
        .filter(|rest| !rest.is_empty())
}

/// Pair each stop with the stop facing it.
///
/// Returns `(stop, opposite)` pairs where `opposite` is the "Opp" stop,
/// ordered by the first stop's code. Every stop appears in at most one
/// pair; if several candidates match, the lowest codes pair first.
pub fn pair_opposite_stops(stops: &[BusStop]) -> Vec<(BusStop, BusStop)> {
    let mut sorted: Vec<&BusStop> = stops.iter().collect();
    sorted.sort_by_key(|s| s.bus_stop_code);

    let (opp, plain): (Vec<&BusStop>, Vec<&BusStop>) = sorted
        .into_iter()
        .partition(|s| opposite_of(&s.description).is_some());

    let mut used: HashSet<BusStopCode> = HashSet::new();
    let mut pairs = Vec::new();

    for stop in plain {
        let landmark = normalise(&stop.description);
        let facing = opp.iter().find(|o| {
            !used.contains(&o.bus_stop_code) && opposite_of(&o.description).as_deref() == Some(&landmark)
        });

        if let Some(facing) = facing {
            used.insert(facing.bus_stop_code);
            pairs.push((stop.clone(), (*facing).clone()));
        }
    }

    pairs
}
