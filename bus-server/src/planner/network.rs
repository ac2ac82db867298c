//! Route network built from the route collection.

use std::collections::HashMap;

use crate::domain::{BusRoute, BusStopCode, Direction, ServiceNo};

/// One service in one direction, with its stops in route order.
#[derive(Debug, Clone)]
pub struct Line {
    pub service_no: ServiceNo,
    pub direction: Direction,
    /// Route entries sorted by stop sequence.
    pub stops: Vec<BusRoute>,
}

impl Line {
    /// Stop code at a position on the line.
    pub fn code_at(&self, pos: usize) -> Option<BusStopCode> {
        self.stops.get(pos).map(|r| r.bus_stop_code)
    }

    /// Kilometres between two positions on the line. Never negative.
    pub fn distance_between(&self, from: usize, to: usize) -> f64 {
        match (self.stops.get(from), self.stops.get(to)) {
            (Some(a), Some(b)) => (b.distance - a.distance).max(0.0),
            _ => 0.0,
        }
    }
}

/// Every line in the network, indexed by the stops they call at.
#[derive(Debug, Clone, Default)]
pub struct RouteNetwork {
    lines: Vec<Line>,
    /// For each stop, every `(line index, position)` calling there.
    calls: HashMap<BusStopCode, Vec<(usize, usize)>>,
}

impl RouteNetwork {
    /// Group route entries into lines and index them by stop.
    pub fn build(routes: Vec<BusRoute>) -> Self {
        let mut grouped: HashMap<(ServiceNo, Direction), Vec<BusRoute>> = HashMap::new();
        for route in routes {
            grouped
                .entry((route.service_no.clone(), route.direction))
                .or_default()
                .push(route);
        }

        let mut lines: Vec<Line> = grouped
            .into_iter()
            .map(|((service_no, direction), mut stops)| {
                stops.sort_by_key(|r| r.stop_sequence);
                Line {
                    service_no,
                    direction,
                    stops,
                }
            })
            .collect();
        // Stable line order keeps search results deterministic.
        lines.sort_by(|a, b| {
            a.service_no
                .cmp(&b.service_no)
                .then(a.direction.cmp(&b.direction))
        });

        let mut calls: HashMap<BusStopCode, Vec<(usize, usize)>> = HashMap::new();
        for (line_idx, line) in lines.iter().enumerate() {
            for (pos, route) in line.stops.iter().enumerate() {
                calls
                    .entry(route.bus_stop_code)
                    .or_default()
                    .push((line_idx, pos));
            }
        }

        Self { lines, calls }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Every `(line index, position)` calling at `code`.
    pub fn calls_at(&self, code: &BusStopCode) -> &[(usize, usize)] {
        self.calls.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether any line calls at `code`.
    pub fn serves(&self, code: &BusStopCode) -> bool {
        self.calls.contains_key(code)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::estimate::test_support::route;

    fn code(s: &str) -> BusStopCode {
        BusStopCode::parse(s).unwrap()
    }

    #[test]
    fn groups_and_sorts_lines() {
        let mut routes = route("10", Direction::One, &[("00001", 0.0), ("00002", 1.0)]);
        routes.extend(route("10", Direction::Two, &[("00002", 0.0), ("00001", 1.0)]));
        routes.extend(route("14", Direction::One, &[("00002", 0.0), ("00003", 2.0)]));
        routes.reverse();

        let network = RouteNetwork::build(routes);
        assert_eq!(network.len(), 3);

        let first = network.line(0).unwrap();
        assert_eq!(first.service_no.as_str(), "10");
        assert_eq!(first.direction, Direction::One);
        assert_eq!(first.code_at(0), Some(code("00001")));
        assert_eq!(first.code_at(1), Some(code("00002")));
    }

    #[test]
    fn indexes_calls() {
        let mut routes = route("10", Direction::One, &[("00001", 0.0), ("00002", 1.0)]);
        routes.extend(route("14", Direction::One, &[("00002", 0.0), ("00003", 2.0)]));
        let network = RouteNetwork::build(routes);

        assert_eq!(network.calls_at(&code("00002")).len(), 2);
        assert!(network.serves(&code("00003")));
        assert!(!network.serves(&code("00009")));
        assert!(network.calls_at(&code("00009")).is_empty());
    }

    #[test]
    fn distance_between_clamps() {
        let network = RouteNetwork::build(route(
            "10",
            Direction::One,
            &[("00001", 0.0), ("00002", 1.5), ("00003", 1.2)],
        ));
        let line = network.line(0).unwrap();
        assert_eq!(line.distance_between(0, 1), 1.5);
        assert_eq!(line.distance_between(1, 2), 0.0);
        assert_eq!(line.distance_between(0, 9), 0.0);
    }
}
