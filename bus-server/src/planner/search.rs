//! Shortest-time journey search.
//!
//! Dijkstra over two kinds of node: waiting at a stop, and riding a line at
//! a given position. Riding to the next position costs the distance-based
//! ride time; boarding costs the transfer penalty everywhere except the
//! origin; alighting is free.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, error};

use crate::domain::{BusStopCode, Journey, JourneySegment};

use super::config::JourneyConfig;
use super::estimate::segment_distance_km;
use super::network::RouteNetwork;

/// Error from journey search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Origin and destination are the same stop
    #[error("origin and destination are the same bus stop")]
    SameStop,

    /// No line calls at the stop
    #[error("no bus service calls at {0}")]
    NotServed(BusStopCode),

    /// The stops are not connected by any sequence of rides
    #[error("no journey found from {origin} to {destination}")]
    NoRoute {
        origin: BusStopCode,
        destination: BusStopCode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Node {
    Stop(BusStopCode),
    Ride { line: usize, pos: usize },
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    node: Node,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so the max-heap pops the cheapest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// A ride between two positions on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ride {
    line: usize,
    board: usize,
    alight: usize,
}

/// Journey planner over a prebuilt network.
pub struct Planner<'a> {
    network: &'a RouteNetwork,
    config: &'a JourneyConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(network: &'a RouteNetwork, config: &'a JourneyConfig) -> Self {
        Self { network, config }
    }

    /// Find the journey with the lowest estimated time.
    pub fn plan(&self, origin: BusStopCode, destination: BusStopCode) -> Result<Journey, PlanError> {
        if origin == destination {
            return Err(PlanError::SameStop);
        }
        for code in [origin, destination] {
            if !self.network.serves(&code) {
                return Err(PlanError::NotServed(code));
            }
        }

        let path = self
            .shortest_path(origin, destination)
            .ok_or(PlanError::NoRoute {
                origin,
                destination,
            })?;
        let rides = collapse_rides(&path);

        let legs: Vec<(JourneySegment, f64)> = rides.iter().filter_map(|ride| self.leg(ride)).collect();

        let ride_minutes: f64 = legs.iter().map(|(_, km)| self.config.ride_minutes(*km)).sum();
        let segments: Vec<JourneySegment> = legs.into_iter().map(|(segment, _)| segment).collect();
        let estimated_time = ride_minutes + self.config.transfer_minutes(segments.len());

        debug!(
            %origin,
            %destination,
            segments = segments.len(),
            estimated_time,
            "planned journey"
        );

        Ok(Journey {
            segments,
            estimated_time,
        })
    }

    /// The segment for a ride and the distance it covers.
    ///
    /// The distance follows the segment rule the journey validator uses.
    /// Falls back to the ride's own positions if the rule disagrees.
    fn leg(&self, ride: &Ride) -> Option<(JourneySegment, f64)> {
        let Some(segment) = self.segment_for(ride) else {
            error!(
                line = ride.line,
                board = ride.board,
                alight = ride.alight,
                "ride is outside the route network, dropping it"
            );
            return None;
        };
        let line = self.network.line(ride.line)?;

        let km = match segment_distance_km(&line.stops, &segment) {
            Ok(km) => km,
            Err(e) => {
                error!(%segment, error = %e, "ride does not match the segment rule");
                line.distance_between(ride.board, ride.alight)
            }
        };
        Some((segment, km))
    }

    fn segment_for(&self, ride: &Ride) -> Option<JourneySegment> {
        let line = self.network.line(ride.line)?;
        Some(JourneySegment {
            service_no: line.service_no.clone(),
            direction: line.direction,
            origin_code: line.code_at(ride.board)?,
            destination_code: line.code_at(ride.alight)?,
        })
    }

    fn shortest_path(&self, origin: BusStopCode, destination: BusStopCode) -> Option<Vec<Node>> {
        let start = Node::Stop(origin);
        let target = Node::Stop(destination);

        let mut best: HashMap<Node, f64> = HashMap::new();
        let mut previous: HashMap<Node, Node> = HashMap::new();
        let mut queue = BinaryHeap::new();

        best.insert(start, 0.0);
        queue.push(QueueEntry {
            cost: 0.0,
            node: start,
        });

        let mut settled = 0usize;
        while let Some(QueueEntry { cost, node }) = queue.pop() {
            if best.get(&node).is_some_and(|&b| cost > b) {
                continue;
            }
            settled += 1;

            if node == target {
                debug!(settled, "search reached destination");
                return Some(unwind(&previous, start, target));
            }

            for (next, step) in self.neighbours(node, origin) {
                let candidate = cost + step;
                let improved = match best.entry(next) {
                    Entry::Occupied(mut e) if candidate < *e.get() => {
                        e.insert(candidate);
                        true
                    }
                    Entry::Occupied(_) => false,
                    Entry::Vacant(e) => {
                        e.insert(candidate);
                        true
                    }
                };
                if improved {
                    previous.insert(next, node);
                    queue.push(QueueEntry {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        debug!(settled, "search exhausted without reaching destination");
        None
    }

    fn neighbours(&self, node: Node, origin: BusStopCode) -> Vec<(Node, f64)> {
        match node {
            Node::Stop(code) => {
                let boarding = if code == origin {
                    0.0
                } else {
                    self.config.transfer_penalty_mins
                };
                self.network
                    .calls_at(&code)
                    .iter()
                    .filter(|&&(line, pos)| {
                        self.network
                            .line(line)
                            .is_some_and(|l| pos + 1 < l.stops.len())
                    })
                    .map(|&(line, pos)| (Node::Ride { line, pos }, boarding))
                    .collect()
            }
            Node::Ride { line, pos } => {
                let Some(l) = self.network.line(line) else {
                    return Vec::new();
                };
                let mut out = Vec::with_capacity(2);
                if let Some(code) = l.code_at(pos) {
                    out.push((Node::Stop(code), 0.0));
                }
                if pos + 1 < l.stops.len() {
                    let minutes = self.config.ride_minutes(l.distance_between(pos, pos + 1));
                    out.push((Node::Ride { line, pos: pos + 1 }, minutes));
                }
                out
            }
        }
    }
}

fn unwind(previous: &HashMap<Node, Node>, start: Node, target: Node) -> Vec<Node> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match previous.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Turn a node path into rides, one per boarding.
fn collapse_rides(path: &[Node]) -> Vec<Ride> {
    let mut rides = Vec::new();
    let mut current: Option<Ride> = None;

    for node in path {
        match *node {
            Node::Ride { line, pos } => match current.as_mut() {
                Some(ride) if ride.line == line => ride.alight = pos,
                _ => {
                    current = Some(Ride {
                        line,
                        board: pos,
                        alight: pos,
                    })
                }
            },
            Node::Stop(_) => {
                if let Some(ride) = current.take().filter(|r| r.alight > r.board) {
                    rides.push(ride);
                }
            }
        }
    }

    rides
}
