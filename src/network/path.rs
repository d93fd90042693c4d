//! Shortest path between two stations along survey legs (A* search)

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use super::Network;

#[derive(Debug, PartialEq)]
struct Candidate {
    estimate: f64,
    station: usize,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on the estimate, ties broken by decode order
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Adjacency lists by station index, neighbours in leg decode order.
pub(crate) fn adjacency(network: &Network) -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); network.station_count()];
    for leg in network.legs() {
        let (a, b) = network.leg_ends(leg);
        adj[a].push(b);
        adj[b].push(a);
    }
    adj
}

/// Length and station names of the shortest leg path from `from` to `to`.
///
/// Returns `None` when either station is unknown or no path exists. The
/// straight-line distance to the goal is the heuristic, so the result is
/// optimal.
pub fn shortest_path(network: &Network, from: &str, to: &str) -> Option<(f64, Vec<String>)> {
    let start = network.station_index(from)?;
    let goal = network.station_index(to)?;
    let goal_pos = network.station_at(goal)?.position;
    let position = |i: usize| network.station_at(i).map(|s| s.position).unwrap_or_default();
    let adj = adjacency(network);

    let mut came_from: AHashMap<usize, usize> = AHashMap::new();
    let mut g_score: AHashMap<usize, f64> = AHashMap::new();
    let mut open = BinaryHeap::new();
    g_score.insert(start, 0.0);
    open.push(Candidate {
        estimate: position(start).distance(&goal_pos),
        station: start,
    });

    while let Some(Candidate { station, estimate }) = open.pop() {
        let g = g_score[&station];
        if station == goal {
            let mut path = vec![station];
            let mut current = station;
            while let Some(&prev) = came_from.get(&current) {
                path.push(prev);
                current = prev;
            }
            path.reverse();
            let names = path
                .into_iter()
                .filter_map(|i| network.station_at(i).map(|s| s.name.clone()))
                .collect();
            return Some((g, names));
        }
        if estimate > g + position(station).distance(&goal_pos) {
            // stale heap entry
            continue;
        }
        for &next in &adj[station] {
            let tentative = g + position(station).distance(&position(next));
            if g_score.get(&next).map_or(true, |&old| tentative < old) {
                came_from.insert(next, station);
                g_score.insert(next, tentative);
                open.push(Candidate {
                    estimate: tentative + position(next).distance(&goal_pos),
                    station: next,
                });
            }
        }
    }
    None
}
