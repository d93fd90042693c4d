//! Extended elevation: the centreline laid out along its running length.

use ahash::AHashMap;

use crate::network::path::adjacency;
use crate::network::{Network, StationFlags};
use crate::types::{Vector2, Vector3};

/// Horizontal gap between disconnected parts of the network, in metres.
pub(crate) const COMPONENT_GAP: f64 = 10.0;

fn position_key(p: &Vector3) -> [u64; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

/// Unrolled (running distance, altitude) of every station, in metres.
///
/// A depth-first walk starts at the first fixed station (or the first
/// station) and adds each leg's horizontal length to `x`. Parts not reached
/// from there are laid out to the right, each starting at its first station
/// in decode order.
pub(crate) fn unroll(network: &Network) -> Vec<Vector2> {
    let count = network.station_count();
    let adj = adjacency(network);
    let position = |i: usize| network.station_at(i).map(|s| s.position).unwrap_or_default();

    let mut placed: Vec<Option<Vector2>> = vec![None; count];
    let mut by_position: AHashMap<[u64; 3], Vector2> = AHashMap::new();

    let first = network
        .stations()
        .position(|s| s.flags.contains(StationFlags::FIXED))
        .unwrap_or(0);
    let starts = std::iter::once(first).chain(0..count);

    let mut right_edge: Option<f64> = None;
    let mut stack = Vec::new();
    for start in starts {
        if start >= count || placed[start].is_some() {
            continue;
        }
        let origin = right_edge.map_or(0.0, |edge| edge + COMPONENT_GAP);
        stack.push((start, origin));

        while let Some((station, x)) = stack.pop() {
            if placed[station].is_some() {
                continue;
            }
            let here = position(station);
            let point = *by_position
                .entry(position_key(&here))
                .or_insert_with(|| Vector2::new(x, here.z));
            placed[station] = Some(point);
            right_edge = Some(right_edge.map_or(point.x, |edge| edge.max(point.x)));

            for &next in adj[station].iter().rev() {
                if placed[next].is_none() {
                    let run = (position(next) - here).horizontal_length();
                    stack.push((next, point.x + run));
                }
            }
        }
    }

    placed.into_iter().map(Option::unwrap_or_default).collect()
}
