use std::collections::{BTreeMap, BTreeSet};

use crate::protocol::RouteGraph;
use crate::NodeId;

/// Single-source shortest-path result. `costs` holds only reachable nodes
/// (the source included, at cost 0); `next_hops` maps every reachable
/// destination other than the source to the first hop toward it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub costs: BTreeMap<NodeId, f64>,
    pub next_hops: BTreeMap<NodeId, NodeId>,
}

/// Dijkstra over the discovered graph with edge weight = latency.
///
/// Node selection scans the tentative-cost map in ascending NodeId order
/// with a strict `<` comparison, so equal-cost candidates always resolve to
/// the lowest id. Pure function: safe to call on every accepted update.
pub fn shortest_paths(graph: &RouteGraph, source: NodeId) -> ShortestPaths {
    let mut cost: BTreeMap<NodeId, f64> =
        graph.keys().map(|&n| (n, f64::INFINITY)).collect();
    let mut parent: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    cost.insert(source, 0.0);

    loop {
        let mut min: Option<(NodeId, f64)> = None;
        for (&n, &c) in &cost {
            if visited.contains(&n) {
                continue;
            }
            if min.is_none_or(|(_, best)| c < best) {
                min = Some((n, c));
            }
        }
        let Some((u, base)) = min else { break };
        if base.is_infinite() {
            // everything left is unreachable
            break;
        }
        visited.insert(u);

        if let Some(adjacent) = graph.get(&u) {
            for (&v, record) in adjacent {
                if visited.contains(&v) {
                    continue;
                }
                let candidate = base + record.latency;
                let current = cost.get(&v).copied().unwrap_or(f64::INFINITY);
                if candidate < current {
                    cost.insert(v, candidate);
                    parent.insert(v, u);
                }
            }
        }
    }

    let mut next_hops = BTreeMap::new();
    for (&dest, &c) in &cost {
        if dest == source || c.is_infinite() {
            continue;
        }
        if let Some(hop) = first_hop(&parent, source, dest) {
            next_hops.insert(dest, hop);
        }
    }
    cost.retain(|_, c| c.is_finite());

    ShortestPaths {
        costs: cost,
        next_hops,
    }
}

fn first_hop(parent: &BTreeMap<NodeId, NodeId>, source: NodeId, dest: NodeId) -> Option<NodeId> {
    let mut current = dest;
    loop {
        match parent.get(&current) {
            Some(&p) if p == source => return Some(current),
            Some(&p) => current = p,
            None => return None,
        }
    }
}
