use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::protocol::DistanceVector;
use crate::NodeId;

/// Result of one relaxation step: the node's new best-estimate vector and
/// the forwarding table realizing it. Unreachable destinations appear in
/// neither map.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    pub vector: DistanceVector,
    pub next_hops: BTreeMap<NodeId, NodeId>,
}

/// One distributed Bellman-Ford step against the latest stored neighbor
/// vectors: for every known destination d,
/// `cost[d] = min over direct neighbors n of direct[n] + vector[n][d]`.
///
/// A neighbor's cost to itself counts as 0 even before it has reported a
/// vector, so a fresh direct link yields a route on its own. Unknown
/// entries count as infinite. Ties resolve to the lowest neighbor id
/// because `direct` iterates in ascending order under strict `<`.
pub fn relax(
    self_id: NodeId,
    direct: &BTreeMap<NodeId, f64>,
    vectors: &HashMap<NodeId, DistanceVector>,
) -> Relaxation {
    let mut destinations: BTreeSet<NodeId> = BTreeSet::new();
    destinations.insert(self_id);
    destinations.extend(direct.keys());
    for (neighbor, vector) in vectors {
        destinations.insert(*neighbor);
        destinations.extend(vector.keys());
    }

    let mut result = DistanceVector::new();
    let mut next_hops = BTreeMap::new();
    result.insert(self_id, 0.0);

    for &dest in &destinations {
        if dest == self_id {
            continue;
        }
        let mut best: Option<(NodeId, f64)> = None;
        for (&neighbor, &link_cost) in direct {
            let via = if neighbor == dest {
                0.0
            } else {
                vectors
                    .get(&neighbor)
                    .and_then(|v| v.get(&dest))
                    .copied()
                    .unwrap_or(f64::INFINITY)
            };
            let total = link_cost + via;
            if total.is_finite() && best.is_none_or(|(_, c)| total < c) {
                best = Some((neighbor, total));
            }
        }
        if let Some((neighbor, cost)) = best {
            result.insert(dest, cost);
            next_hops.insert(dest, neighbor);
        }
    }

    Relaxation {
        vector: result,
        next_hops,
    }
}
