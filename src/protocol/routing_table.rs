use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::messages::{DistanceVector, LinkStateAdvert};
use crate::algorithms::{dijkstra, distance_vector};
use crate::config::EngineConfig;
use crate::error::{Result, RoutingError};
use crate::network::Link;
use crate::NodeId;

/// Per-edge state flooded through the network in link-state mode. The
/// sequence number is owned by the edge's source node, strictly increases
/// per advertisement, and is the sole ordering/duplicate-detection
/// mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRecord {
    pub src: NodeId,
    pub dest: NodeId,
    pub bandwidth: f64,
    pub latency: f64,
    pub seq: u64,
}

impl RoutingRecord {
    fn from_link(link: &Link, seq: u64) -> Self {
        Self {
            src: link.src,
            dest: link.dest,
            bandwidth: link.bandwidth,
            latency: link.latency,
            seq,
        }
    }
}

/// Discovered topology: adjacency maps keyed by source node. A node is
/// inserted as a key (possibly with an empty map) before any edge into it
/// is stored.
pub type RouteGraph = BTreeMap<NodeId, BTreeMap<NodeId, RoutingRecord>>;

/// Destination -> next hop. Recomputed wholesale after every accepted
/// update; unreachable destinations are absent, never sentinel-mapped.
pub type ForwardingTable = BTreeMap<NodeId, NodeId>;

/// Routing state of one node, in whichever mode it was constructed with.
/// The mode is fixed for the node's lifetime.
#[derive(Debug, Clone)]
pub enum RouteTable {
    LinkState(LinkStateTable),
    DistanceVector(DistanceVectorTable),
}

impl RouteTable {
    /// Next hop toward `dest`. In distance-vector mode a self-lookup
    /// returns the own id, which callers must treat as "no forwarding
    /// needed" rather than a usable hop.
    pub fn next_hop(&self, dest: NodeId) -> Result<NodeId> {
        match self {
            RouteTable::LinkState(t) => {
                t.rt.get(&dest).copied().ok_or(RoutingError::NoRoute(dest))
            }
            RouteTable::DistanceVector(t) => {
                if dest == t.id {
                    return Ok(t.id);
                }
                t.rt.get(&dest).copied().ok_or(RoutingError::NoRoute(dest))
            }
        }
    }

    /// Current best-known cost to `dest`, if reachable.
    pub fn path_cost(&self, dest: NodeId) -> Option<f64> {
        match self {
            RouteTable::LinkState(t) => t.costs.get(&dest).copied(),
            RouteTable::DistanceVector(t) => t.self_vector.get(&dest).copied(),
        }
    }

    pub fn forwarding_table(&self) -> &ForwardingTable {
        match self {
            RouteTable::LinkState(t) => &t.rt,
            RouteTable::DistanceVector(t) => &t.rt,
        }
    }
}

/// Link-state routing state: the full discovered graph plus the forwarding
/// table derived from it by Dijkstra.
#[derive(Debug, Clone)]
pub struct LinkStateTable {
    id: NodeId,
    initial_seq: u64,
    graph: RouteGraph,
    costs: BTreeMap<NodeId, f64>,
    rt: ForwardingTable,
}

impl LinkStateTable {
    pub fn new(id: NodeId, config: &EngineConfig) -> Self {
        let mut graph = RouteGraph::new();
        graph.insert(id, BTreeMap::new());
        Self {
            id,
            initial_seq: config.initial_sequence,
            graph,
            costs: BTreeMap::new(),
            rt: ForwardingTable::new(),
        }
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Record of the (src, dest) edge as currently stored, used to build
    /// the outbound advertisement after a local update.
    pub fn record(&self, src: NodeId, dest: NodeId) -> Option<&RoutingRecord> {
        self.graph.get(&src).and_then(|adj| adj.get(&dest))
    }

    /// Integrate a locally-originated link update. A new edge is stored at
    /// the configured initial sequence number, a refresh overwrites the
    /// record in place; either way the stored sequence number is then
    /// incremented so the resulting advertisement supersedes anything seen
    /// before. Always a state change.
    pub fn integrate_link(&mut self, link: &Link) -> bool {
        self.discover(link.dest);

        let adjacent = self.graph.entry(link.src).or_default();
        match adjacent.get_mut(&link.dest) {
            None => {
                info!("node {}: new link {} -> {}", self.id, link.src, link.dest);
                adjacent.insert(
                    link.dest,
                    RoutingRecord::from_link(link, self.initial_seq + 1),
                );
            }
            Some(record) => {
                debug!("node {}: link refresh {} -> {}", self.id, link.src, link.dest);
                let next_seq = record.seq + 1;
                *record = RoutingRecord::from_link(link, next_seq);
            }
        }

        self.recompute();
        true
    }

    /// Integrate a flooded advertisement. Accept window keyed on the
    /// stored sequence number `cur`: unknown edges and `seq == cur + 1`
    /// are accepted, `seq == cur` is a duplicate, anything else is stale
    /// or out of order and dropped without gap recovery.
    pub fn integrate_message(&mut self, advert: &LinkStateAdvert) -> bool {
        self.discover(advert.link.src);
        self.discover(advert.link.dest);

        let adjacent = self.graph.entry(advert.link.src).or_default();
        let changed = match adjacent.get_mut(&advert.link.dest) {
            None => {
                info!(
                    "node {}: new link {} -> {} (seq {})",
                    self.id, advert.link.src, advert.link.dest, advert.seq
                );
                let mut record = advert.link.clone();
                record.seq = advert.seq;
                adjacent.insert(advert.link.dest, record);
                true
            }
            Some(record) if advert.seq == record.seq => {
                debug!(
                    "node {}: discarding duplicate advert for {} -> {}",
                    self.id, advert.link.src, advert.link.dest
                );
                false
            }
            Some(record) if advert.seq == record.seq + 1 => {
                debug!(
                    "node {}: link update {} -> {} (seq {})",
                    self.id, advert.link.src, advert.link.dest, advert.seq
                );
                record.latency = advert.link.latency;
                record.bandwidth = advert.link.bandwidth;
                record.seq = advert.seq;
                true
            }
            Some(record) => {
                warn!(
                    "node {}: discarding out-of-order advert for {} -> {} (seq {}, have {})",
                    self.id, advert.link.src, advert.link.dest, advert.seq, record.seq
                );
                false
            }
        };

        if changed {
            self.recompute();
        }
        changed
    }

    fn discover(&mut self, node: NodeId) {
        if !self.graph.contains_key(&node) {
            info!("node {}: new node {} discovered", self.id, node);
            self.graph.insert(node, BTreeMap::new());
        }
    }

    fn recompute(&mut self) {
        let paths = dijkstra::shortest_paths(&self.graph, self.id);
        self.costs = paths.costs;
        self.rt = paths.next_hops;
    }
}

/// Distance-vector routing state: direct link costs, the latest vector
/// reported by each neighbor, and the node's own best-estimate vector. No
/// global topology is ever materialized.
#[derive(Debug, Clone)]
pub struct DistanceVectorTable {
    id: NodeId,
    direct: BTreeMap<NodeId, f64>,
    vectors: HashMap<NodeId, DistanceVector>,
    self_vector: DistanceVector,
    rt: ForwardingTable,
}

impl DistanceVectorTable {
    pub fn new(id: NodeId, config: &EngineConfig) -> Self {
        let mut self_vector = DistanceVector::new();
        self_vector.insert(id, 0.0);
        Self {
            id,
            direct: BTreeMap::new(),
            vectors: HashMap::with_capacity(config.max_nodes),
            self_vector,
            rt: ForwardingTable::new(),
        }
    }

    /// The vector this node advertises to its neighbors.
    pub fn own_vector(&self) -> &DistanceVector {
        &self.self_vector
    }

    /// Update the direct-link cost estimate to `neighbor` and re-relax.
    pub fn integrate_neighbor_latency(&mut self, neighbor: NodeId, latency: f64) -> bool {
        self.direct.insert(neighbor, latency);
        self.recompute()
    }

    /// Store `vector` as the latest report from `from` and re-relax.
    pub fn integrate_vector(&mut self, from: NodeId, vector: DistanceVector) -> bool {
        self.vectors.insert(from, vector);
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        let relaxed = distance_vector::relax(self.id, &self.direct, &self.vectors);
        let changed = relaxed.vector != self.self_vector;
        self.self_vector = relaxed.vector;
        self.rt = relaxed.next_hops;
        changed
    }
}
