use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RoutingRecord;
use crate::NodeId;

/// Best-known cost per destination, as exchanged between direct neighbors.
/// `f64::INFINITY` means unreachable.
pub type DistanceVector = BTreeMap<NodeId, f64>;

/// Message exchanged between nodes through the simulator's event queue.
/// Each forwarded copy is an owned clone, never a shared reference, so a
/// node may freely mutate its outbound copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoutingMessage {
    LinkState(LinkStateAdvert),
    DistanceVector(DistanceVectorAdvert),
}

/// A flooded link-state advertisement: one sequence-numbered link record,
/// forwarded unmodified by every node that accepts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkStateAdvert {
    pub origin: NodeId,
    pub seq: u64,
    pub link: RoutingRecord,
}

/// A node's full current distance vector, sent to direct neighbors only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceVectorAdvert {
    pub origin: NodeId,
    pub vector: DistanceVector,
}
