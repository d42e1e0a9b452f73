use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::NodeId;

/// A directed edge of the simulated topology. Latency is the edge weight
/// used for shortest-path computation; bandwidth is carried but does not
/// influence route selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub src: NodeId,
    pub dest: NodeId,
    pub bandwidth: f64,
    pub latency: f64,
}

impl Link {
    pub fn new(src: NodeId, dest: NodeId, bandwidth: f64, latency: f64) -> Result<Self> {
        if latency < 0.0 {
            return Err(RoutingError::InvariantViolation(format!(
                "link {}->{} has negative latency {}",
                src, dest, latency
            )));
        }
        Ok(Self {
            src,
            dest,
            bandwidth,
            latency,
        })
    }

    /// Link identity is the (src, dest) pair; bandwidth and latency do not
    /// participate in matching.
    pub fn matches(&self, other: &Link) -> bool {
        self.src == other.src && self.dest == other.dest
    }
}
