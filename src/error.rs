use thiserror::Error;

use crate::NodeId;

/// Errors surfaced by the routing engine.
///
/// Stale or duplicate routing messages are not errors: they are discarded
/// silently with no state change and no re-broadcast.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// A caller or scheduler bug: the engine's preconditions were violated.
    /// Fatal, not meant to be recovered from.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The forwarding table has no entry for the destination. A normal
    /// outcome for unreachable or not-yet-discovered nodes.
    #[error("no route to node {0}")]
    NoRoute(NodeId),
}

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;
