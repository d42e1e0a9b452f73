pub mod topology;

pub use topology::Link;

use crate::protocol::RoutingMessage;
use crate::NodeId;

/// Contract the surrounding discrete-event simulator fulfils for the
/// routing engine. The scheduler delivers events to node handlers one at a
/// time in nondecreasing simulation-time order, so implementations need no
/// internal synchronization.
pub trait SimulationContext {
    /// Current simulation time.
    fn now(&self) -> f64;

    /// Post `payload` for delivery to `target` at absolute time `at`.
    fn schedule_delivery(&mut self, at: f64, target: NodeId, payload: RoutingMessage);

    /// Current direct neighbors of `node`.
    fn neighbors_of(&self, node: NodeId) -> Vec<NodeId>;

    /// Links currently departing from `node`.
    fn outgoing_links(&self, node: NodeId) -> Vec<Link>;
}
