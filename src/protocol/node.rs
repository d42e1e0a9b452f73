use log::debug;

use super::messages::{DistanceVectorAdvert, LinkStateAdvert, RoutingMessage};
use super::routing_table::{DistanceVectorTable, LinkStateTable, RouteTable};
use crate::config::{EngineConfig, RoutingMode};
use crate::error::{Result, RoutingError};
use crate::network::{Link, SimulationContext};
use crate::NodeId;

/// One simulated router. Owns its routing state exclusively; all
/// communication with the rest of the network goes through the scheduler
/// as value-copied `RoutingMessage` events. Handlers are invoked by the
/// scheduler one at a time, so nothing here needs synchronization.
pub struct Node {
    id: NodeId,
    table: RouteTable,
}

impl Node {
    /// Construct a node in the mode the config selects. There is no
    /// default construction; the mode is fixed for the node's lifetime.
    pub fn new(id: NodeId, config: &EngineConfig) -> Self {
        let table = match config.mode {
            RoutingMode::LinkState => RouteTable::LinkState(LinkStateTable::new(id, config)),
            RoutingMode::DistanceVector => {
                RouteTable::DistanceVector(DistanceVectorTable::new(id, config))
            }
        };
        Self { id, table }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// A link departing from this node changed. Integrates the update and,
    /// if routing state changed, advertises the new state to all current
    /// neighbors. A link whose source is not this node is a scheduler bug.
    pub fn on_link_update(&mut self, ctx: &mut dyn SimulationContext, link: &Link) -> Result<()> {
        if link.src != self.id {
            return Err(RoutingError::InvariantViolation(format!(
                "node {} got a link update originating at node {}",
                self.id, link.src
            )));
        }

        let outbound = match &mut self.table {
            RouteTable::LinkState(table) => {
                if table.integrate_link(link) {
                    // advertise the stored record, sequence number already bumped
                    let record = table.record(link.src, link.dest).ok_or_else(|| {
                        RoutingError::InvariantViolation(format!(
                            "record for {} -> {} missing after integration",
                            link.src, link.dest
                        ))
                    })?;
                    Some(RoutingMessage::LinkState(LinkStateAdvert {
                        origin: self.id,
                        seq: record.seq,
                        link: record.clone(),
                    }))
                } else {
                    None
                }
            }
            RouteTable::DistanceVector(table) => {
                if table.integrate_neighbor_latency(link.dest, link.latency) {
                    Some(RoutingMessage::DistanceVector(DistanceVectorAdvert {
                        origin: self.id,
                        vector: table.own_vector().clone(),
                    }))
                } else {
                    None
                }
            }
        };

        if let Some(message) = outbound {
            self.send_to_neighbors(ctx, &message);
        }
        Ok(())
    }

    /// A routing message arrived from a neighbor. On a state change,
    /// link-state floods the received advertisement onward unmodified;
    /// distance-vector broadcasts this node's own recomputed vector.
    pub fn on_routing_message(
        &mut self,
        ctx: &mut dyn SimulationContext,
        msg: RoutingMessage,
    ) -> Result<()> {
        let id = self.id;
        let outbound = match (&mut self.table, msg) {
            (RouteTable::LinkState(table), RoutingMessage::LinkState(advert)) => table
                .integrate_message(&advert)
                .then_some(RoutingMessage::LinkState(advert)),
            (RouteTable::DistanceVector(table), RoutingMessage::DistanceVector(advert)) => table
                .integrate_vector(advert.origin, advert.vector)
                .then(|| {
                    RoutingMessage::DistanceVector(DistanceVectorAdvert {
                        origin: id,
                        vector: table.own_vector().clone(),
                    })
                }),
            (_, msg) => {
                return Err(RoutingError::InvariantViolation(format!(
                    "node {} received a {:?} for the wrong routing mode",
                    id, msg
                )));
            }
        };

        if let Some(message) = outbound {
            self.send_to_neighbors(ctx, &message);
        }
        Ok(())
    }

    /// Periodic-refresh hook, currently unused.
    pub fn on_timeout(&mut self, _ctx: &mut dyn SimulationContext) {
        debug!("node {}: timeout ignored", self.id);
    }

    /// Next hop toward `destination`, which must be a current neighbor.
    pub fn next_hop(&self, ctx: &dyn SimulationContext, destination: NodeId) -> Result<NodeId> {
        let hop = self.table.next_hop(destination)?;
        if hop == self.id {
            // distance-vector self-lookup: nothing to forward
            return Err(RoutingError::NoRoute(destination));
        }
        if !ctx.neighbors_of(self.id).contains(&hop) {
            return Err(RoutingError::InvariantViolation(format!(
                "node {}: next hop {} toward {} is not a current neighbor",
                self.id, hop, destination
            )));
        }
        Ok(hop)
    }

    /// Snapshot of the routing state. A copy, not a live alias, so holders
    /// cannot mutate the node from outside.
    pub fn routing_table(&self) -> RouteTable {
        self.table.clone()
    }

    fn send_to_neighbors(&self, ctx: &mut dyn SimulationContext, message: &RoutingMessage) {
        let now = ctx.now();
        let links = ctx.outgoing_links(self.id);
        for neighbor in ctx.neighbors_of(self.id) {
            if let Some(link) = links.iter().find(|l| l.dest == neighbor) {
                ctx.schedule_delivery(now + link.latency, neighbor, message.clone());
            }
        }
    }
}
