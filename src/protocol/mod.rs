pub mod messages;
pub mod node;
pub mod routing_table;

pub use messages::{DistanceVector, DistanceVectorAdvert, LinkStateAdvert, RoutingMessage};
pub use node::Node;
pub use routing_table::{
    DistanceVectorTable, ForwardingTable, LinkStateTable, RouteGraph, RouteTable, RoutingRecord,
};
