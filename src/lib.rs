pub mod algorithms;
pub mod config;
pub mod error;
pub mod network;
pub mod protocol;

pub type NodeId = u32;

pub use config::{EngineConfig, RoutingMode};
pub use error::{Result, RoutingError};
pub use network::{Link, SimulationContext};
pub use protocol::{
    DistanceVector, DistanceVectorAdvert, LinkStateAdvert, Node, RouteTable, RoutingMessage,
    RoutingRecord,
};
