use serde::{Deserialize, Serialize};
use std::fs;
use anyhow::Result;

/// Routing algorithm run by a node, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingMode {
    LinkState,
    DistanceVector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub mode: RoutingMode,
    /// Upper bound on network size, used only to size distance-vector storage.
    pub max_nodes: usize,
    /// Sequence number assigned to a locally-originated link record before
    /// its first advertisement.
    pub initial_sequence: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: RoutingMode::LinkState,
            max_nodes: 20,
            initial_sequence: 100,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
