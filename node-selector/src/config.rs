use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::StorageNode;

// A selector config object, designed to be passable across API boundaries
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SelectorConfig {
    /// Nodes to use before (or instead of, if it is unreachable) the
    /// authoritative list from the discovery service.
    pub bootstrap_nodes: Vec<StorageNode>,
    /// Base URL of the discovery service whose `/health_check` response
    /// carries the registered storage nodes.
    pub discovery_endpoint: String,
    pub health_check_timeout_seconds: Option<u64>, // Default to 3
}

impl SelectorConfig {
    pub fn new(bootstrap_nodes: Vec<StorageNode>, discovery_endpoint: impl Into<String>) -> Self {
        Self {
            bootstrap_nodes,
            discovery_endpoint: discovery_endpoint.into(),
            health_check_timeout_seconds: None,
        }
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_secs(self.health_check_timeout_seconds.unwrap_or(3))
    }
}
