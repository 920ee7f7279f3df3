use reqwest::Client;
use serde::Deserialize;

use crate::error::DiscoveryError;
use crate::types::StorageNode;

// The slice of the discovery /health_check response we care about. Every
// level is optional on the wire; a response missing the node list is treated
// the same as a failed request.
#[derive(Debug, Deserialize)]
struct HealthCheckResponse {
    data: Option<HealthCheckData>,
}

#[derive(Debug, Deserialize)]
struct HealthCheckData {
    network: Option<NetworkInfo>,
}

#[derive(Debug, Deserialize)]
struct NetworkInfo {
    content_nodes: Option<Vec<StorageNode>>,
}

/// Thin client for the discovery service's health check, which doubles as
/// the authoritative registry of storage nodes.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    client: Client,
    endpoint: String,
}

impl DiscoveryClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the currently-registered storage nodes.
    pub async fn fetch_content_nodes(&self) -> Result<Vec<StorageNode>, DiscoveryError> {
        let url = format!("{}/health_check", self.endpoint);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::BadStatus(response.status()));
        }

        let body: HealthCheckResponse = response.json().await?;
        body.data
            .and_then(|data| data.network)
            .and_then(|network| network.content_nodes)
            .ok_or(DiscoveryError::MissingContentNodes)
    }
}
