use thiserror::Error;

/// Errors from refreshing the node set against the discovery service. These
/// never cross the selection API: the selector logs them and keeps operating
/// on its last-known node list.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("discovery health check returned status {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("discovery health check response is missing content nodes")]
    MissingContentNodes,
}
