use serde::{Deserialize, Serialize};

/// One network-addressable storage provider, as advertised by the discovery
/// service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageNode {
    /// Base URL of the node. Hashing and ordering treat the endpoint
    /// case-insensitively; the original casing is preserved here for
    /// display and wallet lookups.
    pub endpoint: String,
    /// Wallet identity of the node operator. Opaque to the selector,
    /// passed through from discovery data.
    #[serde(rename = "delegateOwnerWallet")]
    pub delegate_owner_wallet: String,
}

impl StorageNode {
    pub fn new(endpoint: impl Into<String>, delegate_owner_wallet: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            delegate_owner_wallet: delegate_owner_wallet.into(),
        }
    }

    /// The identity used for rendezvous ordering. Two registered nodes must
    /// never share an id.
    pub fn id(&self) -> String {
        self.endpoint.to_lowercase()
    }
}
