//! Storage node selection for content-addressed blobs.
//!
//! Clients of a decentralized storage network need to agree, without
//! coordination, on which nodes hold a given content id, and need a healthy
//! node to talk to right now. This crate provides both: rendezvous-hash
//! placement orderings per cid, and a stateful [`StorageNodeSelector`] that
//! tracks the registered node set via a discovery service and walks its own
//! session ordering with health-checked failover.
//!
//! Selection never returns errors: unhealthy nodes are skipped, a fully
//! exhausted node set yields `None` plus a one-shot
//! [`StorageNodeSelector::tried_selecting_all_nodes`] signal, and discovery
//! outages degrade to the last-known (or bootstrap) node list.

// We do this pattern (privately use a module, then re-export parts of it) so
// we can futz around with the internals without breaking the public API

// Types
mod types;
pub use types::StorageNode;

// Config
mod config;
pub use config::SelectorConfig;

// Errors (internal to refresh; selection APIs never return these)
mod error;
pub use error::DiscoveryError;

// Discovery
mod discovery;
pub use discovery::DiscoveryClient;

// Health probing
mod health;
pub use health::get_n_storage_nodes;
pub use health::is_node_healthy;

// Selector
mod selector;
pub use selector::SelectionState;
pub use selector::StorageNodeSelector;
