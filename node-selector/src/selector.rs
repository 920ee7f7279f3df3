use std::sync::RwLock;

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::SelectorConfig;
use crate::discovery::DiscoveryClient;
use crate::health::is_node_healthy;
use crate::types::StorageNode;
use rendezvous::RendezvousHash;

/// Where the selector is in its walk over the current node ordering.
///
/// Transitions:
/// - `HealthyOnly -> FailedAll`: a selection pass reached the end of the
///   ordering without finding a healthy node.
/// - `FailedAll -> HealthyOnly`: the next `select` call resets before
///   retrying, and a successful node-set refresh also resets. `FailedAll` is
///   a one-shot "everyone was down just now" signal, not a lockout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    HealthyOnly,
    FailedAll,
}

// Mutable selector state, all behind one lock. The lock is only held for
// reads/writes of these fields, never across a health probe.
struct SelectorState {
    /// Current known nodes, replaced wholesale on each successful refresh.
    nodes: Vec<StorageNode>,
    /// Cached rendezvous ordering (lowercased endpoints) keyed by a
    /// session timestamp. Computed lazily, only when empty.
    ordered_nodes: Vec<String>,
    /// Last node chosen by a selection pass, if any.
    selected: Option<String>,
    selection_state: SelectionState,
}

/// Picks which storage node a client should talk to.
///
/// Holds the current set of storage nodes (bootstrap list until a discovery
/// refresh succeeds) and answers two kinds of queries: the rendezvous
/// placement order for a specific cid (`get_nodes`), and a memoized "one node
/// to use right now" with health-checked failover (`get_selected_node`).
///
/// Expected to live as a long-lived instance per logical session.
pub struct StorageNodeSelector {
    config: SelectorConfig,
    client: Client,
    discovery: DiscoveryClient,
    state: RwLock<SelectorState>,
}

impl StorageNodeSelector {
    /// Builds a selector seeded with the configured bootstrap nodes and
    /// awaits one refresh from the discovery service. Refresh failure is
    /// non-fatal: the selector stays on the bootstrap list and the failure
    /// is logged.
    pub async fn new(config: SelectorConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.health_check_timeout())
            .build()?;
        let discovery = DiscoveryClient::new(client.clone(), config.discovery_endpoint.clone());

        let selector = Self {
            state: RwLock::new(SelectorState {
                nodes: dedupe_nodes(config.bootstrap_nodes.clone()),
                ordered_nodes: Vec::new(),
                selected: None,
                selection_state: SelectionState::HealthyOnly,
            }),
            config,
            client,
            discovery,
        };

        selector.update_available_storage_nodes().await;
        Ok(selector)
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// The rendezvous placement order for `cid` over all currently-known
    /// nodes (lowercased endpoints, best first). No health filtering and no
    /// caching: replicas of a content-addressed object live on a predictable
    /// prefix of this order, so any client can locate them without a lookup
    /// table.
    pub fn get_nodes(&self, cid: &str) -> Vec<String> {
        let state = self.state.read().expect("poisoned selector lock");
        let hash = RendezvousHash::new(state.nodes.iter().map(|node| node.id()));
        hash.get_n(state.nodes.len(), cid)
    }

    /// The current known nodes, bootstrap or refreshed.
    pub fn storage_nodes(&self) -> Vec<StorageNode> {
        let state = self.state.read().expect("poisoned selector lock");
        state.nodes.clone()
    }

    /// The node to use right now. Memoized: once a selection pass has found
    /// a healthy node, it is returned without further probing until
    /// `force_reselect` is passed or a pass exhausts the ordering. Returns
    /// `None` when no healthy node is currently known; check
    /// `tried_selecting_all_nodes` to distinguish exhaustion from
    /// not-yet-selected.
    pub async fn get_selected_node(&self, force_reselect: bool) -> Option<String> {
        if !force_reselect {
            let state = self.state.read().expect("poisoned selector lock");
            if let Some(selected) = &state.selected {
                return Some(selected.clone());
            }
        }
        self.select().await
    }

    /// True in the window between a selection pass exhausting every node and
    /// the next selection attempt.
    pub fn tried_selecting_all_nodes(&self) -> bool {
        let state = self.state.read().expect("poisoned selector lock");
        state.selection_state == SelectionState::FailedAll
    }

    /// Refreshes the node set from the discovery service's health check. On
    /// any failure the previous list is kept and a warning is logged; there
    /// is no retry scheduling here, callers decide when to refresh again.
    pub async fn update_available_storage_nodes(&self) {
        match self.discovery.fetch_content_nodes().await {
            Ok(nodes) => {
                let nodes = dedupe_nodes(nodes);
                debug!(
                    count = nodes.len(),
                    endpoint = self.discovery.endpoint(),
                    "refreshed storage node list"
                );
                let mut state = self.state.write().expect("poisoned selector lock");
                state.nodes = nodes;
                // A refreshed list does not invalidate the cached ordering or
                // an in-flight selection; only the exhaustion signal resets.
                // Invalidating here would thrash selections mid-session.
                state.selection_state = SelectionState::HealthyOnly;
            }
            Err(err) => {
                warn!(
                    endpoint = self.discovery.endpoint(),
                    error = %err,
                    "failed to refresh storage nodes, keeping previous list"
                );
            }
        }
    }

    // One selection pass: walk the cached ordering from just after the
    // currently-selected node, probing sequentially, and stop at the first
    // healthy node. Sequential on purpose: we want the first healthy node in
    // preference order, and short-circuiting avoids probing lower-ranked
    // nodes once a winner is found.
    async fn select(&self) -> Option<String> {
        let candidates = {
            let mut state = self.state.write().expect("poisoned selector lock");

            if state.selection_state == SelectionState::FailedAll {
                // Previous pass exhausted everyone; reset and try again.
                state.selection_state = SelectionState::HealthyOnly;
            }

            if state.ordered_nodes.is_empty() {
                // Session-scoped ordering: keyed by the current timestamp,
                // not by any content id, so each selector instance gets its
                // own deterministic walk order.
                let session_key = Utc::now().timestamp_millis().to_string();
                let hash = RendezvousHash::new(state.nodes.iter().map(|node| node.id()));
                state.ordered_nodes = hash.get_n(state.nodes.len(), &session_key);
            }

            let resume_at = match &state.selected {
                Some(selected) => state
                    .ordered_nodes
                    .iter()
                    .position(|node| node == selected)
                    .map(|pos| pos + 1)
                    .unwrap_or(0),
                None => 0,
            };
            state.ordered_nodes[resume_at.min(state.ordered_nodes.len())..].to_vec()
        };

        for candidate in candidates {
            if is_node_healthy(&self.client, &candidate).await {
                debug!(node = %candidate, "selected storage node");
                let mut state = self.state.write().expect("poisoned selector lock");
                state.selected = Some(candidate.clone());
                state.selection_state = SelectionState::HealthyOnly;
                return Some(candidate);
            }
        }

        warn!("exhausted all storage nodes without finding a healthy one");
        let mut state = self.state.write().expect("poisoned selector lock");
        state.selected = None;
        state.selection_state = SelectionState::FailedAll;
        None
    }
}

// Ordering identity is the lowercased endpoint, so duplicates would make two
// nodes indistinguishable to the hash. First occurrence wins.
fn dedupe_nodes(nodes: Vec<StorageNode>) -> Vec<StorageNode> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        if seen.insert(node.id()) {
            out.push(node);
        } else {
            warn!(
                endpoint = %node.endpoint,
                "dropping storage node with duplicate endpoint"
            );
        }
    }
    out
}
