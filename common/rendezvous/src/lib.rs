//! Weighted rendezvous (highest-random-weight) hashing.
//!
//! Given a set of node identifiers and a lookup key, produces a total order
//! over the nodes such that the relative order of any two nodes depends only
//! on those two nodes and the key. Adding or removing a node only moves that
//! node's own position, so placement is minimally disrupted when the node set
//! changes, and every client that knows the same node set agrees on the same
//! order without coordination.

use sha2::{Digest, Sha256};

/// Ranks a fixed set of node identifiers for arbitrary lookup keys.
///
/// Node identifiers are kept in insertion order. There is no removal
/// operation; callers rebuild the hash when the node set shrinks.
#[derive(Debug, Clone, Default)]
pub struct RendezvousHash {
    nodes: Vec<String>,
}

impl RendezvousHash {
    pub fn new(nodes: impl IntoIterator<Item = String>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Appends more node identifiers after construction.
    pub fn add(&mut self, nodes: impl IntoIterator<Item = String>) {
        self.nodes.extend(nodes);
    }

    /// All registered node identifiers, in insertion order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// The top-ranked node for `key`, or `None` if no nodes are registered.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_n(1, key).into_iter().next()
    }

    /// The top `n` nodes for `key`, in rank order. If `n` exceeds the node
    /// count, all nodes are returned ordered.
    pub fn get_n(&self, n: usize, key: &str) -> Vec<String> {
        let scored = self
            .nodes
            .iter()
            .map(|node| (score(node, key), node.clone()))
            .collect();
        let mut ordered = order_by_score(scored);
        ordered.truncate(n);
        ordered
    }
}

/// Hex-rendered SHA-256 of the node identifier concatenated with the key.
///
/// The score convention (and the ascending sort below) must match every other
/// client implementation bit-for-bit: independent clients rely on agreeing on
/// the same node order for the same key. Hex rendering is fixed-width
/// lowercase, so comparing scores lexicographically compares digests bytewise.
fn score(node: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(node.as_bytes());
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sorts ascending by score, breaking score ties by ascending node
/// identifier. The tie-break keeps the order reproducible even if two scores
/// ever coincide.
fn order_by_score(mut scored: Vec<(String, String)>) -> Vec<String> {
    scored.sort();
    scored.into_iter().map(|(_, node)| node).collect()
}
