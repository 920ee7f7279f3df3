use futures::future::join_all;
use reqwest::Client;
use tracing::warn;

use crate::types::StorageNode;
use rendezvous::RendezvousHash;

// Upper bound on concurrent probes in the bulk helper. Selection of a single
// node stays strictly sequential (see StorageNodeSelector::select); this only
// applies when a caller wants several healthy nodes at once.
const HEALTH_CHECK_BATCH_SIZE: usize = 5;

/// Probes `{endpoint}/health_check`. Status 200 means healthy; any other
/// status, timeout, or connection error means unhealthy. Never fails: health
/// checking only ever answers yes or no.
pub async fn is_node_healthy(client: &Client, endpoint: &str) -> bool {
    let url = format!("{}/health_check", endpoint);
    match client.get(&url).send().await {
        Ok(response) if response.status() == reqwest::StatusCode::OK => true,
        Ok(response) => {
            warn!(
                endpoint = endpoint,
                status = response.status().as_u16(),
                "storage node failed health check"
            );
            false
        }
        Err(err) => {
            warn!(
                endpoint = endpoint,
                error = %err,
                "storage node health check errored"
            );
            false
        }
    }
}

/// Picks up to `n` healthy nodes. When `cid` is given, candidates are walked
/// in rendezvous order for that cid, so the result is the healthy prefix of
/// the placement order; otherwise candidates are walked as provided.
///
/// Probes run in parallel batches for throughput, unlike the single-node
/// selection path, which wants the first healthy node in preference order
/// and short-circuits instead.
pub async fn get_n_storage_nodes(
    nodes: &[StorageNode],
    n: usize,
    cid: Option<&str>,
    client: &Client,
) -> Vec<StorageNode> {
    let candidates: Vec<StorageNode> = match cid {
        Some(cid) => {
            let hash = RendezvousHash::new(nodes.iter().map(|node| node.id()));
            let ordered = hash.get_n(nodes.len(), cid);
            ordered
                .iter()
                .filter_map(|id| nodes.iter().find(|node| &node.id() == id))
                .cloned()
                .collect()
        }
        None => nodes.to_vec(),
    };

    let mut healthy = Vec::with_capacity(n);
    for batch in candidates.chunks(HEALTH_CHECK_BATCH_SIZE) {
        if healthy.len() >= n {
            break;
        }
        let checks = join_all(
            batch
                .iter()
                .map(|node| is_node_healthy(client, &node.endpoint)),
        )
        .await;
        for (node, ok) in batch.iter().zip(checks) {
            if ok && healthy.len() < n {
                healthy.push(node.clone());
            }
        }
    }

    if healthy.len() < n {
        warn!(
            wanted = n,
            found = healthy.len(),
            "found fewer healthy storage nodes than requested"
        );
    }
    healthy
}
