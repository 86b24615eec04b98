//! Pool snapshots, snapshot providers and the built-graph cache

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha3::{Digest, Keccak256};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::graph::LiquidityGraph;
use crate::domain::pool::Pool;
use crate::shared::errors::RouterError;

/// Immutable set of pools observed at one point in time
#[derive(Clone)]
pub struct PoolSnapshot {
    pub pools: Vec<Arc<dyn Pool>>,
    pub fetched_at: DateTime<Utc>,
}

impl PoolSnapshot {
    pub fn new(pools: Vec<Arc<dyn Pool>>) -> Self {
        Self {
            pools,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Hex-encoded Keccak256 over the sorted pool-id set.
    ///
    /// Two snapshots with the same pools hash identically regardless of pool
    /// order, so the hash can key a cache of built graphs.
    pub fn content_hash(&self) -> String {
        let mut ids: Vec<&str> = self.pools.iter().map(|p| p.id().0.as_str()).collect();
        ids.sort_unstable();

        let mut hasher = Keccak256::new();
        for id in ids {
            hasher.update(id.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}

/// Source of pool snapshots; the single async boundary of the router.
///
/// Implementations map their transport failures to
/// `RouterError::SnapshotUnavailable`.
#[async_trait]
pub trait PoolSnapshotProvider: Send + Sync {
    async fn fetch_pools(&self) -> Result<PoolSnapshot, RouterError>;
}

/// Cache of built liquidity graphs keyed by snapshot content hash
pub struct GraphCache {
    graphs: RwLock<HashMap<String, Arc<LiquidityGraph>>>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self {
            graphs: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached graph for the snapshot, building it on a miss
    pub async fn get_or_build(
        &self,
        snapshot: &PoolSnapshot,
        max_paths_per_token_pair: usize,
    ) -> Result<Arc<LiquidityGraph>, RouterError> {
        let key = snapshot.content_hash();

        if let Some(graph) = self.graphs.read().await.get(&key) {
            debug!(key = %key, "graph cache hit");
            return Ok(Arc::clone(graph));
        }

        let graph = Arc::new(LiquidityGraph::build(
            &snapshot.pools,
            max_paths_per_token_pair,
        )?);

        let mut graphs = self.graphs.write().await;
        let entry = graphs.entry(key).or_insert_with(|| Arc::clone(&graph));
        Ok(Arc::clone(entry))
    }

    pub async fn len(&self) -> usize {
        self.graphs.read().await.len()
    }

    pub async fn clear(&self) {
        self.graphs.write().await.clear();
    }
}

impl Default for GraphCache {
    fn default() -> Self {
        Self::new()
    }
}
