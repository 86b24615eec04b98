//! Liquidity graph construction.
//!
//! Converts a flat pool snapshot into a directed multigraph whose nodes are
//! token addresses and whose edges are (pool, token_in, token_out) triples.
//! The graph is built once per snapshot and is read-only during search;
//! adjacency uses ordered maps so that iteration, and therefore the whole
//! search, is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use alloy_primitives::Address;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::pool::Pool;
use crate::domain::token::Token;
use crate::shared::errors::RouterError;

/// Directed edge: one pool traded from `token_in` to `token_out`
#[derive(Clone)]
pub struct PoolEdge {
    pub pool: Arc<dyn Pool>,
    pub token_in: Token,
    pub token_out: Token,
    pub liquidity: Decimal,
    /// The pool's own pool-token is among its members (boosted linkage)
    pub phantom_bearing: bool,
}

impl fmt::Debug for PoolEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolEdge")
            .field("pool", self.pool.id())
            .field("token_in", &self.token_in.symbol)
            .field("token_out", &self.token_out.symbol)
            .field("liquidity", &self.liquidity)
            .field("phantom_bearing", &self.phantom_bearing)
            .finish()
    }
}

/// Directed multigraph of tokens connected by pools
#[derive(Debug)]
pub struct LiquidityGraph {
    adjacency: BTreeMap<Address, BTreeMap<Address, Vec<PoolEdge>>>,
    tokens: BTreeMap<Address, Token>,
    /// Pool-token addresses of phantom-bearing pools ("boosted" tokens)
    boosted_tokens: BTreeSet<Address>,
    max_paths_per_token_pair: usize,
}

impl LiquidityGraph {
    /// Build a graph from a pool snapshot.
    ///
    /// For every pool and every unordered pair of its member tokens, both
    /// directed orientations become candidate edges ranked by the pool's
    /// liquidity metric for that ordered pair. Per ordered pair, the top
    /// `max_paths_per_token_pair` edges are kept; edges of phantom-bearing
    /// pools are kept regardless of rank.
    pub fn build(
        pools: &[Arc<dyn Pool>],
        max_paths_per_token_pair: usize,
    ) -> Result<Self, RouterError> {
        if max_paths_per_token_pair < 1 {
            return Err(RouterError::ConfigInvalid(
                "max_paths_per_token_pair must be at least 1".to_string(),
            ));
        }

        let mut groups: BTreeMap<(Address, Address), Vec<PoolEdge>> = BTreeMap::new();
        let mut boosted_tokens = BTreeSet::new();

        for pool in pools {
            let members = pool.tokens();
            if members.len() < 2 {
                debug!(pool = %pool.id(), "skipping pool with fewer than 2 tokens");
                continue;
            }

            let phantom_bearing = members.iter().any(|t| t.address == pool.address());
            if phantom_bearing {
                boosted_tokens.insert(pool.address());
            }

            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    for (a, b) in [(i, j), (j, i)] {
                        let token_in = &members[a];
                        let token_out = &members[b];
                        match pool.liquidity_metric(token_in, token_out) {
                            Ok(liquidity) => {
                                groups
                                    .entry((token_in.address, token_out.address))
                                    .or_default()
                                    .push(PoolEdge {
                                        pool: Arc::clone(pool),
                                        token_in: token_in.clone(),
                                        token_out: token_out.clone(),
                                        liquidity,
                                        phantom_bearing,
                                    });
                            }
                            Err(e) => {
                                warn!(
                                    pool = %pool.id(),
                                    token_in = %token_in.symbol,
                                    token_out = %token_out.symbol,
                                    error = %e,
                                    "liquidity metric unavailable, dropping edge"
                                );
                            }
                        }
                    }
                }
            }
        }

        let mut adjacency: BTreeMap<Address, BTreeMap<Address, Vec<PoolEdge>>> = BTreeMap::new();
        let mut tokens = BTreeMap::new();
        let mut edge_count = 0usize;

        for ((from, to), mut edges) in groups {
            edges.sort_by(|a, b| {
                b.liquidity
                    .cmp(&a.liquidity)
                    .then_with(|| a.pool.id().cmp(b.pool.id()))
            });

            let kept: Vec<PoolEdge> = edges
                .into_iter()
                .enumerate()
                .filter(|(rank, edge)| *rank < max_paths_per_token_pair || edge.phantom_bearing)
                .map(|(_, edge)| edge)
                .collect();

            if kept.is_empty() {
                continue;
            }

            for edge in &kept {
                tokens.insert(edge.token_in.address, edge.token_in.clone());
                tokens.insert(edge.token_out.address, edge.token_out.clone());
            }
            edge_count += kept.len();
            adjacency.entry(from).or_default().insert(to, kept);
        }

        info!(
            tokens = tokens.len(),
            edges = edge_count,
            pools = pools.len(),
            "liquidity graph built"
        );

        Ok(Self {
            adjacency,
            tokens,
            boosted_tokens,
            max_paths_per_token_pair,
        })
    }

    pub fn contains_token(&self, address: Address) -> bool {
        self.tokens.contains_key(&address)
    }

    pub fn token(&self, address: Address) -> Option<&Token> {
        self.tokens.get(&address)
    }

    /// Ranked parallel edges from `from` to `to` (most liquid first)
    pub fn edges(&self, from: Address, to: Address) -> &[PoolEdge] {
        self.adjacency
            .get(&from)
            .and_then(|targets| targets.get(&to))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Successor tokens reachable from `from`, in address order
    pub fn successors(&self, from: Address) -> impl Iterator<Item = Address> + '_ {
        self.adjacency
            .get(&from)
            .into_iter()
            .flat_map(|targets| targets.keys().copied())
    }

    /// Whether the token is a phantom-bearing pool's own pool-token
    pub fn is_boosted_token(&self, address: Address) -> bool {
        self.boosted_tokens.contains(&address)
    }

    pub fn max_paths_per_token_pair(&self) -> usize {
        self.max_paths_per_token_pair
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}
