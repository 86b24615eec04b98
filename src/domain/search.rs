//! Constrained path discovery over the liquidity graph.
//!
//! The search iterates a pair-rank index over the graph's ranked parallel
//! edges: rank 0 biases every hop toward the most liquid pool of its pair,
//! rank 1 toward the second most liquid, and so on. For each rank a
//! depth-first single-path search runs repeatedly until it stops producing
//! new unique paths, then the rank advances. Pools used by accepted paths
//! are remembered across the whole call so later paths spread the trade over
//! distinct liquidity sources; when that constraint starves the search below
//! its target path count, it is relaxed once for Plain pools only.

use std::collections::{HashMap, HashSet};

use alloy_primitives::Address;
use tracing::{debug, info};

use crate::domain::graph::LiquidityGraph;
use crate::domain::path::{Hop, Path};
use crate::domain::pool::{LiquidityClass, PoolId};
use crate::shared::config::SearchConfig;
use crate::shared::errors::RouterError;

/// Path discovery over a read-only graph
pub struct PathSearch<'g> {
    graph: &'g LiquidityGraph,
    config: SearchConfig,
}

/// Cross-path state carried across one `find_paths` call
struct SearchState {
    found: Vec<Path>,
    found_keys: HashSet<Vec<(PoolId, Address, Address)>>,
    seen_pools: HashMap<PoolId, LiquidityClass>,
    steps: usize,
}

impl SearchState {
    fn new() -> Self {
        Self {
            found: Vec::new(),
            found_keys: HashSet::new(),
            seen_pools: HashMap::new(),
            steps: 0,
        }
    }

    fn accept(&mut self, path: Path) {
        for hop in path.hops() {
            self.seen_pools
                .insert(hop.pool.id().clone(), hop.pool.liquidity_class());
        }
        self.found_keys.insert(path.key());
        debug!(path = %path, "accepted candidate path");
        self.found.push(path);
    }

    /// Drop Plain pools from the seen set; returns whether anything changed
    fn relax_plain_pools(&mut self) -> bool {
        let before = self.seen_pools.len();
        self.seen_pools
            .retain(|_, class| *class != LiquidityClass::Plain);
        self.seen_pools.len() < before
    }
}

impl<'g> PathSearch<'g> {
    pub fn new(graph: &'g LiquidityGraph, config: SearchConfig) -> Result<Self, RouterError> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    /// Discover candidate paths from `token_in` to `token_out`.
    ///
    /// Tokens absent from the graph yield an empty result, not an error. The
    /// result may exceed `approx_paths_to_return` (a rank round is never
    /// truncated mid-way) and is deterministic for identical inputs.
    pub fn find_paths(&self, token_in: Address, token_out: Address) -> Vec<Path> {
        if !self.graph.contains_token(token_in) || !self.graph.contains_token(token_out) {
            debug!("token pair absent from graph, returning no paths");
            return Vec::new();
        }

        let mut state = SearchState::new();
        self.run_rounds(token_in, token_out, &mut state);

        if state.found.len() < self.config.approx_paths_to_return && state.relax_plain_pools() {
            debug!(
                found = state.found.len(),
                target = self.config.approx_paths_to_return,
                "relaxing seen-pool constraint for plain pools"
            );
            self.run_rounds(token_in, token_out, &mut state);
        }

        info!(
            paths = state.found.len(),
            steps = state.steps,
            "path search finished"
        );
        state.found
    }

    /// One full pass over all pair ranks
    fn run_rounds(&self, token_in: Address, token_out: Address, state: &mut SearchState) {
        for rank in 0..self.graph.max_paths_per_token_pair() {
            if state.found.len() >= self.config.approx_paths_to_return {
                break;
            }
            loop {
                let mut branch = vec![token_in];
                match self.dfs(rank, token_out, &mut branch, state) {
                    Some(path) => state.accept(path),
                    None => break,
                }
            }
        }
    }

    /// Depth-first single-path search; returns the first valid new path
    fn dfs(
        &self,
        rank: usize,
        target: Address,
        branch: &mut Vec<Address>,
        state: &mut SearchState,
    ) -> Option<Path> {
        if state.steps >= self.config.max_search_steps {
            return None;
        }
        state.steps += 1;

        let current = *branch.last()?;

        // direct edge to the target completes the candidate immediately
        if !self.graph.edges(current, target).is_empty() {
            let mut candidate = branch.clone();
            candidate.push(target);
            if self.sequence_within_limits(&candidate, true) {
                if let Some(path) = self.materialize(rank, &candidate, state) {
                    return Some(path);
                }
            }
        }

        // expanding adds one intermediate plus the final target hop
        if branch.len() + 2 > self.config.max_depth {
            return None;
        }

        let (near, far): (Vec<Address>, Vec<Address>) = self
            .graph
            .successors(current)
            .filter(|next| *next != target && !branch.contains(next))
            .partition(|next| !self.graph.edges(*next, target).is_empty());

        // one-step lookahead: successors adjacent to the target come first
        for next in near.into_iter().chain(far) {
            branch.push(next);
            if self.sequence_within_limits(branch, false) {
                if let Some(path) = self.dfs(rank, target, branch, state) {
                    branch.pop();
                    return Some(path);
                }
            }
            branch.pop();
        }

        None
    }

    /// Depth and boosted-hop limits for a token sequence.
    ///
    /// `complete` distinguishes a finished candidate (endpoints excluded from
    /// the intermediate count) from a running branch pruned eagerly.
    fn sequence_within_limits(&self, sequence: &[Address], complete: bool) -> bool {
        if sequence.len() > self.config.max_depth {
            return false;
        }

        let boosted = |address: &Address| self.graph.is_boosted_token(*address);
        if !sequence.iter().any(boosted) {
            // hop count limit for paths with no boosted token
            return sequence.len().saturating_sub(1) <= self.config.max_non_boosted_path_depth;
        }

        let intermediates = if complete {
            &sequence[1..sequence.len() - 1]
        } else {
            &sequence[1..]
        };
        let non_boosted = intermediates.iter().filter(|a| !boosted(a)).count();
        non_boosted <= self.config.max_non_boosted_hop_tokens_in_boosted_path
    }

    /// Reconstruct the pool sequence for a token sequence and validate it.
    ///
    /// Each hop takes the edge at the preferred rank, falling back to rank 0
    /// where fewer parallel edges exist. A candidate in which no hop actually
    /// used the preferred rank duplicates a lower-rank path and is discarded.
    fn materialize(
        &self,
        rank: usize,
        sequence: &[Address],
        state: &SearchState,
    ) -> Option<Path> {
        let mut hops = Vec::with_capacity(sequence.len() - 1);
        let mut used_preferred_rank = false;

        for pair in sequence.windows(2) {
            let edges = self.graph.edges(pair[0], pair[1]);
            let index = if rank < edges.len() {
                used_preferred_rank = true;
                rank
            } else {
                0
            };
            let edge = edges.get(index)?;
            hops.push(Hop {
                pool: edge.pool.clone(),
                token_in: edge.token_in.clone(),
                token_out: edge.token_out.clone(),
            });
        }

        if rank > 0 && !used_preferred_rank {
            return None;
        }

        // validity rules, evaluated in order
        if let Some(allowed) = &self.config.pool_ids_to_include {
            if !hops.iter().all(|hop| allowed.contains(hop.pool.id())) {
                return None;
            }
        }

        if !self.sequence_within_limits(sequence, true) {
            return None;
        }

        let mut pools: HashSet<PoolId> = HashSet::new();
        if !hops.iter().all(|hop| pools.insert(hop.pool.id().clone())) {
            return None;
        }

        if hops
            .iter()
            .any(|hop| state.seen_pools.contains_key(hop.pool.id()))
        {
            return None;
        }

        let key: Vec<(PoolId, Address, Address)> = hops.iter().map(Hop::key).collect();
        if state.found_keys.contains(&key) {
            return None;
        }

        Path::new(hops).ok()
    }
}
