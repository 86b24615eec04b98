//! Route optimization - amount splitting across candidate paths.
//!
//! AMM pools quote diminishing marginal output as more volume routes through
//! them, so splitting a trade across several paths can beat sending it all
//! through the single best one. The optimizer allocates the requested amount
//! in fixed increments, each going to the path with the best marginal
//! re-quote at its current allocation. This is a local greedy approximation
//! of the optimal split, not a global optimum.

use alloy_primitives::U256;
use tracing::{debug, info, warn};

use crate::domain::path::{Path, PricedPath, Route};
use crate::domain::pool::SwapDirection;
use crate::domain::token::TokenAmount;
use crate::shared::config::DEFAULT_ALLOCATION_ITERATIONS;
use crate::shared::errors::RouterError;

/// Greedy marginal-allocation splitter
#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    iterations: usize,
}

impl Default for RouteOptimizer {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ALLOCATION_ITERATIONS,
        }
    }
}

impl RouteOptimizer {
    pub fn new(iterations: usize) -> Result<Self, RouterError> {
        if iterations < 1 {
            return Err(RouterError::ConfigInvalid(
                "allocation_iterations must be at least 1".to_string(),
            ));
        }
        Ok(Self { iterations })
    }

    /// Split the requested amount across the candidate paths.
    ///
    /// The allocations sum exactly to the requested amount; paths that never
    /// receive a positive allocation are dropped. A path whose quote fails is
    /// excluded with a warning rather than failing the request.
    pub fn select_route(
        &self,
        candidates: Vec<Path>,
        direction: SwapDirection,
        amount: &TokenAmount,
    ) -> Result<Route, RouterError> {
        if candidates.is_empty() {
            return Err(RouterError::NoRouteFound);
        }
        if amount.is_zero() {
            return Err(RouterError::InvalidAmount);
        }

        if candidates.len() == 1 {
            let path = &candidates[0];
            let priced = path.price(direction, amount).map_err(|e| {
                warn!(path = %path, error = %e, "sole candidate path failed to price");
                RouterError::NoRouteFound
            })?;
            return Route::new(vec![priced]);
        }

        let allocations = self.allocate(&candidates, direction, amount.raw)?;

        let mut priced_paths = Vec::new();
        for (path, allocation) in candidates.iter().zip(&allocations) {
            if allocation.is_zero() {
                continue;
            }
            let fixed = TokenAmount::new(amount.token.clone(), *allocation);
            match path.price(direction, &fixed) {
                Ok(priced) => priced_paths.push(priced),
                Err(e) => {
                    warn!(path = %path, error = %e, "allocated path failed to price, dropping");
                }
            }
        }

        let route = Route::new(priced_paths)?;
        info!(
            paths = route.paths.len(),
            amount_in = %route.amount_in,
            amount_out = %route.amount_out,
            "route selected"
        );
        Ok(route)
    }

    /// Greedy marginal allocation of `total` over the candidates
    fn allocate(
        &self,
        candidates: &[Path],
        direction: SwapDirection,
        total: U256,
    ) -> Result<Vec<U256>, RouterError> {
        let increment = total / U256::from(self.iterations);

        let mut allocations = vec![U256::ZERO; candidates.len()];
        // counterpart quote at the current allocation, per path
        let mut quoted = vec![U256::ZERO; candidates.len()];
        let mut alive = vec![true; candidates.len()];
        let mut remaining = total;

        while !remaining.is_zero() {
            let step = if increment.is_zero() || remaining < increment {
                remaining
            } else {
                increment
            };

            let mut best: Option<(usize, U256, U256)> = None;
            for (i, path) in candidates.iter().enumerate() {
                if !alive[i] {
                    continue;
                }
                let trial = allocations[i] + step;
                match path.quote(direction, trial) {
                    Ok(quote) => {
                        let marginal = quote.saturating_sub(quoted[i]);
                        let better = match (&best, direction) {
                            (None, _) => true,
                            // best marginal output wins
                            (Some((_, _, best_marginal)), SwapDirection::GivenIn) => {
                                marginal > *best_marginal
                            }
                            // smallest marginal input wins
                            (Some((_, _, best_marginal)), SwapDirection::GivenOut) => {
                                marginal < *best_marginal
                            }
                        };
                        if better {
                            best = Some((i, quote, marginal));
                        }
                    }
                    Err(e) => {
                        warn!(path = %path, error = %e, "quote failed, excluding path from allocation");
                        alive[i] = false;
                    }
                }
            }

            match best {
                Some((i, quote, _)) => {
                    allocations[i] += step;
                    quoted[i] = quote;
                    remaining -= step;
                }
                None => {
                    debug!("no candidate path can absorb the remaining amount");
                    return Err(RouterError::NoRouteFound);
                }
            }
        }

        Ok(allocations)
    }
}
