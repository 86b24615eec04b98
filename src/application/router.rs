//! Routing orchestrator.
//!
//! Ties the pipeline together: validate the request, obtain a pool snapshot,
//! build (or reuse) the liquidity graph, discover candidate paths, and split
//! the amount across them. The domain layer stays synchronous; fetching the
//! snapshot is the only await point.

use std::sync::Arc;

use tracing::info;

use crate::application::snapshot::{GraphCache, PoolSnapshotProvider};
use crate::domain::graph::LiquidityGraph;
use crate::domain::optimizer::RouteOptimizer;
use crate::domain::path::Route;
use crate::domain::pool::{Pool, SwapDirection};
use crate::domain::search::PathSearch;
use crate::domain::token::{Token, TokenAmount};
use crate::shared::config::RouterConfig;
use crate::shared::errors::RouterError;

/// One routing question: trade `token_in` for `token_out`, one side fixed
#[derive(Debug, Clone)]
pub struct RoutingRequest {
    pub token_in: Token,
    pub token_out: Token,
    pub direction: SwapDirection,
    /// The fixed-side amount: `token_in` for GivenIn, `token_out` for GivenOut
    pub amount: TokenAmount,
}

impl RoutingRequest {
    /// Fixed input amount, quote the obtainable output
    pub fn given_in(token_in: Token, token_out: Token, amount: TokenAmount) -> Self {
        Self {
            token_in,
            token_out,
            direction: SwapDirection::GivenIn,
            amount,
        }
    }

    /// Fixed output amount, quote the required input
    pub fn given_out(token_in: Token, token_out: Token, amount: TokenAmount) -> Self {
        Self {
            token_in,
            token_out,
            direction: SwapDirection::GivenOut,
            amount,
        }
    }
}

/// Answer to a routing request
#[derive(Debug, Clone)]
pub struct RoutingQuote {
    /// The counterpart amount: output for GivenIn, required input for GivenOut
    pub quote: TokenAmount,
    pub route: Route,
}

/// Smart order router over snapshot-backed liquidity
pub struct Router {
    config: RouterConfig,
    optimizer: RouteOptimizer,
    cache: GraphCache,
}

impl Router {
    pub fn new(config: RouterConfig) -> Result<Self, RouterError> {
        config.validate()?;
        let optimizer = RouteOptimizer::new(config.allocation_iterations)?;
        Ok(Self {
            config,
            optimizer,
            cache: GraphCache::new(),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: RouterConfig::default(),
            optimizer: RouteOptimizer::default(),
            cache: GraphCache::new(),
        }
    }

    /// Request checks that need no graph or snapshot work
    fn validate_request(&self, request: &RoutingRequest) -> Result<(), RouterError> {
        if request.token_in == request.token_out {
            return Err(RouterError::IdenticalTokens);
        }
        if request.amount.is_zero() {
            return Err(RouterError::InvalidAmount);
        }

        let fixed_side = match request.direction {
            SwapDirection::GivenIn => &request.token_in,
            SwapDirection::GivenOut => &request.token_out,
        };
        if &request.amount.token != fixed_side {
            return Err(RouterError::TokenMismatch {
                expected: fixed_side.symbol.clone(),
                found: request.amount.token.symbol.clone(),
            });
        }
        Ok(())
    }

    /// Route against an already-fetched pool set
    pub fn route_snapshot(
        &self,
        pools: &[Arc<dyn Pool>],
        request: &RoutingRequest,
    ) -> Result<RoutingQuote, RouterError> {
        self.validate_request(request)?;
        if pools.is_empty() {
            return Err(RouterError::NoLiquidity);
        }
        let graph = LiquidityGraph::build(pools, self.config.max_paths_per_token_pair)?;
        self.route_on_graph(&graph, request)
    }

    /// Route against a pre-built graph
    pub fn route_on_graph(
        &self,
        graph: &LiquidityGraph,
        request: &RoutingRequest,
    ) -> Result<RoutingQuote, RouterError> {
        self.validate_request(request)?;

        let search = PathSearch::new(graph, self.config.search.clone())?;
        let paths = search.find_paths(request.token_in.address, request.token_out.address);
        if paths.is_empty() {
            return Err(RouterError::NoRouteFound);
        }

        let route = self
            .optimizer
            .select_route(paths, request.direction, &request.amount)?;
        let quote = match request.direction {
            SwapDirection::GivenIn => route.amount_out.clone(),
            SwapDirection::GivenOut => route.amount_in.clone(),
        };

        info!(
            token_in = %request.token_in,
            token_out = %request.token_out,
            direction = ?request.direction,
            amount = %request.amount,
            quote = %quote,
            paths = route.paths.len(),
            "routing request answered"
        );
        Ok(RoutingQuote { quote, route })
    }

    /// Fetch a fresh snapshot from the provider and route against it
    pub async fn route(
        &self,
        provider: &dyn PoolSnapshotProvider,
        request: &RoutingRequest,
    ) -> Result<RoutingQuote, RouterError> {
        self.validate_request(request)?;
        let snapshot = provider.fetch_pools().await?;
        if snapshot.is_empty() {
            return Err(RouterError::NoLiquidity);
        }
        self.route_snapshot(&snapshot.pools, request)
    }

    /// Like `route`, but memoizes built graphs by snapshot content hash
    pub async fn route_cached(
        &self,
        provider: &dyn PoolSnapshotProvider,
        request: &RoutingRequest,
    ) -> Result<RoutingQuote, RouterError> {
        self.validate_request(request)?;
        let snapshot = provider.fetch_pools().await?;
        if snapshot.is_empty() {
            return Err(RouterError::NoLiquidity);
        }
        let graph = self
            .cache
            .get_or_build(&snapshot, self.config.max_paths_per_token_pair)
            .await?;
        self.route_on_graph(&graph, request)
    }
}
