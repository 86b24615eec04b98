//! Smart Order Router - AMM route discovery and optimization
//! Built with Domain-Driven Design principles

pub mod application;
pub mod domain;
pub mod shared;

// Re-export main types for convenience
pub use application::router::{Router, RoutingQuote, RoutingRequest};
pub use application::snapshot::{PoolSnapshot, PoolSnapshotProvider};
pub use domain::graph::LiquidityGraph;
pub use domain::optimizer::RouteOptimizer;
pub use domain::path::{Path, PricedPath, Route};
pub use domain::pool::{LiquidityClass, Pool, PoolId, SwapDirection};
pub use domain::search::PathSearch;
pub use domain::token::{Token, TokenAmount};
pub use shared::config::{RouterConfig, SearchConfig};
pub use shared::errors::{QuoteError, RouterError};
