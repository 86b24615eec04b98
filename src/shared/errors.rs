//! Error handling for the routing engine

use thiserror::Error;

/// Errors surfaced by a pool's own pricing contract.
///
/// A failing quote aborts only the candidate path being priced, never the
/// whole routing request; the optimizer logs it and drops the path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("pool does not trade the requested token pair")]
    UnsupportedPair,

    #[error("insufficient liquidity for the requested amount")]
    InsufficientLiquidity,

    #[error("requested amount exceeds pool limits")]
    AmountTooLarge,

    #[error("arithmetic overflow in pool math")]
    Math,
}

/// Routing-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("input and output tokens are identical")]
    IdenticalTokens,

    #[error("pool snapshot contains no pools")]
    NoLiquidity,

    #[error("no usable route found for the requested pair")]
    NoRouteFound,

    #[error("requested amount must be positive")]
    InvalidAmount,

    #[error("token mismatch: expected {expected}, found {found}")]
    TokenMismatch { expected: String, found: String },

    #[error("route paths do not share the same input/output tokens")]
    InconsistentRouteTokens,

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("pool snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    #[error("pool quote failed: {0}")]
    Quote(#[from] QuoteError),
}
