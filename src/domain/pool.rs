//! Pool capability contract consumed by the routing engine.
//!
//! Every liquidity source satisfies this contract; the engine treats pools
//! polymorphically and never inspects pricing formulas. Pools are immutable
//! snapshots for the duration of one routing request - refreshed reserves
//! produce a new pool value, never an in-place edit visible mid-search.

use std::fmt;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::token::Token;
use crate::shared::errors::QuoteError;

/// Unique pool identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolId(pub String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse pricing-behavior category of a pool.
///
/// Computed once per pool; the search only branches on it when relaxing the
/// seen-pool constraint (reusing a Plain pool twice is judged less harmful to
/// price accuracy than reusing a Stable or Boosted one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityClass {
    Plain,
    Stable,
    Boosted,
}

/// Which side of the trade is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    GivenIn,
    GivenOut,
}

/// Capability contract every liquidity source satisfies
pub trait Pool: Send + Sync {
    fn id(&self) -> &PoolId;

    fn address(&self) -> Address;

    /// Member tokens of the pool
    fn tokens(&self) -> &[Token];

    fn liquidity_class(&self) -> LiquidityClass;

    /// Scalar used to rank parallel edges for an ordered token pair
    fn liquidity_metric(&self, token_in: &Token, token_out: &Token)
        -> Result<Decimal, QuoteError>;

    /// Output amount obtained for a fixed input amount
    fn quote_given_in(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: U256,
    ) -> Result<U256, QuoteError>;

    /// Input amount required for a fixed output amount
    fn quote_given_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_out: U256,
    ) -> Result<U256, QuoteError>;
}

impl fmt::Debug for dyn Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("id", self.id())
            .field("address", &self.address())
            .field("class", &self.liquidity_class())
            .finish()
    }
}
