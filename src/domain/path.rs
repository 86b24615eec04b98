//! Candidate paths, priced paths and routes

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use uuid::Uuid;

use crate::domain::pool::{Pool, PoolId, SwapDirection};
use crate::domain::token::{Token, TokenAmount};
use crate::shared::errors::{QuoteError, RouterError};

/// One hop of a path: a pool traded in a fixed direction
#[derive(Clone)]
pub struct Hop {
    pub pool: Arc<dyn Pool>,
    pub token_in: Token,
    pub token_out: Token,
}

impl Hop {
    /// Identity of the hop for path deduplication
    pub fn key(&self) -> (PoolId, Address, Address) {
        (
            self.pool.id().clone(),
            self.token_in.address,
            self.token_out.address,
        )
    }
}

impl fmt::Debug for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hop")
            .field("pool", self.pool.id())
            .field("token_in", &self.token_in.symbol)
            .field("token_out", &self.token_out.symbol)
            .finish()
    }
}

/// Ordered token/pool sequence connecting an input token to an output token.
///
/// Invariants: at least one hop, consecutive hops connect, no token repeats,
/// no pool repeats.
#[derive(Debug, Clone)]
pub struct Path {
    hops: Vec<Hop>,
}

impl Path {
    pub fn new(hops: Vec<Hop>) -> Result<Self, RouterError> {
        if hops.is_empty() {
            return Err(RouterError::InvalidPath("path has no hops".to_string()));
        }

        let mut seen_tokens: HashSet<Address> = HashSet::new();
        let mut seen_pools: HashSet<PoolId> = HashSet::new();
        seen_tokens.insert(hops[0].token_in.address);

        for (i, hop) in hops.iter().enumerate() {
            if i > 0 && hops[i - 1].token_out != hop.token_in {
                return Err(RouterError::InvalidPath(format!(
                    "hop {} does not connect to the previous hop",
                    i
                )));
            }
            if !seen_tokens.insert(hop.token_out.address) {
                return Err(RouterError::InvalidPath(format!(
                    "token {} repeats within the path",
                    hop.token_out.symbol
                )));
            }
            if !seen_pools.insert(hop.pool.id().clone()) {
                return Err(RouterError::InvalidPath(format!(
                    "pool {} repeats within the path",
                    hop.pool.id()
                )));
            }
        }

        Ok(Self { hops })
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn token_in(&self) -> &Token {
        &self.hops[0].token_in
    }

    pub fn token_out(&self) -> &Token {
        &self.hops[self.hops.len() - 1].token_out
    }

    /// Token sequence from input to output; one longer than the hop count
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::with_capacity(self.hops.len() + 1);
        tokens.push(self.token_in());
        for hop in &self.hops {
            tokens.push(&hop.token_out);
        }
        tokens
    }

    /// Exact (pool, token_in, token_out) sequence identifying this path
    pub fn key(&self) -> Vec<(PoolId, Address, Address)> {
        self.hops.iter().map(Hop::key).collect()
    }

    /// Quote the counterpart amount for a fixed amount on one side.
    ///
    /// `GivenIn` quotes forward through the pools in path order and returns
    /// the output amount; `GivenOut` quotes backward through the pools in
    /// reverse order and returns the required input amount.
    pub fn quote(&self, direction: SwapDirection, amount: U256) -> Result<U256, QuoteError> {
        match direction {
            SwapDirection::GivenIn => {
                let mut running = amount;
                for hop in &self.hops {
                    running = hop
                        .pool
                        .quote_given_in(&hop.token_in, &hop.token_out, running)?;
                }
                Ok(running)
            }
            SwapDirection::GivenOut => {
                let mut running = amount;
                for hop in self.hops.iter().rev() {
                    running = hop
                        .pool
                        .quote_given_out(&hop.token_in, &hop.token_out, running)?;
                }
                Ok(running)
            }
        }
    }

    /// Price the path for a fixed amount, producing both side amounts.
    ///
    /// The fixed amount must be denominated in the path's input token for
    /// `GivenIn` and in its output token for `GivenOut`.
    pub fn price(
        &self,
        direction: SwapDirection,
        fixed: &TokenAmount,
    ) -> Result<PricedPath, RouterError> {
        let expected = match direction {
            SwapDirection::GivenIn => self.token_in(),
            SwapDirection::GivenOut => self.token_out(),
        };
        if &fixed.token != expected {
            return Err(RouterError::TokenMismatch {
                expected: expected.symbol.clone(),
                found: fixed.token.symbol.clone(),
            });
        }

        let counterpart = self.quote(direction, fixed.raw)?;
        let (amount_in, amount_out) = match direction {
            SwapDirection::GivenIn => (
                fixed.clone(),
                TokenAmount::new(self.token_out().clone(), counterpart),
            ),
            SwapDirection::GivenOut => (
                TokenAmount::new(self.token_in().clone(), counterpart),
                fixed.clone(),
            ),
        };

        Ok(PricedPath {
            path: self.clone(),
            direction,
            amount_in,
            amount_out,
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token_in().symbol)?;
        for hop in &self.hops {
            write!(f, " -> {}", hop.token_out.symbol)?;
        }
        Ok(())
    }
}

/// A path with amounts assigned on both sides
#[derive(Debug, Clone)]
pub struct PricedPath {
    pub path: Path,
    pub direction: SwapDirection,
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
}

/// Final set of priced paths answering one routing request
#[derive(Debug, Clone)]
pub struct Route {
    pub id: String,
    pub paths: Vec<PricedPath>,
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
}

impl Route {
    /// Aggregate priced paths into a route.
    ///
    /// All paths must share the same input token and, separately, the same
    /// output token; anything else is `InconsistentRouteTokens`.
    pub fn new(paths: Vec<PricedPath>) -> Result<Self, RouterError> {
        let first = paths.first().ok_or(RouterError::NoRouteFound)?;

        // mismatched endpoint tokens become InconsistentRouteTokens; other
        // failures (overflowing aggregates) keep their own error
        let aggregate = |acc: TokenAmount, next: &TokenAmount| {
            acc.checked_add(next).map_err(|e| match e {
                RouterError::TokenMismatch { .. } => RouterError::InconsistentRouteTokens,
                other => other,
            })
        };

        let mut amount_in = first.amount_in.clone();
        let mut amount_out = first.amount_out.clone();
        for priced in &paths[1..] {
            amount_in = aggregate(amount_in, &priced.amount_in)?;
            amount_out = aggregate(amount_out, &priced.amount_out)?;
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            paths,
            amount_in,
            amount_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{token, MockPool};

    fn hop(pool: &Arc<dyn Pool>, token_in: &Token, token_out: &Token) -> Hop {
        Hop {
            pool: Arc::clone(pool),
            token_in: token_in.clone(),
            token_out: token_out.clone(),
        }
    }

    fn two_hop_path() -> (Path, Token, Token, Token) {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let p1 =
            MockPool::constant_product("p1", 10, &[(a.clone(), 1_000_000), (b.clone(), 1_000_000)], 100);
        let p2 =
            MockPool::constant_product("p2", 11, &[(b.clone(), 1_000_000), (c.clone(), 1_000_000)], 80);
        let path = Path::new(vec![hop(&p1, &a, &b), hop(&p2, &b, &c)]).expect("valid path");
        (path, a, b, c)
    }

    #[test]
    fn hop_count_is_token_count_minus_one() {
        let (path, ..) = two_hop_path();
        assert_eq!(path.hops().len(), path.tokens().len() - 1);
        assert_eq!(path.token_in().symbol, "A");
        assert_eq!(path.token_out().symbol, "C");
    }

    #[test]
    fn rejects_disconnected_hops() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let d = token(4, "D");
        let p1 = MockPool::constant_product("p1", 10, &[(a.clone(), 1_000), (b.clone(), 1_000)], 1);
        let p2 = MockPool::constant_product("p2", 11, &[(c.clone(), 1_000), (d.clone(), 1_000)], 1);
        let result = Path::new(vec![hop(&p1, &a, &b), hop(&p2, &c, &d)]);
        assert!(matches!(result, Err(RouterError::InvalidPath(_))));
    }

    #[test]
    fn rejects_repeated_token() {
        let a = token(1, "A");
        let b = token(2, "B");
        let p1 = MockPool::constant_product("p1", 10, &[(a.clone(), 1_000), (b.clone(), 1_000)], 1);
        let p2 = MockPool::constant_product("p2", 11, &[(a.clone(), 1_000), (b.clone(), 1_000)], 1);
        let result = Path::new(vec![hop(&p1, &a, &b), hop(&p2, &b, &a)]);
        assert!(matches!(result, Err(RouterError::InvalidPath(_))));
    }

    #[test]
    fn rejects_repeated_pool() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let p1 = MockPool::constant_product(
            "p1",
            10,
            &[(a.clone(), 1_000), (b.clone(), 1_000), (c.clone(), 1_000)],
            1,
        );
        let result = Path::new(vec![hop(&p1, &a, &b), hop(&p1, &b, &c)]);
        assert!(matches!(result, Err(RouterError::InvalidPath(_))));
    }

    #[test]
    fn quote_given_in_chains_pools_forward() {
        let (path, a, b, _) = two_hop_path();
        let amount_in = U256::from(10_000u64);

        let mid = path.hops()[0]
            .pool
            .quote_given_in(&a, &b, amount_in)
            .expect("first hop quotes");
        let expected = path.hops()[1]
            .pool
            .quote_given_in(&b, path.token_out(), mid)
            .expect("second hop quotes");

        let quoted = path
            .quote(SwapDirection::GivenIn, amount_in)
            .expect("path quotes");
        assert_eq!(quoted, expected);
        assert!(quoted < amount_in); // two hops of price impact
    }

    #[test]
    fn quote_given_out_reverse_iterates() {
        let (path, ..) = two_hop_path();
        let amount_out = U256::from(10_000u64);

        let required_in = path
            .quote(SwapDirection::GivenOut, amount_out)
            .expect("path quotes");
        // reverse-quoting must over-cover the requested output
        let forward = path
            .quote(SwapDirection::GivenIn, required_in)
            .expect("forward quotes");
        assert!(forward >= amount_out);
    }

    #[test]
    fn price_rejects_wrong_fixed_token() {
        let (path, _, b, _) = two_hop_path();
        let fixed = TokenAmount::new(b, U256::from(100u64));
        assert!(matches!(
            path.price(SwapDirection::GivenIn, &fixed),
            Err(RouterError::TokenMismatch { .. })
        ));
    }

    #[test]
    fn route_aggregates_same_token_paths() {
        let (path, a, _, c) = two_hop_path();
        let fixed = TokenAmount::new(a.clone(), U256::from(10_000u64));
        let priced = path
            .price(SwapDirection::GivenIn, &fixed)
            .expect("path prices");
        let out = priced.amount_out.raw;

        let route = Route::new(vec![priced.clone(), priced]).expect("consistent route");
        assert_eq!(route.amount_in.raw, U256::from(20_000u64));
        assert_eq!(route.amount_out.raw, out + out);
        assert_eq!(route.amount_out.token, c);
    }

    #[test]
    fn route_rejects_mixed_output_tokens() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let p1 =
            MockPool::constant_product("p1", 10, &[(a.clone(), 1_000_000), (b.clone(), 1_000_000)], 1);
        let p2 =
            MockPool::constant_product("p2", 11, &[(a.clone(), 1_000_000), (c.clone(), 1_000_000)], 1);

        let to_b = Path::new(vec![hop(&p1, &a, &b)]).expect("valid");
        let to_c = Path::new(vec![hop(&p2, &a, &c)]).expect("valid");
        let fixed = TokenAmount::new(a, U256::from(1_000u64));
        let priced_b = to_b.price(SwapDirection::GivenIn, &fixed).expect("prices");
        let priced_c = to_c.price(SwapDirection::GivenIn, &fixed).expect("prices");

        assert!(matches!(
            Route::new(vec![priced_b, priced_c]),
            Err(RouterError::InconsistentRouteTokens)
        ));
    }

    #[test]
    fn route_overflow_is_invalid_amount_not_mismatch() {
        let (path, a, _, c) = two_hop_path();
        let near_max = PricedPath {
            path: path.clone(),
            direction: SwapDirection::GivenIn,
            amount_in: TokenAmount::new(a.clone(), U256::MAX),
            amount_out: TokenAmount::new(c.clone(), U256::from(1u64)),
        };
        let one_more = PricedPath {
            path,
            direction: SwapDirection::GivenIn,
            amount_in: TokenAmount::new(a, U256::from(1u64)),
            amount_out: TokenAmount::new(c, U256::from(1u64)),
        };

        assert!(matches!(
            Route::new(vec![near_max, one_more]),
            Err(RouterError::InvalidAmount)
        ));
    }

    #[test]
    fn empty_route_is_no_route_found() {
        assert!(matches!(
            Route::new(vec![]),
            Err(RouterError::NoRouteFound)
        ));
    }
}
