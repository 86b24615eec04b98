//! Routing domain - graph construction, path discovery and route optimization

pub mod graph;
pub mod optimizer;
pub mod path;
pub mod pool;
pub mod search;
pub mod token;

pub use graph::LiquidityGraph;
pub use optimizer::RouteOptimizer;
pub use path::{Hop, Path, PricedPath, Route};
pub use pool::{LiquidityClass, Pool, PoolId, SwapDirection};
pub use search::PathSearch;
pub use token::{Token, TokenAmount};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;
    use std::sync::Arc;

    use alloy_primitives::{Address, U256};
    use rust_decimal::Decimal;

    use super::pool::{LiquidityClass, Pool, PoolId};
    use super::token::Token;
    use crate::shared::errors::QuoteError;

    pub fn addr(byte: u8) -> Address {
        Address::from([byte; 20])
    }

    pub fn token(byte: u8, symbol: &str) -> Token {
        Token::new(addr(byte), 1, 18, symbol)
    }

    /// Constant-product test pool with a fixed liquidity-ranking metric.
    pub struct MockPool {
        id: PoolId,
        address: Address,
        tokens: Vec<Token>,
        reserves: HashMap<Address, U256>,
        liquidity: Decimal,
        class: LiquidityClass,
        fail_quotes: bool,
    }

    impl MockPool {
        pub fn constant_product(
            id: &str,
            address_byte: u8,
            members: &[(Token, u64)],
            liquidity: i64,
        ) -> Arc<dyn Pool> {
            Arc::new(Self::build(
                id,
                addr(address_byte),
                members,
                liquidity,
                LiquidityClass::Plain,
                false,
            ))
        }

        pub fn with_class(
            id: &str,
            address_byte: u8,
            members: &[(Token, u64)],
            liquidity: i64,
            class: LiquidityClass,
        ) -> Arc<dyn Pool> {
            Arc::new(Self::build(id, addr(address_byte), members, liquidity, class, false))
        }

        /// Pool whose own pool-token is one of its members (phantom-bearing):
        /// the pool address equals `own_token`'s address.
        pub fn phantom(
            id: &str,
            own_token: &Token,
            members: &[(Token, u64)],
            liquidity: i64,
        ) -> Arc<dyn Pool> {
            let mut all: Vec<(Token, u64)> = vec![(own_token.clone(), 1_000_000_000)];
            all.extend(members.iter().cloned());
            Arc::new(Self::build(
                id,
                own_token.address,
                &all,
                liquidity,
                LiquidityClass::Boosted,
                false,
            ))
        }

        /// Pool whose quoting functions always fail.
        pub fn failing(
            id: &str,
            address_byte: u8,
            members: &[(Token, u64)],
            liquidity: i64,
        ) -> Arc<dyn Pool> {
            Arc::new(Self::build(
                id,
                addr(address_byte),
                members,
                liquidity,
                LiquidityClass::Plain,
                true,
            ))
        }

        fn build(
            id: &str,
            address: Address,
            members: &[(Token, u64)],
            liquidity: i64,
            class: LiquidityClass,
            fail_quotes: bool,
        ) -> Self {
            let tokens = members.iter().map(|(t, _)| t.clone()).collect();
            let reserves = members
                .iter()
                .map(|(t, r)| (t.address, U256::from(*r)))
                .collect();
            Self {
                id: PoolId::new(id),
                address,
                tokens,
                reserves,
                liquidity: Decimal::from(liquidity),
                class,
                fail_quotes,
            }
        }

        fn reserve_pair(
            &self,
            token_in: &Token,
            token_out: &Token,
        ) -> Result<(U256, U256), QuoteError> {
            let r_in = self
                .reserves
                .get(&token_in.address)
                .ok_or(QuoteError::UnsupportedPair)?;
            let r_out = self
                .reserves
                .get(&token_out.address)
                .ok_or(QuoteError::UnsupportedPair)?;
            Ok((*r_in, *r_out))
        }
    }

    impl Pool for MockPool {
        fn id(&self) -> &PoolId {
            &self.id
        }

        fn address(&self) -> Address {
            self.address
        }

        fn tokens(&self) -> &[Token] {
            &self.tokens
        }

        fn liquidity_class(&self) -> LiquidityClass {
            self.class
        }

        fn liquidity_metric(
            &self,
            token_in: &Token,
            token_out: &Token,
        ) -> Result<Decimal, QuoteError> {
            self.reserve_pair(token_in, token_out)?;
            Ok(self.liquidity)
        }

        fn quote_given_in(
            &self,
            token_in: &Token,
            token_out: &Token,
            amount_in: U256,
        ) -> Result<U256, QuoteError> {
            if self.fail_quotes {
                return Err(QuoteError::Math);
            }
            let (r_in, r_out) = self.reserve_pair(token_in, token_out)?;
            let denom = r_in.checked_add(amount_in).ok_or(QuoteError::Math)?;
            let num = amount_in.checked_mul(r_out).ok_or(QuoteError::Math)?;
            Ok(num / denom)
        }

        fn quote_given_out(
            &self,
            token_in: &Token,
            token_out: &Token,
            amount_out: U256,
        ) -> Result<U256, QuoteError> {
            if self.fail_quotes {
                return Err(QuoteError::Math);
            }
            let (r_in, r_out) = self.reserve_pair(token_in, token_out)?;
            if amount_out >= r_out {
                return Err(QuoteError::InsufficientLiquidity);
            }
            let num = amount_out.checked_mul(r_in).ok_or(QuoteError::Math)?;
            Ok(num / (r_out - amount_out) + U256::from(1u64))
        }
    }
}
