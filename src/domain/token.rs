//! Token identity and amount types

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::shared::errors::RouterError;

/// Chain-scoped fungible token identity.
///
/// Equality and hashing consider only the address and chain id; symbol and
/// decimals are descriptive metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub chain_id: u64,
    pub decimals: u8,
    pub symbol: String,
}

impl Token {
    pub fn new(address: Address, chain_id: u64, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            address,
            chain_id,
            decimals,
            symbol: symbol.into(),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.chain_id == other.chain_id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.chain_id.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// A token together with a raw amount scaled by the token's decimals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub token: Token,
    pub raw: U256,
}

impl TokenAmount {
    pub fn new(token: Token, raw: U256) -> Self {
        Self { token, raw }
    }

    pub fn zero(token: Token) -> Self {
        Self {
            token,
            raw: U256::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    fn ensure_same_token(&self, other: &TokenAmount) -> Result<(), RouterError> {
        if self.token != other.token {
            return Err(RouterError::TokenMismatch {
                expected: self.token.symbol.clone(),
                found: other.token.symbol.clone(),
            });
        }
        Ok(())
    }

    /// Add two amounts of the same token
    pub fn checked_add(&self, other: &TokenAmount) -> Result<TokenAmount, RouterError> {
        self.ensure_same_token(other)?;
        let raw = self
            .raw
            .checked_add(other.raw)
            .ok_or(RouterError::InvalidAmount)?;
        Ok(TokenAmount::new(self.token.clone(), raw))
    }

    /// Subtract an amount of the same token
    pub fn checked_sub(&self, other: &TokenAmount) -> Result<TokenAmount, RouterError> {
        self.ensure_same_token(other)?;
        let raw = self
            .raw
            .checked_sub(other.raw)
            .ok_or(RouterError::InvalidAmount)?;
        Ok(TokenAmount::new(self.token.clone(), raw))
    }

    /// Compare two amounts of the same token
    pub fn compare(&self, other: &TokenAmount) -> Result<Ordering, RouterError> {
        self.ensure_same_token(other)?;
        Ok(self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.raw, self.token.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8, chain_id: u64, symbol: &str) -> Token {
        Token::new(Address::from([byte; 20]), chain_id, 18, symbol)
    }

    #[test]
    fn equality_is_address_and_chain() {
        let a = token(1, 1, "WETH");
        let b = Token::new(Address::from([1u8; 20]), 1, 6, "RENAMED");
        assert_eq!(a, b);

        let other_chain = token(1, 137, "WETH");
        assert_ne!(a, other_chain);
    }

    #[test]
    fn add_same_token() {
        let t = token(1, 1, "DAI");
        let a = TokenAmount::new(t.clone(), U256::from(100u64));
        let b = TokenAmount::new(t, U256::from(50u64));
        let sum = a.checked_add(&b).expect("same token");
        assert_eq!(sum.raw, U256::from(150u64));
    }

    #[test]
    fn add_mismatched_tokens_fails() {
        let a = TokenAmount::new(token(1, 1, "DAI"), U256::from(100u64));
        let b = TokenAmount::new(token(2, 1, "USDC"), U256::from(50u64));
        assert!(matches!(
            a.checked_add(&b),
            Err(RouterError::TokenMismatch { .. })
        ));
    }

    #[test]
    fn compare_same_token() {
        let t = token(1, 1, "DAI");
        let a = TokenAmount::new(t.clone(), U256::from(100u64));
        let b = TokenAmount::new(t, U256::from(50u64));
        assert_eq!(a.compare(&b).expect("same token"), Ordering::Greater);
    }

    #[test]
    fn compare_mismatched_tokens_fails() {
        let a = TokenAmount::new(token(1, 1, "DAI"), U256::from(1u64));
        let b = TokenAmount::new(token(2, 1, "USDC"), U256::from(1u64));
        assert!(a.compare(&b).is_err());
    }

    #[test]
    fn add_overflow_fails() {
        let t = token(1, 1, "DAI");
        let a = TokenAmount::new(t.clone(), U256::MAX);
        let b = TokenAmount::new(t, U256::from(1u64));
        assert!(matches!(a.checked_add(&b), Err(RouterError::InvalidAmount)));
    }
}
