//! Router configuration

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::pool::PoolId;
use crate::shared::errors::RouterError;

/// Maximum token-path length (counted in tokens).
pub const DEFAULT_MAX_DEPTH: usize = 7;
/// Maximum hop count for paths that touch no boosted token.
pub const DEFAULT_MAX_NON_BOOSTED_PATH_DEPTH: usize = 3;
/// Non-boosted intermediate tokens tolerated inside a boosted path.
pub const DEFAULT_MAX_NON_BOOSTED_HOP_TOKENS: usize = 1;
/// Soft target for the number of candidate paths.
pub const DEFAULT_APPROX_PATHS_TO_RETURN: usize = 5;
/// Hard ceiling on DFS node visits per search, guarantees termination.
pub const DEFAULT_MAX_SEARCH_STEPS: usize = 100_000;
/// Parallel edges retained per ordered token pair.
pub const DEFAULT_MAX_PATHS_PER_TOKEN_PAIR: usize = 2;
/// Increments used by the greedy amount-splitting optimizer.
pub const DEFAULT_ALLOCATION_ITERATIONS: usize = 10;

/// Path search limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: usize,
    pub max_non_boosted_path_depth: usize,
    pub max_non_boosted_hop_tokens_in_boosted_path: usize,
    pub approx_paths_to_return: usize,
    pub max_search_steps: usize,
    /// Optional allow-list restricting which pools may appear in any path
    pub pool_ids_to_include: Option<HashSet<PoolId>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_non_boosted_path_depth: DEFAULT_MAX_NON_BOOSTED_PATH_DEPTH,
            max_non_boosted_hop_tokens_in_boosted_path: DEFAULT_MAX_NON_BOOSTED_HOP_TOKENS,
            approx_paths_to_return: DEFAULT_APPROX_PATHS_TO_RETURN,
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
            pool_ids_to_include: None,
        }
    }
}

impl SearchConfig {
    /// Validate limits before any search work begins
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.max_depth < 2 {
            return Err(RouterError::ConfigInvalid(
                "max_depth must be at least 2".to_string(),
            ));
        }
        if self.max_non_boosted_path_depth < 1 {
            return Err(RouterError::ConfigInvalid(
                "max_non_boosted_path_depth must be at least 1".to_string(),
            ));
        }
        if self.approx_paths_to_return < 1 {
            return Err(RouterError::ConfigInvalid(
                "approx_paths_to_return must be at least 1".to_string(),
            ));
        }
        if self.max_search_steps < 1 {
            return Err(RouterError::ConfigInvalid(
                "max_search_steps must be at least 1".to_string(),
            ));
        }
        if let Some(allowed) = &self.pool_ids_to_include {
            if allowed.is_empty() {
                return Err(RouterError::ConfigInvalid(
                    "pool_ids_to_include must not be empty when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Router configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub max_paths_per_token_pair: usize,
    pub allocation_iterations: usize,
    pub search: SearchConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_paths_per_token_pair: DEFAULT_MAX_PATHS_PER_TOKEN_PAIR,
            allocation_iterations: DEFAULT_ALLOCATION_ITERATIONS,
            search: SearchConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.max_paths_per_token_pair < 1 {
            return Err(RouterError::ConfigInvalid(
                "max_paths_per_token_pair must be at least 1".to_string(),
            ));
        }
        if self.allocation_iterations < 1 {
            return Err(RouterError::ConfigInvalid(
                "allocation_iterations must be at least 1".to_string(),
            ));
        }
        self.search.validate()
    }

    /// Load and validate a configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RouterError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RouterError::ConfigInvalid(format!("failed to read config file: {}", e))
        })?;

        let config: RouterConfig = toml::from_str(&content).map_err(|e| {
            RouterError::ConfigInvalid(format!("failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }
}
