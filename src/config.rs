//! Typed configuration for every tunable this crate exposes, with defaults
//! matching what each module documents as its default and a `validate()`
//! that rejects out-of-range values before they reach a running pipeline.
//!
//! Grounded on the teacher's configuration conventions (plain structs with
//! `Default` impls, no config-file parser of its own — callers who want one
//! layer `serde_yaml`/`toml` on top, same as the teacher leaves to its CLI
//! binary rather than the library).

use serde::{Deserialize, Serialize};

use crate::algo::PprConfig;
use crate::vector::HnswConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    pub betweenness_samples: usize,
    pub betweenness_seed: u64,
    pub ppr_shallow_alpha: f64,
    pub ppr_shallow_iterations: usize,
    pub ppr_deep_alpha: f64,
    pub ppr_deep_iterations: usize,
    pub ppr_convergence_epsilon: f64,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        let shallow = PprConfig::shallow();
        let deep = PprConfig::deep();
        Self {
            betweenness_samples: 10,
            betweenness_seed: 42,
            ppr_shallow_alpha: shallow.alpha,
            ppr_shallow_iterations: shallow.max_iterations,
            ppr_deep_alpha: deep.alpha,
            ppr_deep_iterations: deep.max_iterations,
            ppr_convergence_epsilon: shallow.convergence_epsilon,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexConfig {
    pub m: usize,
    pub ef_construction: usize,
    pub ef_search: usize,
    pub hnsw_seed: u64,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        let defaults = HnswConfig::default();
        Self {
            m: defaults.m,
            ef_construction: defaults.ef_construction,
            ef_search: defaults.ef_search,
            hnsw_seed: defaults.seed,
        }
    }
}

impl From<&VectorIndexConfig> for HnswConfig {
    fn from(c: &VectorIndexConfig) -> Self {
        HnswConfig {
            m: c.m,
            ef_construction: c.ef_construction,
            ef_search: c.ef_search,
            seed: c.hnsw_seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    pub max_concurrent_llm_calls: usize,
    pub adapter_timeout_secs: u64,
    pub requests_per_minute: f64,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_llm_calls: 4,
            adapter_timeout_secs: 30,
            requests_per_minute: 100.0,
            retry_max_attempts: 3,
            retry_base_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    pub algorithm: AlgorithmConfig,
    pub vector_index: VectorIndexConfig,
    pub concurrency: ConcurrencyConfig,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be within [{min}, {max}], got {got}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        got: i64,
    },
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vector_index.m == 0 || self.vector_index.m > 256 {
            return Err(ConfigError::OutOfRange {
                field: "vector_index.m",
                min: 1,
                max: 256,
                got: self.vector_index.m as i64,
            });
        }
        if self.concurrency.max_concurrent_llm_calls == 0 {
            return Err(ConfigError::OutOfRange {
                field: "concurrency.max_concurrent_llm_calls",
                min: 1,
                max: i64::MAX,
                got: 0,
            });
        }
        if self.concurrency.requests_per_minute <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "concurrency.requests_per_minute",
                min: 1,
                max: i64::MAX,
                got: self.concurrency.requests_per_minute as i64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut config = EngineConfig::default();
        config.concurrency.max_concurrent_llm_calls = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn excessive_m_is_rejected() {
        let mut config = EngineConfig::default();
        config.vector_index.m = 1000;
        assert!(config.validate().is_err());
    }
}
