//! Network Configuration and Builder
//!
//! This module provides configuration types for deterministic triangulation refinement.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriangulationError};

/// Default number of consecutive shuffle picks that may miss a convex quadrilateral
pub const DEFAULT_SHUFFLE_MISS_LIMIT: usize = 1024;

/// Configuration for a triangulation network
///
/// Construction itself is fully deterministic; the configuration only steers the
/// refinement passes and seeds the default random source used by shuffling.
///
/// # Example
///
/// ```rust
/// use onion_mwt::*;
///
/// let config = NetworkConfigBuilder::new()
///     .seed(42)
///     .flip_limit(500)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.seed, 42);
/// assert_eq!(config.flip_limit, Some(500));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Seed for the default ChaCha8 random source
    ///
    /// The same seed and the same points always produce the same shuffle.
    pub seed: u64,

    /// Maximum number of replacements recorded by one fine-tune pass
    ///
    /// `None` runs each pass until its worklist is empty (the local fixed point).
    pub flip_limit: Option<usize>,

    /// Number of flips performed by one shuffle
    ///
    /// `None` performs as many flips as there are internal segments.
    pub shuffle_flips: Option<usize>,

    /// Consecutive random picks without a convex quadrilateral before a shuffle gives up
    pub shuffle_miss_limit: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating NetworkConfig with validation
///
/// # Example
///
/// ```rust
/// use onion_mwt::*;
///
/// // Use defaults
/// let config = NetworkConfigBuilder::new().build().unwrap();
/// assert_eq!(config.flip_limit, None);
///
/// // Customize
/// let config = NetworkConfigBuilder::new()
///     .seed(7)
///     .shuffle_flips(20)
///     .shuffle_miss_limit(64)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.shuffle_flips, Some(20));
/// ```
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    seed: Option<u64>,
    flip_limit: Option<usize>,
    shuffle_flips: Option<usize>,
    shuffle_miss_limit: usize,
}

impl NetworkConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - flip_limit: None (run fine-tune passes to their fixed point)
    /// - shuffle_flips: None (one flip per internal segment)
    /// - shuffle_miss_limit: 1024
    pub fn new() -> Self {
        Self {
            seed: None,
            flip_limit: None,
            shuffle_flips: None,
            shuffle_miss_limit: DEFAULT_SHUFFLE_MISS_LIMIT,
        }
    }

    /// Set the seed of the default random source
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap the number of replacements a single fine-tune pass may record
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `limit` is 0
    pub fn flip_limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(TriangulationError::InvalidConfig(
                "flip limit must be positive (got 0)".to_string(),
            ));
        }
        self.flip_limit = Some(limit);
        Ok(self)
    }

    /// Set the number of flips performed by one shuffle
    pub fn shuffle_flips(mut self, flips: usize) -> Self {
        self.shuffle_flips = Some(flips);
        self
    }

    /// Set how many consecutive misses a shuffle tolerates before stopping
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `limit` is 0
    pub fn shuffle_miss_limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(TriangulationError::InvalidConfig(
                "shuffle miss limit must be positive (got 0)".to_string(),
            ));
        }
        self.shuffle_miss_limit = limit;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<NetworkConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(NetworkConfig {
            seed,
            flip_limit: self.flip_limit,
            shuffle_flips: self.shuffle_flips,
            shuffle_miss_limit: self.shuffle_miss_limit,
        })
    }
}

impl Default for NetworkConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = NetworkConfigBuilder::new().build().unwrap();
        assert_eq!(config.flip_limit, None);
        assert_eq!(config.shuffle_flips, None);
        assert_eq!(config.shuffle_miss_limit, DEFAULT_SHUFFLE_MISS_LIMIT);
    }

    #[test]
    fn test_builder_custom() {
        let config = NetworkConfigBuilder::new()
            .seed(42)
            .flip_limit(10)
            .unwrap()
            .shuffle_flips(3)
            .shuffle_miss_limit(5)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.flip_limit, Some(10));
        assert_eq!(config.shuffle_flips, Some(3));
        assert_eq!(config.shuffle_miss_limit, 5);
    }

    #[test]
    fn test_builder_zero_flip_limit() {
        let result = NetworkConfigBuilder::new().flip_limit(0);
        assert!(matches!(result, Err(TriangulationError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_zero_miss_limit() {
        let result = NetworkConfigBuilder::new().shuffle_miss_limit(0);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_seed_same_config() {
        let a = NetworkConfigBuilder::new().seed(9).build().unwrap();
        let b = NetworkConfigBuilder::new().seed(9).build().unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = NetworkConfigBuilder::new()
            .seed(12345)
            .flip_limit(8)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: NetworkConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
