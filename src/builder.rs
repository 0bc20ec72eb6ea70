//! Simulator configuration and builder.
//!
//! [`ArcConfig`] carries the knobs a trace replay needs: how many blocks the
//! cache holds, how large a block is, and where the adaptive split starts.
//! [`ArcBuilder`] is the fluent front end over it.
//!
//! ## Example
//!
//! ```rust
//! use arcsim::builder::{ArcBuilder, ArcConfig};
//!
//! // 1 MiB of 4 KiB blocks.
//! let config = ArcConfig::from_cache_bytes(1 << 20, 4096).unwrap();
//! assert_eq!(config.capacity, 256);
//!
//! let cache = ArcBuilder::new(256).initial_p(64).build();
//! assert_eq!(cache.p_value(), 64);
//! assert_eq!(cache.block_size(), 4096);
//! ```

use crate::error::ConfigError;
use crate::policy::arc::ArcCache;
use crate::types::DEFAULT_BLOCK_SIZE;

/// Default simulated cache size in bytes (128 MiB).
pub const DEFAULT_CACHE_BYTES: u64 = 128 * 1024 * 1024;

/// Validated-on-use configuration for an [`ArcCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConfig {
    /// Maximum number of resident blocks (`c`).
    pub capacity: usize,
    /// Bytes per block.
    pub block_size: u64,
    /// Starting target size of the Recency list; `capacity / 2` when unset.
    pub initial_p: Option<usize>,
}

impl ArcConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            block_size: DEFAULT_BLOCK_SIZE,
            initial_p: None,
        }
    }

    /// Sizes the cache in bytes: `capacity = cache_bytes / block_size`.
    pub fn from_cache_bytes(cache_bytes: u64, block_size: u64) -> Result<Self, ConfigError> {
        if block_size == 0 {
            return Err(ConfigError::new("block_size must be > 0"));
        }
        let blocks = cache_bytes / block_size;
        let capacity = usize::try_from(blocks)
            .map_err(|_| ConfigError::new(format!("capacity of {blocks} blocks overflows usize")))?;
        let config = Self {
            capacity,
            block_size,
            initial_p: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Starting value of the split target after validation.
    pub fn resolved_initial_p(&self) -> usize {
        self.initial_p.unwrap_or(self.capacity / 2)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        if self.block_size == 0 {
            return Err(ConfigError::new("block_size must be > 0"));
        }
        if let Some(p) = self.initial_p
            && p > self.capacity
        {
            return Err(ConfigError::new(format!(
                "initial_p ({p}) must not exceed capacity ({})",
                self.capacity
            )));
        }
        Ok(())
    }
}

impl Default for ArcConfig {
    /// 128 MiB of 4 KiB blocks.
    fn default() -> Self {
        Self::new((DEFAULT_CACHE_BYTES / DEFAULT_BLOCK_SIZE) as usize)
    }
}

/// Fluent builder for [`ArcCache`].
#[derive(Debug, Clone)]
pub struct ArcBuilder {
    config: ArcConfig,
}

impl ArcBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            config: ArcConfig::new(capacity),
        }
    }

    pub fn from_config(config: ArcConfig) -> Self {
        Self { config }
    }

    pub fn block_size(mut self, block_size: u64) -> Self {
        self.config.block_size = block_size;
        self
    }

    pub fn initial_p(mut self, p: usize) -> Self {
        self.config.initial_p = Some(p);
        self
    }

    pub fn config(&self) -> &ArcConfig {
        &self.config
    }

    /// Builds the cache, rejecting invalid parameters.
    pub fn try_build(self) -> Result<ArcCache, ConfigError> {
        ArcCache::with_config(&self.config)
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid; use [`try_build`](Self::try_build)
    /// for user-supplied parameters.
    pub fn build(self) -> ArcCache {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }
}
