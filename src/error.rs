//! Error types for the arcsim library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when simulator configuration is invalid
//!   (zero capacity, zero block size, split target above capacity).
//! - [`AccessError`]: Returned by a failed block access. The cache is left
//!   exactly as it was before the call, counters included. A lookup that
//!   lands on corrupted bookkeeping reports the broken invariant instead of
//!   repairing it.
//! - [`InvariantError`]: Returned by
//!   [`ArcCache::check_invariants`](crate::policy::arc::ArcCache::check_invariants)
//!   when the four lists, the index or the split target disagree.
//!
//! ## Example Usage
//!
//! ```
//! use arcsim::builder::ArcBuilder;
//!
//! let bad = ArcBuilder::new(0).try_build();
//! assert!(bad.unwrap_err().message().contains("capacity"));
//!
//! let cache = ArcBuilder::new(64).block_size(512).try_build().unwrap();
//! assert_eq!(cache.capacity(), 64);
//! ```

use std::fmt;

use crate::types::BlockId;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when simulator configuration parameters are invalid.
///
/// Produced by [`ArcCache::try_new`](crate::policy::arc::ArcCache::try_new)
/// and [`ArcBuilder::try_build`](crate::builder::ArcBuilder::try_build).
///
/// # Example
///
/// ```
/// use arcsim::policy::arc::ArcCache;
///
/// let err = ArcCache::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// AccessError
// ---------------------------------------------------------------------------

/// Error returned by a block access or a request expansion.
///
/// A failed access registers nothing; the replay driver treats the block as a
/// pass-through miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The request cannot be mapped onto blocks (zero block size, byte range
    /// overflowing `u64`).
    InvalidArgument(String),
    /// Storage for a new cache line or its index entry could not be reserved.
    AllocationFailure { block: BlockId },
    /// The index and the lists disagree about a block.
    Inconsistent(InvariantError),
}

impl AccessError {
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            AccessError::AllocationFailure { block } => {
                write!(f, "could not allocate a cache line for block {block}")
            },
            AccessError::Inconsistent(err) => write!(f, "cache state is inconsistent: {err}"),
        }
    }
}

impl std::error::Error for AccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccessError::Inconsistent(err) => Some(err),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
