//! # Cache Trait Seam
//!
//! The replay driver talks to a cache only through [`BlockCache`]. The ARC
//! policy is the implementation shipped here; anything else that classifies
//! block accesses the same way (a reference LRU, an instrumented wrapper) can
//! be replayed with the same driver.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────┐    access(block, op)     ┌───────────────────────┐
//!   │   Replayer<C>         │ ───────────────────────► │   C: BlockCache       │
//!   │   (replay.rs)         │ ◄─────────────────────── │   e.g. ArcCache       │
//!   └───────────────────────┘  Result<HitKind, Error>  └───────────────────────┘
//! ```
//!
//! ## Contract
//!
//! - `access` is the only mutating call. It either completes the state
//!   transition and updates the counters, or returns an error and leaves both
//!   untouched.
//! - `contains`/`len`/`capacity` describe *resident* blocks only; ghost
//!   entries are bookkeeping and never count as cached.

use crate::error::AccessError;
use crate::policy::arc::HitKind;
use crate::types::{BlockId, OpKind};

/// A block cache that classifies every access.
///
/// # Example
///
/// ```
/// use arcsim::policy::arc::{ArcCache, HitKind};
/// use arcsim::traits::BlockCache;
/// use arcsim::types::{BlockId, OpKind};
///
/// fn touch_twice<C: BlockCache>(cache: &mut C, block: BlockId) -> HitKind {
///     cache.access(block, OpKind::Read).unwrap();
///     cache.access(block, OpKind::Read).unwrap()
/// }
///
/// let mut cache = ArcCache::new(8);
/// assert_eq!(touch_twice(&mut cache, BlockId::new(3)), HitKind::RecencyHit);
/// ```
pub trait BlockCache {
    /// Looks up `block`, performs the policy's state transition and records
    /// the access under `op`.
    fn access(&mut self, block: BlockId, op: OpKind) -> Result<HitKind, AccessError>;

    /// Returns `true` if `block` is currently cached (not merely a ghost).
    fn contains(&self, block: BlockId) -> bool;

    /// Number of cached blocks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached blocks.
    fn capacity(&self) -> usize;

    /// Bytes per block, used to map byte ranges onto block ids.
    fn block_size(&self) -> u64;
}
