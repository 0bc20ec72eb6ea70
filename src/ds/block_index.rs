//! Chained hash index from [`BlockId`] to arena handle.
//!
//! Buckets are chosen by hashing the integer block id with `FxHasher`; each
//! bucket is a short chain compared by exact block id equality, so two
//! distinct blocks never alias even when they share a bucket. The index does
//! not own lines: it stores the same [`SlotId`] handles the state lists use.
//!
//! ## Architecture
//!
//! ```text
//!   buckets: Vec<Vec<(BlockId, SlotId)>>      (bucket count ≈ cache capacity)
//!   ┌────┬───────────────────────────────┐
//!   │ 0  │ (17, id_3)                    │
//!   │ 1  │                               │
//!   │ 2  │ (4, id_0) → (90, id_7)        │  ← chain walked with `==`
//!   │ …  │                               │
//!   └────┴───────────────────────────────┘
//! ```
//!
//! ## Performance
//! - `lookup` / `insert` / `remove`: O(1) amortized, O(chain) worst case
//! - `try_reserve(block)`: grows only the target chain

use std::collections::TryReserveError;
use std::hash::BuildHasher;

use rustc_hash::FxBuildHasher;

use crate::ds::slot_arena::SlotId;
use crate::types::BlockId;

#[derive(Debug)]
pub struct BlockIndex {
    buckets: Vec<Vec<(BlockId, SlotId)>>,
    len: usize,
    #[cfg(test)]
    fail_next_reserve: bool,
}

impl BlockIndex {
    /// Creates an index with `bucket_count` chains (at least one).
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        Self {
            buckets: (0..bucket_count).map(|_| Vec::new()).collect(),
            len: 0,
            #[cfg(test)]
            fail_next_reserve: false,
        }
    }

    /// Fallible variant of [`new`](Self::new) for capacities taken from user
    /// input.
    pub fn try_new(bucket_count: usize) -> Result<Self, TryReserveError> {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        buckets.resize_with(bucket_count, Vec::new);
        Ok(Self {
            buckets,
            len: 0,
            #[cfg(test)]
            fail_next_reserve: false,
        })
    }

    /// Makes the next [`try_reserve`](Self::try_reserve) fail.
    #[cfg(test)]
    pub(crate) fn fail_next_reserve(&mut self) {
        self.fail_next_reserve = true;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn bucket_of(&self, block: BlockId) -> usize {
        let hash = FxBuildHasher.hash_one(block.get());
        (hash % self.buckets.len() as u64) as usize
    }

    /// Returns the handle stored for `block`.
    pub fn lookup(&self, block: BlockId) -> Option<SlotId> {
        self.buckets[self.bucket_of(block)]
            .iter()
            .find(|(candidate, _)| *candidate == block)
            .map(|&(_, id)| id)
    }

    pub fn contains(&self, block: BlockId) -> bool {
        self.lookup(block).is_some()
    }

    /// Makes sure inserting `block` next will not allocate.
    pub fn try_reserve(&mut self, block: BlockId) -> Result<(), TryReserveError> {
        #[cfg(test)]
        if std::mem::take(&mut self.fail_next_reserve) {
            return Vec::<u8>::new().try_reserve(usize::MAX);
        }
        let bucket = self.bucket_of(block);
        self.buckets[bucket].try_reserve(1)
    }

    /// Adds `block → id`. The caller guarantees `block` is not indexed yet.
    pub fn insert(&mut self, block: BlockId, id: SlotId) {
        debug_assert!(!self.contains(block), "block {block} indexed twice");
        let bucket = self.bucket_of(block);
        self.buckets[bucket].push((block, id));
        self.len += 1;
    }

    /// Drops the mapping for `block` and returns the handle it pointed at.
    pub fn remove(&mut self, block: BlockId) -> Option<SlotId> {
        let bucket = self.bucket_of(block);
        let chain = &mut self.buckets[bucket];
        let pos = chain.iter().position(|(candidate, _)| *candidate == block)?;
        let (_, id) = chain.swap_remove(pos);
        self.len -= 1;
        Some(id)
    }

    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    /// Iterates every `(block, handle)` pair in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, SlotId)> + '_ {
        self.buckets.iter().flat_map(|chain| chain.iter().copied())
    }

    /// Length of the longest chain.
    pub fn max_chain_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}
