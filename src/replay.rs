//! Replay of byte-range I/O requests as block accesses.
//!
//! A trace record names a byte range and an operation. [`Replayer`] expands
//! it into the blocks it touches and calls [`BlockCache::access`] for each,
//! in ascending block order, tallying the classifications.
//!
//! ## Block span
//!
//! ```text
//!   first = offset / block_size
//!   last  = (offset + size) / block_size        (inclusive)
//!
//!   offset 0, size 4096, block 4096  →  blocks 0..=1
//!   offset 100, size 0, block 4096   →  block  0
//! ```
//!
//! The end bound is inclusive, so a request ending exactly on a block
//! boundary also touches the next block.
//!
//! ## Failures
//!
//! A request whose range overflows `u64` is rejected whole. A single block
//! whose access fails (allocation) is counted as a pass-through miss and the
//! request carries on with the next block.
//!
//! ## Example
//!
//! ```
//! use arcsim::policy::arc::ArcCache;
//! use arcsim::replay::{IoRequest, Replayer};
//!
//! let mut replayer = Replayer::new(ArcCache::new(64));
//! replayer.replay_all([
//!     IoRequest::read(0, 8192),
//!     IoRequest::read(4096, 100),
//! ]);
//!
//! let summary = replayer.summary();
//! assert_eq!(summary.requests, 2);
//! assert_eq!(summary.totals.accesses(), 4);
//! assert_eq!(summary.totals.misses, 3);
//! assert_eq!(summary.totals.recency_hits, 1);
//! ```

use std::ops::RangeInclusive;

use crate::error::AccessError;
use crate::policy::arc::HitKind;
use crate::traits::BlockCache;
use crate::types::{BlockId, OpKind};

/// One trace record: a byte range and what was done to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoRequest {
    pub offset: u64,
    pub size: u64,
    pub op: OpKind,
}

impl IoRequest {
    pub fn new(offset: u64, size: u64, op: OpKind) -> Self {
        Self { offset, size, op }
    }

    pub fn read(offset: u64, size: u64) -> Self {
        Self::new(offset, size, OpKind::Read)
    }

    pub fn write(offset: u64, size: u64) -> Self {
        Self::new(offset, size, OpKind::Write)
    }
}

/// Block ids spanned by `size` bytes at `offset`, end inclusive.
///
/// # Errors
///
/// [`AccessError::InvalidArgument`] if `block_size` is zero or
/// `offset + size` overflows.
pub fn block_span(
    offset: u64,
    size: u64,
    block_size: u64,
) -> Result<RangeInclusive<u64>, AccessError> {
    let zero_block_size = || AccessError::invalid_argument("block_size must be > 0");
    let first = BlockId::containing(offset, block_size).ok_or_else(zero_block_size)?;
    let end = offset.checked_add(size).ok_or_else(|| {
        AccessError::invalid_argument(format!("offset {offset} + size {size} overflows"))
    })?;
    let last = BlockId::containing(end, block_size).ok_or_else(zero_block_size)?;
    Ok(first.get()..=last.get())
}

/// Classification tallies for one request, or a running total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub recency_hits: u64,
    pub frequency_hits: u64,
    pub ghost_recency_hits: u64,
    pub ghost_frequency_hits: u64,
    pub misses: u64,
    /// Blocks whose access failed and were passed through uncached.
    pub failed_accesses: u64,
}

impl RequestOutcome {
    fn record(&mut self, hit: HitKind) {
        match hit {
            HitKind::RecencyHit => self.recency_hits += 1,
            HitKind::FrequencyHit => self.frequency_hits += 1,
            HitKind::GhostHitRecency => self.ghost_recency_hits += 1,
            HitKind::GhostHitFrequency => self.ghost_frequency_hits += 1,
            HitKind::Miss => self.misses += 1,
        }
    }

    /// Every block visited, failed ones included.
    pub fn accesses(&self) -> u64 {
        self.hits() + self.misses + self.failed_accesses
    }

    /// Non-miss classifications, ghost hits included.
    pub fn hits(&self) -> u64 {
        self.resident_hits() + self.ghost_recency_hits + self.ghost_frequency_hits
    }

    pub fn resident_hits(&self) -> u64 {
        self.recency_hits + self.frequency_hits
    }

    fn merge(&mut self, other: &RequestOutcome) {
        self.recency_hits += other.recency_hits;
        self.frequency_hits += other.frequency_hits;
        self.ghost_recency_hits += other.ghost_recency_hits;
        self.ghost_frequency_hits += other.ghost_frequency_hits;
        self.misses += other.misses;
        self.failed_accesses += other.failed_accesses;
    }
}

/// Totals across everything a [`Replayer`] has seen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Requests that were expanded into blocks.
    pub requests: u64,
    /// Requests refused before touching the cache.
    pub rejected_requests: u64,
    pub totals: RequestOutcome,
}

/// Feeds requests into a [`BlockCache`] one block at a time.
#[derive(Debug)]
pub struct Replayer<C: BlockCache> {
    cache: C,
    summary: ReplaySummary,
}

impl<C: BlockCache> Replayer<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            summary: ReplaySummary::default(),
        }
    }

    /// Replays one request.
    ///
    /// # Errors
    ///
    /// Only when the byte range cannot be mapped to blocks; the cache is not
    /// touched in that case. Per-block failures show up in
    /// [`RequestOutcome::failed_accesses`].
    pub fn replay_request(&mut self, request: &IoRequest) -> Result<RequestOutcome, AccessError> {
        let span = match block_span(request.offset, request.size, self.cache.block_size()) {
            Ok(span) => span,
            Err(err) => {
                self.summary.rejected_requests += 1;
                return Err(err);
            },
        };

        let mut outcome = RequestOutcome::default();
        for raw in span {
            let block = BlockId::new(raw);
            match self.cache.access(block, request.op) {
                Ok(hit) => outcome.record(hit),
                Err(err) => {
                    log::warn!("block {block} passed through uncached: {err}");
                    outcome.failed_accesses += 1;
                },
            }
        }

        self.summary.requests += 1;
        self.summary.totals.merge(&outcome);
        Ok(outcome)
    }

    /// Replays requests in order; rejected ones are logged and skipped.
    pub fn replay_all<I>(&mut self, requests: I) -> &ReplaySummary
    where
        I: IntoIterator<Item = IoRequest>,
    {
        for request in requests {
            if let Err(err) = self.replay_request(&request) {
                log::warn!("skipping request {request:?}: {err}");
            }
        }
        &self.summary
    }

    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    pub fn into_inner(self) -> C {
        self.cache
    }
}
