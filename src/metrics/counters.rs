//! Read/write/hit counters updated once per block access.

use crate::policy::arc::HitKind;
use crate::types::OpKind;

/// Running totals for one cache.
///
/// `hits` follows the classic simulator convention: every read whose
/// classification is not [`HitKind::Miss`] counts, ghost hits included. Ghost
/// hits are misses for a real cache (the data was already evicted), so
/// `resident_hits` and `ghost_hits` split that total for accurate hit ratios.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AccessCounters {
    reads: u64,
    writes: u64,
    hits: u64,
    resident_hits: u64,
    ghost_hits: u64,
}

impl AccessCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed access.
    pub fn record(&mut self, op: OpKind, hit: HitKind) {
        if !op.is_read() {
            self.writes += 1;
            return;
        }
        self.reads += 1;
        if hit.is_resident_hit() {
            self.hits += 1;
            self.resident_hits += 1;
        } else if hit.is_ghost_hit() {
            self.hits += 1;
            self.ghost_hits += 1;
        }
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Read hits, ghost hits included.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Read hits served from the Recency or Frequency list.
    pub fn resident_hits(&self) -> u64 {
        self.resident_hits
    }

    /// Read hits found only in a ghost list.
    pub fn ghost_hits(&self) -> u64 {
        self.ghost_hits
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
