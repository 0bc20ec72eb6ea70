//! Shared vocabulary: block identifiers and operation kinds.

use std::fmt;

/// Default bytes per block (4 KiB).
pub const DEFAULT_BLOCK_SIZE: u64 = 4 * 1024;

/// Index of a fixed-size storage block, `byte_offset / block_size`.
///
/// The cache's addressable unit and the key of every cache line. Backed by an
/// unsigned integer, so negative block ids cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Block containing byte `offset` for the given block size.
    ///
    /// Returns `None` when `block_size` is zero.
    pub fn containing(offset: u64, block_size: u64) -> Option<Self> {
        offset.checked_div(block_size).map(Self)
    }
}

impl From<u64> for BlockId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<BlockId> for u64 {
    fn from(block: BlockId) -> Self {
        block.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared kind of an I/O request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Read,
    Write,
}

impl OpKind {
    pub fn is_read(self) -> bool {
        matches!(self, OpKind::Read)
    }
}
