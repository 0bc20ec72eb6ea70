//! Adaptive Replacement Cache (ARC) block simulator.
//!
//! Tracks cache membership (never data) for a stream of block accesses and
//! classifies each one, adapting the split between recency and frequency
//! retention as ghost hits reveal which side was evicted too eagerly.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                              ArcCache Layout                                │
//! │                                                                             │
//! │   ┌─────────────────────────────────────────────────────────────────────┐   │
//! │   │  index: BlockIndex                 lines: SlotArena<CacheLine>      │   │
//! │   │                                                                     │   │
//! │   │  ┌──────────┬───────────┐           ┌────────┬──────────────────┐   │   │
//! │   │  │ BlockId  │  SlotId   │           │ SlotId │ block,membership │   │   │
//! │   │  ├──────────┼───────────┤           ├────────┼──────────────────┤   │   │
//! │   │  │    17    │   id_0    │──────────►│ id_0   │ 17, Recency      │   │   │
//! │   │  │    42    │   id_1    │──────────►│ id_1   │ 42, Frequency    │   │   │
//! │   │  │     9    │   id_2    │──────────►│ id_2   │  9, RecencyGhost │   │   │
//! │   │  └──────────┴───────────┘           └────────┴──────────────────┘   │   │
//! │   └─────────────────────────────────────────────────────────────────────┘   │
//! │                                                                             │
//! │   ┌─────────────────────────────────────────────────────────────────────┐   │
//! │   │                         Four CacheStates                            │   │
//! │   │                                                                     │   │
//! │   │   Recency (seen once)                 Frequency (seen again)        │   │
//! │   │   head ─► [id_0] ◄──► … ◄── tail      head ─► [id_1] ◄──► … ◄── tail│   │
//! │   │             │ demote                            │ demote            │   │
//! │   │             ▼                                   ▼                   │   │
//! │   │   RecencyGhost                        FrequencyGhost                │   │
//! │   │   head ─► [id_2] ◄──► … ◄── tail      head ─► … ◄── tail            │   │
//! │   │             │ discard                           │ discard           │   │
//! │   │             ▼                                   ▼                   │   │
//! │   │          (line destroyed, index entry removed)                      │   │
//! │   │                                                                     │   │
//! │   │   Split target p: desired size of Recency                           │   │
//! │   │   • RecencyGhost hit   → p += max(|FG| / |RG|, 1), capped at c      │   │
//! │   │   • FrequencyGhost hit → p -= max(|RG| / |FG|, 1), floored at 0     │   │
//! │   └─────────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Access Flow
//!
//! ```text
//!   reference(block):
//!     found in Recency or Frequency  → move to Frequency head      RecencyHit / FrequencyHit
//!     found in RecencyGhost          → raise p, move to Frequency  GhostHitRecency
//!     found in FrequencyGhost        → lower p, move to Frequency  GhostHitFrequency
//!     not found                      → new line, Recency head      Miss
//! ```
//!
//! Every move goes through one primitive, `transfer`. Entering Recency or
//! Frequency from outside them first runs `balance(1)`:
//!
//! ```text
//!   phase 1, while |R| + |F| + 1 > c:
//!     |R| > p        → Recency tail   → RecencyGhost
//!     |F| > 0        → Frequency tail → FrequencyGhost
//!     |R| > 0        → Recency tail   → RecencyGhost   (only when p == c)
//!   phase 2, while |RG| + |FG| > c:
//!     |FG| > p       → discard FrequencyGhost tail
//!     |RG| > 0       → discard RecencyGhost tail
//! ```
//!
//! ## Invariants (after every call)
//!
//! - `|R| + |F| <= c`, `|RG| + |FG| <= c`, `0 <= p <= c`
//! - a line sits in exactly one list and its `membership` names that list
//! - a block is indexed iff its line sits in a list
//!
//! [`ArcCache::check_invariants`] verifies all of them.
//!
//! ## Hit Counting
//!
//! `hits` counts every read that was not a [`HitKind::Miss`], ghost hits
//! included. That matches the classic trace-simulator report but overstates a
//! real cache's hit rate; `resident_hits` excludes ghost hits.
//!
//! ## Example Usage
//!
//! ```
//! use arcsim::policy::arc::{ArcCache, HitKind, StateKind};
//! use arcsim::types::{BlockId, OpKind};
//!
//! let mut cache = ArcCache::new(4);
//! let b = BlockId::new;
//!
//! assert_eq!(cache.access(b(1), OpKind::Read).unwrap(), HitKind::Miss);
//! assert_eq!(cache.access(b(1), OpKind::Read).unwrap(), HitKind::RecencyHit);
//! assert_eq!(cache.head_of(StateKind::Frequency), Some(b(1)));
//! assert_eq!(cache.hits(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! Not synchronized. A balance touches all four lists and the index within a
//! single access, so callers sharing a cache must hold one lock around each
//! `access`.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::builder::ArcConfig;
use crate::ds::block_index::BlockIndex;
use crate::ds::line_list::{LineList, Linked, Links};
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{AccessError, ConfigError, InvariantError};
use crate::metrics::{AccessCounters, ArcStatsSnapshot, MetricsReset, MetricsSnapshotProvider};
use crate::traits::BlockCache;
use crate::types::{BlockId, OpKind};

/// One of the four lists a line can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Cached, seen once since admission.
    Recency,
    /// Evicted from Recency; metadata only.
    RecencyGhost,
    /// Cached, seen at least twice.
    Frequency,
    /// Evicted from Frequency; metadata only.
    FrequencyGhost,
}

impl StateKind {
    pub const ALL: [StateKind; 4] = [
        StateKind::Recency,
        StateKind::RecencyGhost,
        StateKind::Frequency,
        StateKind::FrequencyGhost,
    ];

    /// `true` for the lists that hold cached blocks.
    pub fn is_resident(self) -> bool {
        matches!(self, StateKind::Recency | StateKind::Frequency)
    }

    /// Ghost list that receives lines demoted from this one.
    fn ghost(self) -> StateKind {
        match self {
            StateKind::Recency | StateKind::RecencyGhost => StateKind::RecencyGhost,
            StateKind::Frequency | StateKind::FrequencyGhost => StateKind::FrequencyGhost,
        }
    }

    fn slot(self) -> usize {
        match self {
            StateKind::Recency => 0,
            StateKind::RecencyGhost => 1,
            StateKind::Frequency => 2,
            StateKind::FrequencyGhost => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StateKind::Recency => "recency",
            StateKind::RecencyGhost => "recency-ghost",
            StateKind::Frequency => "frequency",
            StateKind::FrequencyGhost => "frequency-ghost",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which list a line currently belongs to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Membership {
    /// Not linked into any list (not yet admitted, or unknown block).
    #[default]
    None,
    Recency,
    RecencyGhost,
    Frequency,
    FrequencyGhost,
}

impl Membership {
    pub fn state(self) -> Option<StateKind> {
        match self {
            Membership::None => None,
            Membership::Recency => Some(StateKind::Recency),
            Membership::RecencyGhost => Some(StateKind::RecencyGhost),
            Membership::Frequency => Some(StateKind::Frequency),
            Membership::FrequencyGhost => Some(StateKind::FrequencyGhost),
        }
    }

    pub fn is_resident(self) -> bool {
        self.state().is_some_and(StateKind::is_resident)
    }
}

impl From<StateKind> for Membership {
    fn from(kind: StateKind) -> Self {
        match kind {
            StateKind::Recency => Membership::Recency,
            StateKind::RecencyGhost => Membership::RecencyGhost,
            StateKind::Frequency => Membership::Frequency,
            StateKind::FrequencyGhost => Membership::FrequencyGhost,
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            Some(kind) => f.write_str(kind.name()),
            None => f.write_str("none"),
        }
    }
}

/// Classification of one access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    RecencyHit,
    FrequencyHit,
    GhostHitRecency,
    GhostHitFrequency,
    Miss,
}

impl HitKind {
    /// `true` for every classification except [`HitKind::Miss`].
    pub fn is_hit(self) -> bool {
        !matches!(self, HitKind::Miss)
    }

    /// `true` when the block was actually cached.
    pub fn is_resident_hit(self) -> bool {
        matches!(self, HitKind::RecencyHit | HitKind::FrequencyHit)
    }

    /// `true` when the block was only remembered by a ghost list.
    pub fn is_ghost_hit(self) -> bool {
        matches!(self, HitKind::GhostHitRecency | HitKind::GhostHitFrequency)
    }
}

/// Per-block metadata; one per distinct block the cache remembers.
#[derive(Debug)]
pub struct CacheLine {
    block: BlockId,
    membership: Membership,
    links: Links,
}

impl CacheLine {
    fn new(block: BlockId) -> Self {
        Self {
            block,
            membership: Membership::None,
            links: Links::default(),
        }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }
}

impl Linked for CacheLine {
    fn links(&self) -> &Links {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }
}

/// One named list: head = most recently touched, tail = least.
#[derive(Debug)]
pub struct CacheState {
    kind: StateKind,
    list: LineList,
}

impl CacheState {
    fn new(kind: StateKind) -> Self {
        Self {
            kind,
            list: LineList::new(),
        }
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// Number of lines in this list.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    State(StateKind),
    /// Remove from the index and destroy the line.
    Discard,
}

/// ARC controller: the four lists, the block index, the split target and the
/// access counters.
///
/// # Example
///
/// ```
/// use arcsim::policy::arc::{ArcCache, Membership};
/// use arcsim::types::{BlockId, OpKind};
///
/// let mut cache = ArcCache::new(1);
/// cache.access(BlockId::new(10), OpKind::Read).unwrap();
/// cache.access(BlockId::new(20), OpKind::Read).unwrap();
///
/// // 10 was demoted, not forgotten.
/// assert_eq!(cache.membership_of(BlockId::new(10)), Membership::RecencyGhost);
/// assert_eq!(cache.membership_of(BlockId::new(20)), Membership::Recency);
/// ```
pub struct ArcCache {
    lines: SlotArena<CacheLine>,
    index: BlockIndex,
    /// Indexed by `StateKind::slot`.
    states: [CacheState; 4],
    capacity: usize,
    p: usize,
    initial_p: usize,
    block_size: u64,
    counters: AccessCounters,
}

impl ArcCache {
    /// Creates a cache holding up to `capacity` blocks of the default size.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; see [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`new`](Self::new).
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_config(&ArcConfig::new(capacity))
    }

    pub fn with_config(config: &ArcConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let index = BlockIndex::try_new(config.capacity).map_err(|_| {
            ConfigError::new(format!(
                "capacity {} is too large to index",
                config.capacity
            ))
        })?;
        let initial_p = config.resolved_initial_p();
        log::debug!(
            "arc cache: capacity={} block_size={} p={}",
            config.capacity,
            config.block_size,
            initial_p
        );
        Ok(Self {
            lines: SlotArena::new(),
            index,
            states: StateKind::ALL.map(CacheState::new),
            capacity: config.capacity,
            p: initial_p,
            initial_p,
            block_size: config.block_size,
            counters: AccessCounters::new(),
        })
    }

    // -- accessors ----------------------------------------------------------

    /// Maximum combined size of Recency and Frequency (`c`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current split target `p`, the desired size of Recency.
    pub fn p_value(&self) -> usize {
        self.p
    }

    pub fn initial_p(&self) -> usize {
        self.initial_p
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn state(&self, kind: StateKind) -> &CacheState {
        &self.states[kind.slot()]
    }

    pub fn len_of(&self, kind: StateKind) -> usize {
        self.state(kind).len()
    }

    /// Cached blocks: `|Recency| + |Frequency|`.
    pub fn len(&self) -> usize {
        self.len_of(StateKind::Recency) + self.len_of(StateKind::Frequency)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remembered-but-evicted blocks: `|RecencyGhost| + |FrequencyGhost|`.
    pub fn ghost_len(&self) -> usize {
        self.len_of(StateKind::RecencyGhost) + self.len_of(StateKind::FrequencyGhost)
    }

    /// `true` if `block` is cached (Recency or Frequency).
    pub fn contains(&self, block: BlockId) -> bool {
        self.membership_of(block).is_resident()
    }

    /// `true` if `block` has a line in any of the four lists.
    pub fn tracks(&self, block: BlockId) -> bool {
        self.index.contains(block)
    }

    /// Which of the four lists holds `block`, or [`Membership::None`].
    pub fn membership_of(&self, block: BlockId) -> Membership {
        self.index
            .lookup(block)
            .and_then(|id| self.lines.get(id))
            .map_or(Membership::None, CacheLine::membership)
    }

    /// Blocks of one list from head (most recent) to tail.
    pub fn state_blocks(&self, kind: StateKind) -> Vec<BlockId> {
        self.state(kind)
            .list
            .iter(&self.lines)
            .filter_map(|id| self.lines.get(id).map(CacheLine::block))
            .collect()
    }

    /// Most recently touched block of a list.
    pub fn head_of(&self, kind: StateKind) -> Option<BlockId> {
        self.block_at(self.state(kind).list.front())
    }

    /// Least recently touched block of a list; the next eviction candidate.
    pub fn tail_of(&self, kind: StateKind) -> Option<BlockId> {
        self.block_at(self.state(kind).list.back())
    }

    fn block_at(&self, id: Option<SlotId>) -> Option<BlockId> {
        id.and_then(|id| self.lines.get(id)).map(CacheLine::block)
    }

    pub fn counters(&self) -> &AccessCounters {
        &self.counters
    }

    pub fn reads(&self) -> u64 {
        self.counters.reads()
    }

    pub fn writes(&self) -> u64 {
        self.counters.writes()
    }

    /// Read hits, ghost hits included.
    pub fn hits(&self) -> u64 {
        self.counters.hits()
    }

    pub fn reset_counters(&mut self) {
        self.counters.reset();
    }

    /// Forgets every line, restores the initial split target and zeroes the
    /// counters.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.index.clear();
        for state in &mut self.states {
            state.list.clear();
        }
        self.p = self.initial_p;
        self.counters.reset();
    }

    // -- access path --------------------------------------------------------

    /// Classifies an access to `block`, performs the ARC transition and
    /// records it under `op`.
    ///
    /// On error nothing changed, counters included.
    pub fn access(&mut self, block: BlockId, op: OpKind) -> Result<HitKind, AccessError> {
        let hit = self.reference(block)?;
        self.counters.record(op, hit);
        Ok(hit)
    }

    /// The ARC transition for one access, without touching the counters.
    ///
    /// An indexed block whose line is freed or unlisted is reported as
    /// [`AccessError::Inconsistent`] and nothing is modified.
    pub fn reference(&mut self, block: BlockId) -> Result<HitKind, AccessError> {
        let Some(id) = self.index.lookup(block) else {
            return self.admit(block);
        };
        let membership = self.lines.get(id).map(CacheLine::membership);

        let hit = match membership {
            Some(Membership::Recency) => HitKind::RecencyHit,
            Some(Membership::Frequency) => HitKind::FrequencyHit,
            Some(Membership::RecencyGhost) => {
                self.favor_recency();
                HitKind::GhostHitRecency
            },
            Some(Membership::FrequencyGhost) => {
                self.favor_frequency();
                HitKind::GhostHitFrequency
            },
            Some(Membership::None) | None => {
                let err = InvariantError::new(format!(
                    "block {block} is indexed to slot {} but is in no list",
                    id.index()
                ));
                log::warn!("{err}");
                return Err(AccessError::Inconsistent(err));
            },
        };
        self.transfer(id, Destination::State(StateKind::Frequency));
        Ok(hit)
    }

    /// New line for an unseen block, placed at the head of Recency.
    fn admit(&mut self, block: BlockId) -> Result<HitKind, AccessError> {
        if self.lines.try_reserve(1).is_err() || self.index.try_reserve(block).is_err() {
            log::warn!("block {block}: allocation failed, access not registered");
            return Err(AccessError::AllocationFailure { block });
        }
        let id = self.lines.insert(CacheLine::new(block));
        self.index.insert(block, id);
        self.transfer(id, Destination::State(StateKind::Recency));
        Ok(HitKind::Miss)
    }

    /// Ghost hit in RecencyGhost: grow the Recency target.
    fn favor_recency(&mut self) {
        let recency_ghost = self.len_of(StateKind::RecencyGhost).max(1);
        let frequency_ghost = self.len_of(StateKind::FrequencyGhost);
        let delta = (frequency_ghost / recency_ghost).max(1);
        let old = self.p;
        self.p = self.p.saturating_add(delta).min(self.capacity);
        log::debug!("recency ghost hit: p {old} -> {}", self.p);
    }

    /// Ghost hit in FrequencyGhost: shrink the Recency target.
    fn favor_frequency(&mut self) {
        let recency_ghost = self.len_of(StateKind::RecencyGhost);
        let frequency_ghost = self.len_of(StateKind::FrequencyGhost).max(1);
        let delta = (recency_ghost / frequency_ghost).max(1);
        let old = self.p;
        self.p = self.p.saturating_sub(delta);
        log::debug!("frequency ghost hit: p {old} -> {}", self.p);
    }

    /// Moves a line to the head of `dest`, or destroys it.
    ///
    /// Entering Recency/Frequency from anywhere else balances first, so the
    /// capacity bounds hold once the line lands.
    fn transfer(&mut self, id: SlotId, dest: Destination) {
        let Some(line) = self.lines.get_mut(id) else {
            return;
        };
        let previous = std::mem::take(&mut line.membership);
        let block = line.block;
        if let Some(from) = previous.state() {
            self.states[from.slot()].list.unlink(&mut self.lines, id);
        }

        match dest {
            Destination::Discard => {
                self.index.remove(block);
                self.lines.remove(id);
                log::trace!("block {block}: {previous} -> discarded");
            },
            Destination::State(to) => {
                if to.is_resident() && !previous.is_resident() {
                    self.balance(1);
                }
                self.states[to.slot()].list.push_front(&mut self.lines, id);
                if let Some(line) = self.lines.get_mut(id) {
                    line.membership = to.into();
                }
                log::trace!("block {block}: {previous} -> {to}");
            },
        }
    }

    /// Makes room for `pending` more resident lines, then trims the ghosts.
    fn balance(&mut self, pending: usize) {
        while self.len() + pending > self.capacity {
            let from = if self.len_of(StateKind::Recency) > self.p {
                StateKind::Recency
            } else if !self.state(StateKind::Frequency).is_empty() {
                StateKind::Frequency
            } else if !self.state(StateKind::Recency).is_empty() {
                // p == c: Recency alone fills the cache.
                StateKind::Recency
            } else {
                log::warn!("balance: no resident line left to demote");
                break;
            };
            let Some(victim) = self.state(from).list.back() else {
                break;
            };
            self.transfer(victim, Destination::State(from.ghost()));
        }

        while self.ghost_len() > self.capacity {
            let from = if self.len_of(StateKind::FrequencyGhost) > self.p {
                StateKind::FrequencyGhost
            } else if !self.state(StateKind::RecencyGhost).is_empty() {
                StateKind::RecencyGhost
            } else {
                log::warn!("balance: ghost lists over capacity with nothing to discard");
                break;
            };
            let Some(victim) = self.state(from).list.back() else {
                break;
            };
            self.transfer(victim, Destination::Discard);
        }
    }

    // -- diagnostics --------------------------------------------------------

    /// Verifies list links, membership tags, index consistency and the
    /// capacity bounds.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut linked = FxHashSet::default();

        for state in &self.states {
            let kind = state.kind;
            state
                .list
                .check_links(&self.lines)
                .map_err(|err| InvariantError::new(format!("{kind}: {err}")))?;

            for id in state.list.iter(&self.lines) {
                let line = self.lines.get(id).ok_or_else(|| {
                    InvariantError::new(format!("{kind}: slot {} is free", id.index()))
                })?;
                if line.membership != Membership::from(kind) {
                    return Err(InvariantError::new(format!(
                        "block {} sits in {kind} but is tagged {}",
                        line.block, line.membership
                    )));
                }
                if self.index.lookup(line.block) != Some(id) {
                    return Err(InvariantError::new(format!(
                        "block {} in {kind} is not indexed to its line",
                        line.block
                    )));
                }
                if !linked.insert(id) {
                    return Err(InvariantError::new(format!(
                        "block {} appears in more than one list",
                        line.block
                    )));
                }
            }
        }

        if linked.len() != self.lines.len() {
            return Err(InvariantError::new(format!(
                "{} lines allocated but {} linked",
                self.lines.len(),
                linked.len()
            )));
        }
        if self.index.len() != self.lines.len() {
            return Err(InvariantError::new(format!(
                "index holds {} blocks for {} lines",
                self.index.len(),
                self.lines.len()
            )));
        }
        for (block, id) in self.index.iter() {
            match self.lines.get(id) {
                Some(line) if line.block == block => {},
                _ => {
                    return Err(InvariantError::new(format!(
                        "index entry for block {block} points at the wrong line"
                    )));
                },
            }
        }

        if self.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "resident lines ({}) exceed capacity ({})",
                self.len(),
                self.capacity
            )));
        }
        if self.ghost_len() > self.capacity {
            return Err(InvariantError::new(format!(
                "ghost lines ({}) exceed capacity ({})",
                self.ghost_len(),
                self.capacity
            )));
        }
        if self.p > self.capacity {
            return Err(InvariantError::new(format!(
                "p ({}) exceeds capacity ({})",
                self.p, self.capacity
            )));
        }
        Ok(())
    }

    /// Panics if [`check_invariants`](Self::check_invariants) fails.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("ARC invariant violated: {err}");
        }
    }
}

impl fmt::Debug for ArcCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCache")
            .field("capacity", &self.capacity)
            .field("p", &self.p)
            .field("recency", &self.len_of(StateKind::Recency))
            .field("recency_ghost", &self.len_of(StateKind::RecencyGhost))
            .field("frequency", &self.len_of(StateKind::Frequency))
            .field("frequency_ghost", &self.len_of(StateKind::FrequencyGhost))
            .field("counters", &self.counters)
            .finish()
    }
}

impl BlockCache for ArcCache {
    fn access(&mut self, block: BlockId, op: OpKind) -> Result<HitKind, AccessError> {
        ArcCache::access(self, block, op)
    }

    fn contains(&self, block: BlockId) -> bool {
        ArcCache::contains(self, block)
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn block_size(&self) -> u64 {
        self.block_size
    }
}

impl MetricsSnapshotProvider<ArcStatsSnapshot> for ArcCache {
    fn snapshot(&self) -> ArcStatsSnapshot {
        ArcStatsSnapshot {
            reads: self.counters.reads(),
            writes: self.counters.writes(),
            hits: self.counters.hits(),
            resident_hits: self.counters.resident_hits(),
            ghost_hits: self.counters.ghost_hits(),
            recency_len: self.len_of(StateKind::Recency),
            recency_ghost_len: self.len_of(StateKind::RecencyGhost),
            frequency_len: self.len_of(StateKind::Frequency),
            frequency_ghost_len: self.len_of(StateKind::FrequencyGhost),
            target_recency: self.p,
            capacity: self.capacity,
        }
    }
}

impl MetricsReset for ArcCache {
    fn reset_metrics(&mut self) {
        self.reset_counters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(raw: u64) -> BlockId {
        BlockId::new(raw)
    }

    fn read_all(cache: &mut ArcCache, blocks: &[u64]) -> Vec<HitKind> {
        blocks
            .iter()
            .map(|&raw| cache.access(b(raw), OpKind::Read).unwrap())
            .collect()
    }

    fn blocks(cache: &ArcCache, kind: StateKind) -> Vec<u64> {
        cache.state_blocks(kind).into_iter().map(BlockId::get).collect()
    }

    #[test]
    fn arc_new_cache() {
        let cache = ArcCache::new(100);
        assert_eq!(cache.capacity(), 100);
        assert_eq!(cache.p_value(), 50);
        assert_eq!(cache.block_size(), 4096);
        assert!(cache.is_empty());
        for kind in StateKind::ALL {
            assert_eq!(cache.len_of(kind), 0);
            assert_eq!(cache.state(kind).kind(), kind);
        }
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_zero_capacity_is_rejected() {
        let err = ArcCache::try_new(0).unwrap_err();
        assert!(err.message().contains("capacity"));
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn arc_new_panics_on_zero_capacity() {
        let _ = ArcCache::new(0);
    }

    #[test]
    fn arc_miss_then_recency_hit_then_frequency_hit() {
        let mut cache = ArcCache::new(8);
        assert_eq!(
            read_all(&mut cache, &[7, 7, 7]),
            vec![HitKind::Miss, HitKind::RecencyHit, HitKind::FrequencyHit]
        );
        assert_eq!(cache.membership_of(b(7)), Membership::Frequency);
        assert_eq!(cache.len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_miss_lands_at_recency_head() {
        let mut cache = ArcCache::new(8);
        read_all(&mut cache, &[1, 2, 3]);
        assert_eq!(blocks(&cache, StateKind::Recency), vec![3, 2, 1]);
        assert_eq!(cache.head_of(StateKind::Recency), Some(b(3)));
        assert_eq!(cache.tail_of(StateKind::Recency), Some(b(1)));
    }

    #[test]
    fn arc_hit_moves_to_frequency_head() {
        let mut cache = ArcCache::new(8);
        read_all(&mut cache, &[1, 2, 3, 1, 2]);
        assert_eq!(blocks(&cache, StateKind::Frequency), vec![2, 1]);
        assert_eq!(blocks(&cache, StateKind::Recency), vec![3]);

        read_all(&mut cache, &[1]);
        assert_eq!(blocks(&cache, StateKind::Frequency), vec![1, 2]);
    }

    #[test]
    fn arc_resident_hit_does_not_change_p() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1, 1, 1, 2, 2]);
        assert_eq!(cache.p_value(), 2);
    }

    #[test]
    fn arc_scenario_capacity_four() {
        let mut cache = ArcCache::new(4);
        let hits = read_all(&mut cache, &[1, 2, 3, 4, 1, 5, 2, 6]);
        assert_eq!(
            hits,
            vec![
                HitKind::Miss,
                HitKind::Miss,
                HitKind::Miss,
                HitKind::Miss,
                HitKind::RecencyHit,
                HitKind::Miss,
                HitKind::GhostHitRecency,
                HitKind::Miss,
            ]
        );
        assert_eq!(cache.p_value(), 3);
        assert_eq!(blocks(&cache, StateKind::Recency), vec![6, 5, 4, 3]);
        assert_eq!(blocks(&cache, StateKind::FrequencyGhost), vec![2, 1]);
        assert!(cache.state(StateKind::Frequency).is_empty());
        assert!(cache.state(StateKind::RecencyGhost).is_empty());

        assert_eq!(cache.reads(), 8);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.counters().resident_hits(), 1);
        assert_eq!(cache.counters().ghost_hits(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_eviction_demotes_tail_to_ghost() {
        let mut cache = ArcCache::new(1);
        read_all(&mut cache, &[10, 20]);
        assert_eq!(cache.membership_of(b(10)), Membership::RecencyGhost);
        assert_eq!(cache.membership_of(b(20)), Membership::Recency);
        assert!(cache.tracks(b(10)));
        assert!(!cache.contains(b(10)));
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_ghost_overflow_discards_line() {
        let mut cache = ArcCache::new(1);
        read_all(&mut cache, &[10, 20, 30]);
        // 20 demoted, ghosts over capacity, 10 discarded.
        assert_eq!(cache.membership_of(b(10)), Membership::None);
        assert!(!cache.tracks(b(10)));
        assert_eq!(cache.membership_of(b(20)), Membership::RecencyGhost);
        assert_eq!(cache.ghost_len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_frequency_ghost_hit_lowers_p() {
        let mut cache = ArcCache::new(2);
        read_all(&mut cache, &[1, 1, 2, 3]);
        assert_eq!(cache.membership_of(b(1)), Membership::FrequencyGhost);
        assert_eq!(cache.p_value(), 1);

        assert_eq!(read_all(&mut cache, &[1]), vec![HitKind::GhostHitFrequency]);
        assert_eq!(cache.p_value(), 0);
        assert_eq!(cache.head_of(StateKind::Frequency), Some(b(1)));
        assert_eq!(blocks(&cache, StateKind::Recency), vec![3]);
        assert_eq!(blocks(&cache, StateKind::RecencyGhost), vec![2]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_recency_ghost_hit_raises_p() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1, 2, 3, 4, 5]);
        assert_eq!(cache.membership_of(b(1)), Membership::RecencyGhost);
        let before = cache.p_value();

        assert_eq!(read_all(&mut cache, &[1]), vec![HitKind::GhostHitRecency]);
        assert!(cache.p_value() > before);
        assert_eq!(cache.head_of(StateKind::Frequency), Some(b(1)));
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_p_saturates_at_capacity_and_recency_still_evicts() {
        let mut cache = ArcCache::new(2);
        read_all(&mut cache, &[1, 2, 3]);
        assert_eq!(read_all(&mut cache, &[1]), vec![HitKind::GhostHitRecency]);
        assert_eq!(cache.p_value(), 2);
        assert_eq!(read_all(&mut cache, &[2]), vec![HitKind::GhostHitRecency]);
        assert_eq!(cache.p_value(), 2);

        // p == c with Frequency drained: Recency has to give up its tail.
        read_all(&mut cache, &[4, 5]);
        assert_eq!(blocks(&cache, StateKind::Recency), vec![5, 4]);
        assert!(cache.state(StateKind::Frequency).is_empty());
        assert_eq!(blocks(&cache, StateKind::FrequencyGhost), vec![2, 1]);
        assert_eq!(cache.membership_of(b(3)), Membership::None);
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_membership_distinguishes_all_four_lists() {
        let mut cache = ArcCache::new(2);
        read_all(&mut cache, &[1, 1, 2, 3, 4, 3]);

        assert_eq!(cache.membership_of(b(4)), Membership::Recency);
        assert_eq!(cache.membership_of(b(3)), Membership::Frequency);
        assert_eq!(cache.membership_of(b(2)), Membership::RecencyGhost);
        assert_eq!(cache.membership_of(b(1)), Membership::FrequencyGhost);
        assert_eq!(cache.membership_of(b(99)), Membership::None);

        let mut seen: Vec<Membership> = (1..=4).map(|raw| cache.membership_of(b(raw))).collect();
        seen.dedup();
        assert_eq!(seen.len(), 4);
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_writes_transition_but_do_not_count_hits() {
        let mut cache = ArcCache::new(4);
        cache.access(b(1), OpKind::Write).unwrap();
        let hit = cache.access(b(1), OpKind::Write).unwrap();
        assert_eq!(hit, HitKind::RecencyHit);
        assert_eq!(cache.membership_of(b(1)), Membership::Frequency);
        assert_eq!(cache.writes(), 2);
        assert_eq!(cache.reads(), 0);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn arc_reference_skips_counters() {
        let mut cache = ArcCache::new(4);
        cache.reference(b(1)).unwrap();
        cache.reference(b(1)).unwrap();
        assert_eq!(cache.reads(), 0);
        assert_eq!(cache.membership_of(b(1)), Membership::Frequency);
    }

    #[test]
    fn arc_clear_restores_initial_state() {
        let mut cache = ArcCache::new(2);
        read_all(&mut cache, &[1, 2, 3, 1]);
        assert_ne!(cache.p_value(), cache.initial_p());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.ghost_len(), 0);
        assert_eq!(cache.p_value(), cache.initial_p());
        assert_eq!(cache.reads(), 0);
        assert!(!cache.tracks(b(1)));
        cache.debug_validate_invariants();

        assert_eq!(read_all(&mut cache, &[1]), vec![HitKind::Miss]);
    }

    #[test]
    fn arc_snapshot_reports_lists_and_counters() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1, 2, 3, 4, 1, 5, 2, 6]);
        cache.access(b(6), OpKind::Write).unwrap();

        let snap = cache.snapshot();
        assert_eq!(snap.reads, 8);
        assert_eq!(snap.writes, 1);
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.recency_len, 3);
        assert_eq!(snap.frequency_len, 1);
        assert_eq!(snap.frequency_ghost_len, 2);
        assert_eq!(snap.target_recency, 3);
        assert_eq!(snap.capacity, 4);

        cache.reset_metrics();
        assert_eq!(cache.snapshot().reads, 0);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn arc_allocation_failure_leaves_cache_untouched() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1, 2, 3, 4, 1]);
        // Full: the next miss would have to balance.
        assert_eq!(cache.len(), 4);

        let before = cache.snapshot();
        let lists: Vec<Vec<u64>> = StateKind::ALL.iter().map(|&k| blocks(&cache, k)).collect();

        cache.lines.fail_next_reserve();
        let err = cache.access(b(9), OpKind::Read).unwrap_err();
        assert_eq!(err, AccessError::AllocationFailure { block: b(9) });

        cache.index.fail_next_reserve();
        let err = cache.access(b(10), OpKind::Write).unwrap_err();
        assert_eq!(err, AccessError::AllocationFailure { block: b(10) });

        assert_eq!(cache.snapshot(), before);
        let after: Vec<Vec<u64>> = StateKind::ALL.iter().map(|&k| blocks(&cache, k)).collect();
        assert_eq!(after, lists);
        assert!(!cache.tracks(b(9)));
        assert!(!cache.tracks(b(10)));
        cache.check_invariants().unwrap();

        assert_eq!(read_all(&mut cache, &[9]), vec![HitKind::Miss]);
        assert_eq!(cache.reads(), before.reads + 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn arc_unlisted_indexed_line_is_reported_not_readmitted() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1, 2]);
        let id = cache.index.lookup(b(1)).unwrap();
        cache.lines.get_mut(id).unwrap().membership = Membership::None;
        let before = cache.snapshot();

        let err = cache.access(b(1), OpKind::Read).unwrap_err();
        assert!(matches!(err, AccessError::Inconsistent(_)), "{err}");
        assert_eq!(cache.snapshot(), before);
        assert_eq!(cache.lines.get(id).unwrap().membership, Membership::None);
        assert_eq!(cache.index.lookup(b(1)), Some(id));
    }

    #[test]
    fn arc_index_pointing_at_freed_line_is_reported() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1]);
        let id = cache.index.lookup(b(1)).unwrap();
        cache.states[StateKind::Recency.slot()].list.clear();
        cache.lines.remove(id);
        let before = cache.snapshot();

        let err = cache.reference(b(1)).unwrap_err();
        assert!(matches!(err, AccessError::Inconsistent(_)), "{err}");
        assert_eq!(cache.snapshot(), before);
        assert_eq!(cache.index.lookup(b(1)), Some(id));
        assert!(cache.lines.is_empty());
    }

    #[test]
    fn arc_check_invariants_detects_corruption() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1, 2]);
        assert!(cache.check_invariants().is_ok());

        let id = cache.index.lookup(b(1)).unwrap();
        cache.lines.get_mut(id).unwrap().membership = Membership::FrequencyGhost;
        let err = cache.check_invariants().unwrap_err();
        assert!(err.message().contains("tagged"), "{err}");

        cache.lines.get_mut(id).unwrap().membership = Membership::Recency;
        cache.p = 5;
        assert!(cache.check_invariants().unwrap_err().message().contains("p (5)"));
    }

    #[test]
    fn arc_debug_output_lists_sizes() {
        let mut cache = ArcCache::new(4);
        read_all(&mut cache, &[1]);
        let dbg = format!("{cache:?}");
        assert!(dbg.contains("ArcCache"));
        assert!(dbg.contains("recency: 1"));
    }

    #[test]
    fn arc_block_cache_trait_reports_resident_only() {
        fn resident<C: BlockCache>(cache: &C, block: BlockId) -> bool {
            cache.contains(block)
        }
        let mut cache = ArcCache::new(1);
        read_all(&mut cache, &[10, 20]);
        assert!(!resident(&cache, b(10)));
        assert!(resident(&cache, b(20)));
        assert_eq!(BlockCache::len(&cache), 1);
        assert_eq!(BlockCache::capacity(&cache), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(128))]

            #[test]
            fn invariants_hold_for_any_sequence(
                capacity in 1usize..12,
                ops in prop::collection::vec((0u64..40, any::<bool>()), 1..300)
            ) {
                let mut cache = ArcCache::new(capacity);
                for (raw, is_read) in ops {
                    let op = if is_read { OpKind::Read } else { OpKind::Write };
                    cache.access(BlockId::new(raw), op).unwrap();
                    prop_assert!(cache.check_invariants().is_ok(), "{:?}", cache.check_invariants());
                }
            }

            #[test]
            fn accessed_block_lands_at_a_list_head(
                capacity in 1usize..10,
                ops in prop::collection::vec(0u64..30, 1..200)
            ) {
                let mut cache = ArcCache::new(capacity);
                for raw in ops {
                    let block = BlockId::new(raw);
                    let hit = cache.reference(block).unwrap();
                    let expected = if hit.is_hit() { StateKind::Frequency } else { StateKind::Recency };
                    prop_assert_eq!(cache.head_of(expected), Some(block));
                    prop_assert!(cache.contains(block));
                }
            }

            #[test]
            fn ghost_hits_move_p_in_the_right_direction(
                capacity in 1usize..10,
                ops in prop::collection::vec(0u64..30, 1..200)
            ) {
                let mut cache = ArcCache::new(capacity);
                for raw in ops {
                    let before = cache.p_value();
                    let hit = cache.reference(BlockId::new(raw)).unwrap();
                    let after = cache.p_value();
                    match hit {
                        HitKind::GhostHitRecency => {
                            prop_assert!(after > before || after == capacity);
                        },
                        HitKind::GhostHitFrequency => {
                            prop_assert!(after < before || after == 0);
                        },
                        _ => prop_assert_eq!(after, before),
                    }
                }
            }

            #[test]
            fn counters_match_classifications(
                ops in prop::collection::vec((0u64..20, any::<bool>()), 1..200)
            ) {
                let mut cache = ArcCache::new(5);
                let (mut reads, mut writes, mut hits) = (0u64, 0u64, 0u64);
                for (raw, is_read) in ops {
                    let op = if is_read { OpKind::Read } else { OpKind::Write };
                    let hit = cache.access(BlockId::new(raw), op).unwrap();
                    if is_read {
                        reads += 1;
                        if hit.is_hit() {
                            hits += 1;
                        }
                    } else {
                        writes += 1;
                    }
                }
                prop_assert_eq!(cache.reads(), reads);
                prop_assert_eq!(cache.writes(), writes);
                prop_assert_eq!(cache.hits(), hits);
            }
        }
    }
}
