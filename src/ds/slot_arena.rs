//! Slot arena with stable handles.
//!
//! Cache lines live here for their whole lifetime; lists and the block index
//! refer to them by [`SlotId`] instead of by pointer. Freed slots are recycled
//! through a free list, so a handle stays valid exactly until its slot is
//! removed.
//!
//! ## Architecture
//!
//! ```text
//!   slots: Vec<Option<T>>                 free_list: Vec<usize>
//!   ┌─────┬──────────────┐                ┌───┐
//!   │  0  │ Some(line A) │                │ 1 │ ◄── next insert reuses 1
//!   │  1  │ None         │                └───┘
//!   │  2  │ Some(line B) │
//!   └─────┴──────────────┘
//! ```
//!
//! ## Fallible growth
//!
//! [`SlotArena::try_reserve`] pre-allocates room for upcoming inserts and for
//! the free-list pushes their later removal causes. After a successful
//! reservation of `n`, the next `n` inserts and any number of removals do not
//! allocate.

use std::collections::TryReserveError;

/// Stable handle to a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Returns the raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Vector-backed arena that hands out [`SlotId`]s and recycles freed slots.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
    #[cfg(test)]
    fail_next_reserve: bool,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            #[cfg(test)]
            fail_next_reserve: false,
        }
    }

    /// Makes the next [`try_reserve`](Self::try_reserve) fail.
    #[cfg(test)]
    pub(crate) fn fail_next_reserve(&mut self) {
        self.fail_next_reserve = true;
    }

    /// Reserves room so that `additional` inserts can follow without allocating.
    ///
    /// Nothing is modified when an error is returned.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        #[cfg(test)]
        if std::mem::take(&mut self.fail_next_reserve) {
            return Vec::<u8>::new().try_reserve(usize::MAX);
        }
        let recycled = self.free_list.len();
        if additional <= recycled {
            return Ok(());
        }
        let grow = additional - recycled;
        self.slots.try_reserve(grow)?;
        // Every slot may end up on the free list at once.
        let free_needed = (self.slots.len() + grow).saturating_sub(self.free_list.len());
        self.free_list.try_reserve(free_needed)
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Iterates occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
