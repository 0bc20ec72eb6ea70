//! Doubly linked list of arena handles with links stored in the nodes.
//!
//! Several lists share one [`SlotArena`]: each node carries its own
//! [`Links`], and a [`LineList`] only remembers head, tail and length. Moving
//! a node between lists is an unlink from one plus a push into the other; the
//! node itself never moves in memory and its [`SlotId`] stays valid.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<T: Linked>)                 LineList
//!   ┌────────┬──────────────────────────┐        head ─► [id_4] ◄──► [id_0] ◄──► [id_2] ◄── tail
//!   │ id_0   │ { prev: id_4, next: id_2 }│            MRU                              LRU
//!   │ id_2   │ { prev: id_0, next: None }│
//!   │ id_4   │ { prev: None, next: id_0 }│
//!   └────────┴──────────────────────────┘
//! ```
//!
//! ## Operations
//! - `push_front(id)`: O(1), `id` must not be linked into any list
//! - `unlink(id)`: O(1), `id` must currently belong to this list
//! - `iter(arena)`: O(n), head to tail
//!
//! The list cannot tell whether a handle belongs to it; the owner tracks
//! membership (see `CacheLine::membership` in the ARC policy).

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Neighbour handles of a node inside a [`LineList`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl Links {
    /// Handle of the node closer to the head, if any.
    pub fn prev(&self) -> Option<SlotId> {
        self.prev
    }

    /// Handle of the node closer to the tail, if any.
    pub fn next(&self) -> Option<SlotId> {
        self.next
    }

    fn reset(&mut self) {
        self.prev = None;
        self.next = None;
    }
}

/// Arena values that can be threaded onto a [`LineList`].
pub trait Linked {
    fn links(&self) -> &Links;
    fn links_mut(&mut self) -> &mut Links;
}

/// Head/tail/length of one intrusive list over a shared arena.
#[derive(Debug, Default, Clone)]
pub struct LineList {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl LineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently pushed node.
    pub fn front(&self) -> Option<SlotId> {
        self.head
    }

    /// Least recently pushed node.
    pub fn back(&self) -> Option<SlotId> {
        self.tail
    }

    /// Links `id` in at the head.
    pub fn push_front<T: Linked>(&mut self, arena: &mut SlotArena<T>, id: SlotId) {
        let old_head = self.head;
        let Some(node) = arena.get_mut(id) else {
            return;
        };
        let links = node.links_mut();
        links.prev = None;
        links.next = old_head;

        match old_head.and_then(|head| arena.get_mut(head)) {
            Some(head_node) => head_node.links_mut().prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
    }

    /// Unlinks `id` from this list; returns `false` if the handle is dead.
    pub fn unlink<T: Linked>(&mut self, arena: &mut SlotArena<T>, id: SlotId) -> bool {
        let (prev, next) = match arena.get(id) {
            Some(node) => (node.links().prev, node.links().next),
            None => return false,
        };

        match prev.and_then(|p| arena.get_mut(p)) {
            Some(prev_node) => prev_node.links_mut().next = next,
            None => self.head = next,
        }
        match next.and_then(|n| arena.get_mut(n)) {
            Some(next_node) => next_node.links_mut().prev = prev,
            None => self.tail = prev,
        }
        if let Some(node) = arena.get_mut(id) {
            node.links_mut().reset();
        }
        self.len -= 1;
        true
    }

    /// Forgets every node without touching the arena.
    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates handles from head (MRU) to tail (LRU).
    pub fn iter<'a, T: Linked>(&self, arena: &'a SlotArena<T>) -> LineListIter<'a, T> {
        LineListIter {
            arena,
            current: self.head,
            remaining: self.len,
        }
    }

    /// Walks the list checking link symmetry and the recorded length.
    pub fn check_links<T: Linked>(&self, arena: &SlotArena<T>) -> Result<(), InvariantError> {
        let mut prev = None;
        let mut current = self.head;
        let mut count = 0usize;

        while let Some(id) = current {
            count += 1;
            if count > self.len {
                return Err(InvariantError::new(format!(
                    "list walk exceeds recorded length {}",
                    self.len
                )));
            }
            let node = arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("list links dead slot {}", id.index())))?;
            if node.links().prev != prev {
                return Err(InvariantError::new(format!(
                    "slot {} has a stale prev link",
                    id.index()
                )));
            }
            prev = Some(id);
            current = node.links().next;
        }

        if count != self.len {
            return Err(InvariantError::new(format!(
                "list holds {count} nodes but records {}",
                self.len
            )));
        }
        if self.tail != prev {
            return Err(InvariantError::new("list tail does not match last node"));
        }
        Ok(())
    }
}

/// Head-to-tail iterator over a [`LineList`].
pub struct LineListIter<'a, T> {
    arena: &'a SlotArena<T>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<T: Linked> Iterator for LineListIter<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.current?;
        self.current = self.arena.get(id)?.links().next;
        self.remaining -= 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
