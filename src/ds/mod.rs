pub mod block_index;
pub mod line_list;
pub mod slot_arena;

pub use block_index::BlockIndex;
pub use line_list::{LineList, LineListIter, Linked, Links};
pub use slot_arena::{SlotArena, SlotId};
