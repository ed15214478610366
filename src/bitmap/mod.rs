//! Bitmap primitives: packed bitsets and the two-layer frontier
//!
//! [`Bitset`] is the shared leaf primitive: a non-owning packed-bit view with
//! plain and atomic accessors. [`Frontier`] builds a two-layer bitmap on top
//! of it to track the active vertex set of a level-synchronous graph
//! traversal, with a parallel compaction step that turns the bitmap into a
//! dense index list.

mod bitset;
mod frontier;

pub use bitset::{BitWord, Bitset};
pub use frontier::{swap_frontiers, Frontier, FrontierView};
