//! # patricia-rs
//!
//! A compressed radix trie (Patricia-style) keyed by atom sequences, with
//! chunked edge-label storage and adaptive per-node child tables.
//!
//! The design goals, in order:
//!
//! - **One descent, written once**: a single traversal kernel classifies
//!   every lookup/insert into one of four terminal outcomes; the public
//!   operations are thin wrappers over it.
//! - **Collision-free child dispatch**: each node's child table is a
//!   power-of-two array sized by the bit patterns of the first atoms it
//!   actually holds, so child lookup is a single probe.
//! - **Chunked labels**: edge labels live in append-only arena chunks;
//!   splitting an edge never copies label atoms, the two halves just share
//!   a chunk through adjacent handles.
//!
//! Two instantiations share all machinery: [`TrieMap`] stores a value per
//! key, [`TrieSet`] counts insertions per key.
//!
//! ## Example
//!
//! ```rust
//! use patricia_rs::{TrieMap, TrieSet};
//!
//! let mut map: TrieMap<u64> = TrieMap::new();
//! map.insert(b"hello", 1);
//! map.insert(b"world", 2);
//! assert_eq!(map.get(b"hello"), Some(&1));
//!
//! let mut set: TrieSet = TrieSet::new();
//! set.add(b"hello");
//! set.add(b"hello");
//! assert_eq!(set.count(b"hello"), 2);
//! ```
//!
//! Mutation requires exclusive access; there is no internal synchronization
//! and no removal.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod arena;
mod cursor;
mod debug;
mod error;
mod map;
mod node;
mod set;
mod trie;
mod value;

pub use cursor::{Cursor, Iter};
pub use error::OutOfRangeError;
pub use map::TrieMap;
pub use set::TrieSet;
pub use value::{CounterSlot, MapSlot, ValueSlot};

/// A single unit of a key.
///
/// Atoms only need equality and an integer view: the low bits place a child
/// in its table slot, and the XOR of two colliding atoms decides how far
/// the table must grow to separate them. The primary instantiation is `u8`.
pub trait Atom: Copy + Eq + std::fmt::Debug {
    /// Integer view used for table masks and the XOR growth rule.
    fn as_usize(self) -> usize;
}

impl Atom for u8 {
    #[inline]
    fn as_usize(self) -> usize {
        self as usize
    }
}

impl Atom for u16 {
    #[inline]
    fn as_usize(self) -> usize {
        self as usize
    }
}

impl Atom for u32 {
    #[inline]
    fn as_usize(self) -> usize {
        self as usize
    }
}

/// Memory usage breakdown for a trie instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    /// Bytes reserved by the label arena.
    pub label_bytes: usize,
    /// Number of chunks in the label arena.
    pub label_chunks: usize,
    /// Bytes used by node structs.
    pub node_bytes: usize,
    /// Bytes used by child tables.
    pub table_bytes: usize,
    /// Number of keys stored.
    pub num_keys: usize,
    /// Total bytes per key (0 when empty).
    pub bytes_per_key: f64,
}


#[cfg(test)]
mod proptests;
