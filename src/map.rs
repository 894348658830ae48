//! The map instantiation: arbitrary values keyed by atom sequences.

use std::ops::{AddAssign, Index};

use crate::arena::DEFAULT_MIN_CHUNK;
use crate::cursor::{Cursor, Iter};
use crate::error::OutOfRangeError;
use crate::trie::RawTrie;
use crate::value::MapSlot;
use crate::{Atom, MemoryStats};

/// An ordered associative container keyed by atom sequences, stored as a
/// compressed radix trie with chunked edge labels.
///
/// Keys are `&[A]` slices; the default instantiation is byte-keyed. There
/// is no removal: nodes and labels live until the map is dropped.
///
/// ```
/// use patricia_rs::TrieMap;
///
/// let mut map: TrieMap<u32> = TrieMap::new();
/// map.insert(b"/home/user1/audio", 1);
/// map.insert(b"/home/user1/video", 2);
///
/// assert_eq!(map.get(b"/home/user1/audio"), Some(&1));
/// assert_eq!(map.find_prefix(b"/home/user1").entries().count(), 2);
/// ```
pub struct TrieMap<V, A: Atom = u8> {
    pub(crate) raw: RawTrie<A, MapSlot<V>>,
}

impl<V, A: Atom> TrieMap<V, A> {
    /// Empty map with the default label-chunk reservation.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_MIN_CHUNK)
    }

    /// Empty map with a specific label-chunk reservation, in atoms.
    ///
    /// `0` stores every edge label in its own exactly-sized buffer; larger
    /// values pool sibling labels for locality.
    pub fn with_chunk_size(min_chunk: usize) -> Self {
        Self {
            raw: RawTrie::new(min_chunk),
        }
    }

    /// Number of keys with a value.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether no key has been inserted.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Insert, overwriting any existing value.
    pub fn insert(&mut self, key: &[A], value: V) {
        self.raw.insert_with(key, value, |old, new| *old = new);
    }

    /// Insert with an explicit replace policy, applied only when the key
    /// already holds a value.
    pub fn insert_with(&mut self, key: &[A], value: V, replace: impl FnOnce(&mut V, V)) {
        self.raw.insert_with(key, value, replace);
    }

    /// Reference to the value at `key`.
    pub fn get(&self, key: &[A]) -> Option<&V> {
        self.raw.get(key)
    }

    /// Mutable reference to the value at `key`.
    pub fn get_mut(&mut self, key: &[A]) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    /// Whether `key` holds a value.
    pub fn contains(&self, key: &[A]) -> bool {
        self.raw.contains(key)
    }

    /// Checked access; absent keys are an error rather than `None`.
    pub fn at(&self, key: &[A]) -> Result<&V, OutOfRangeError> {
        self.get(key).ok_or(OutOfRangeError)
    }

    /// Cursor positioned at `key` if present, the end cursor otherwise.
    pub fn find(&self, key: &[A]) -> Cursor<'_, A, MapSlot<V>> {
        self.raw.find(key)
    }

    /// Cursor over every key starting with `prefix` (the end cursor when
    /// nothing matches).
    pub fn find_prefix(&self, prefix: &[A]) -> Cursor<'_, A, MapSlot<V>> {
        self.raw.find_prefix(prefix, &mut || {})
    }

    /// Prefix lookup that also invokes `on_exact` when `prefix` itself is a
    /// key with a value.
    pub fn find_prefix_with(
        &self,
        prefix: &[A],
        mut on_exact: impl FnMut(),
    ) -> Cursor<'_, A, MapSlot<V>> {
        self.raw.find_prefix(prefix, &mut on_exact)
    }

    /// Prefix lookup writing the exact-match outcome through `found`:
    /// `true` iff `prefix` itself is a key with a value, `false` otherwise.
    pub fn find_prefix_exact(
        &self,
        prefix: &[A],
        found: &mut bool,
    ) -> Cursor<'_, A, MapSlot<V>> {
        *found = false;
        self.raw.find_prefix(prefix, &mut || *found = true)
    }

    /// Prefix lookup rooted at `base`'s current node instead of the trie
    /// root. The returned cursor's keys are relative to that node.
    pub fn find_prefix_at(
        &self,
        base: &Cursor<'_, A, MapSlot<V>>,
        prefix: &[A],
    ) -> Cursor<'_, A, MapSlot<V>> {
        self.find_prefix_at_with(base, prefix, || {})
    }

    /// Cursor-rooted prefix lookup with an exact-match callback.
    pub fn find_prefix_at_with(
        &self,
        base: &Cursor<'_, A, MapSlot<V>>,
        prefix: &[A],
        mut on_exact: impl FnMut(),
    ) -> Cursor<'_, A, MapSlot<V>> {
        match base.current() {
            Some(node) => self.raw.find_prefix_from(node, prefix, &mut on_exact),
            None => Cursor::end(&self.raw),
        }
    }

    /// Iterate all `(key, value)` pairs in enumeration order.
    pub fn iter(&self) -> Iter<'_, A, MapSlot<V>> {
        self.raw.cursor().entries()
    }

    /// Memory accounting across the arena, nodes, and child tables.
    pub fn memory_usage(&self) -> MemoryStats {
        self.raw.memory_usage()
    }
}

impl<V: AddAssign, A: Atom> TrieMap<V, A> {
    /// Insert with `+=` accumulation: an existing value absorbs the new one.
    pub fn add(&mut self, key: &[A], value: V) {
        self.raw.insert_with(key, value, |old, new| *old += new);
    }
}

impl<V, A: Atom> Default for TrieMap<V, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, A: Atom> Index<&[A]> for TrieMap<V, A> {
    type Output = V;

    /// Panicking alias of [`TrieMap::at`], in the style of the `std` maps.
    fn index(&self, key: &[A]) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not present in trie"),
        }
    }
}

impl<'a, V, A: Atom> IntoIterator for &'a TrieMap<V, A> {
    type Item = (Vec<A>, &'a V);
    type IntoIter = Iter<'a, A, MapSlot<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
