//! The counting-set instantiation: each key carries a count, and a key is
//! a member while its count is nonzero.

use crate::arena::DEFAULT_MIN_CHUNK;
use crate::cursor::{Cursor, Iter};
use crate::error::OutOfRangeError;
use crate::trie::RawTrie;
use crate::value::CounterSlot;
use crate::{Atom, MemoryStats};

/// A counting set over atom sequences, sharing all machinery with
/// [`crate::TrieMap`] through the counter value slot.
///
/// ```
/// use patricia_rs::TrieSet;
///
/// let mut set: TrieSet = TrieSet::new();
/// set.add(b"x");
/// set.add(b"x");
/// set.add(b"x");
///
/// assert_eq!(set.count(b"x"), 3);
/// assert!(!set.contains(b"y"));
/// ```
pub struct TrieSet<A: Atom = u8> {
    pub(crate) raw: RawTrie<A, CounterSlot>,
}

impl<A: Atom> TrieSet<A> {
    /// Empty set with the default label-chunk reservation.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_MIN_CHUNK)
    }

    /// Empty set with a specific label-chunk reservation, in atoms.
    pub fn with_chunk_size(min_chunk: usize) -> Self {
        Self {
            raw: RawTrie::new(min_chunk),
        }
    }

    /// Number of member keys.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Make `key` a member with count 1, resetting any previous count.
    pub fn insert(&mut self, key: &[A]) {
        self.raw.insert_with(key, 1, |old, new| *old = new);
    }

    /// Increment `key`'s count, adding it on first sight.
    pub fn add(&mut self, key: &[A]) {
        self.raw.insert_with(key, 1, |old, new| *old += new);
    }

    /// Add `n` to `key`'s count.
    pub fn add_count(&mut self, key: &[A], n: usize) {
        self.raw.insert_with(key, n, |old, new| *old += new);
    }

    /// The count for `key`, if it is a member.
    pub fn get(&self, key: &[A]) -> Option<&usize> {
        self.raw.get(key)
    }

    /// The count for `key`; zero for non-members.
    pub fn count(&self, key: &[A]) -> usize {
        self.get(key).copied().unwrap_or(0)
    }

    /// Whether `key` is a member.
    pub fn contains(&self, key: &[A]) -> bool {
        self.raw.contains(key)
    }

    /// Checked count access; non-members are an error.
    pub fn at(&self, key: &[A]) -> Result<&usize, OutOfRangeError> {
        self.get(key).ok_or(OutOfRangeError)
    }

    /// Cursor positioned at `key` if it is a member, the end cursor
    /// otherwise.
    pub fn find(&self, key: &[A]) -> Cursor<'_, A, CounterSlot> {
        self.raw.find(key)
    }

    /// Cursor over every member starting with `prefix`.
    pub fn find_prefix(&self, prefix: &[A]) -> Cursor<'_, A, CounterSlot> {
        self.raw.find_prefix(prefix, &mut || {})
    }

    /// Prefix lookup invoking `on_exact` when `prefix` itself is a member.
    pub fn find_prefix_with(
        &self,
        prefix: &[A],
        mut on_exact: impl FnMut(),
    ) -> Cursor<'_, A, CounterSlot> {
        self.raw.find_prefix(prefix, &mut on_exact)
    }

    /// Prefix lookup writing the exact-match outcome through `found`.
    pub fn find_prefix_exact(
        &self,
        prefix: &[A],
        found: &mut bool,
    ) -> Cursor<'_, A, CounterSlot> {
        *found = false;
        self.raw.find_prefix(prefix, &mut || *found = true)
    }

    /// Prefix lookup rooted at `base`'s current node instead of the trie
    /// root. The returned cursor's keys are relative to that node.
    pub fn find_prefix_at(
        &self,
        base: &Cursor<'_, A, CounterSlot>,
        prefix: &[A],
    ) -> Cursor<'_, A, CounterSlot> {
        self.find_prefix_at_with(base, prefix, || {})
    }

    /// Cursor-rooted prefix lookup with an exact-match callback.
    pub fn find_prefix_at_with(
        &self,
        base: &Cursor<'_, A, CounterSlot>,
        prefix: &[A],
        mut on_exact: impl FnMut(),
    ) -> Cursor<'_, A, CounterSlot> {
        match base.current() {
            Some(node) => self.raw.find_prefix_from(node, prefix, &mut on_exact),
            None => Cursor::end(&self.raw),
        }
    }

    /// Iterate all `(key, count)` pairs in enumeration order.
    pub fn iter(&self) -> Iter<'_, A, CounterSlot> {
        self.raw.cursor().entries()
    }

    /// Memory accounting across the arena, nodes, and child tables.
    pub fn memory_usage(&self) -> MemoryStats {
        self.raw.memory_usage()
    }
}

impl<A: Atom> Default for TrieSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Atom> std::ops::Index<&[A]> for TrieSet<A> {
    type Output = usize;

    /// Panicking alias of [`TrieSet::at`], in the style of the `std` maps.
    fn index(&self, key: &[A]) -> &usize {
        match self.get(key) {
            Some(count) => count,
            None => panic!("key not present in trie"),
        }
    }
}

impl<'a, A: Atom> IntoIterator for &'a TrieSet<A> {
    type Item = (Vec<A>, &'a usize);
    type IntoIter = Iter<'a, A, CounterSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates() {
        let mut set: TrieSet = TrieSet::new();
        set.add(b"x");
        set.add(b"x");
        set.add(b"x");
        assert_eq!(set.count(b"x"), 3);
        assert_eq!(set.get(b"x"), Some(&3));
        assert!(set.contains(b"x"));
        assert!(!set.contains(b"y"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn insert_resets_count() {
        let mut set: TrieSet = TrieSet::new();
        set.add(b"k");
        set.add(b"k");
        assert_eq!(set.count(b"k"), 2);
        set.insert(b"k");
        assert_eq!(set.count(b"k"), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn membership_over_ip_like_keys() {
        let mut set: TrieSet = TrieSet::new();
        set.insert(b"10.0.0.1");
        set.insert(b"10.0.17.8");
        set.insert(b"192.168.0.1");
        set.insert(b"192.168.0.2");

        assert!(set.contains(b"10.0.0.1"));
        assert!(set.contains(b"10.0.17.8"));
        assert!(!set.contains(b"10.0.17.2"));
        assert!(!set.contains(b"10.0.1.1"));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn iter_yields_members_with_counts() {
        let mut set: TrieSet = TrieSet::new();
        set.add(b"a");
        set.add(b"a");
        set.add(b"b");
        let mut entries: Vec<_> = set.iter().map(|(k, &c)| (k, c)).collect();
        entries.sort();
        assert_eq!(entries, vec![(b"a".to_vec(), 2), (b"b".to_vec(), 1)]);
    }

    #[test]
    fn empty_set_lookups() {
        let set: TrieSet = TrieSet::new();
        assert_eq!(set.get(b"something"), None);
        assert_eq!(set.get(b""), None);
        assert!(!set.contains(b"something"));
        assert!(!set.contains(b""));
        assert!(set.find(b"").is_end());
        assert!(set.find_prefix(b"").is_end());
        assert!(set.find(b"something").is_end());
        assert!(set.find_prefix(b"something").is_end());
        assert!(set.at(b"x").is_err());
    }
}
