//! The shared trie core: one descent routine, four terminal outcomes, and
//! the edge-split mutation that keeps the compressed invariant.
//!
//! Every public operation is a thin wrapper that runs `descend` and switches
//! on the outcome. The kernel advances a label index and a query index in
//! lockstep; exactly one of these holds when it stops:
//!
//! - `Exact`: query consumed, label consumed — the query names this node.
//! - `KeyEnded`: query consumed mid-label — the query is a strict prefix.
//! - `Diverged`: label and query disagree mid-label.
//! - `NoChild`: label consumed, no child table entry for the next atom.
//!
//! When an edge is followed the child's first label atom is already known to
//! match, so comparison resumes at label offset 1.

use crate::arena::{ChunkArena, LabelRef};
use crate::cursor::{Cursor, Frame};
use crate::node::{NodeId, NodeStore};
use crate::value::ValueSlot;
use crate::{Atom, MemoryStats};

pub(crate) enum Step {
    Exact,
    KeyEnded { label_pos: usize },
    Diverged { label_pos: usize, key_pos: usize },
    NoChild { key_pos: usize },
}

pub(crate) struct Descent {
    pub node: NodeId,
    pub step: Step,
    /// Query offset at which `node`'s label begins. Atoms before it form the
    /// base prefix of a cursor rooted at `node`.
    pub base_len: usize,
}

pub(crate) struct RawTrie<A: Atom, S: ValueSlot> {
    pub(crate) arena: ChunkArena<A>,
    pub(crate) store: NodeStore<S>,
    len: usize,
}

impl<A: Atom, S: ValueSlot> RawTrie<A, S> {
    pub fn new(min_chunk: usize) -> Self {
        Self {
            arena: ChunkArena::new(min_chunk),
            store: NodeStore::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn root_id(&self) -> NodeId {
        debug_assert!(!self.store.is_empty());
        NodeId(0)
    }

    #[inline]
    pub(crate) fn label(&self, id: NodeId) -> &[A] {
        self.arena.get(self.store.node(id).label)
    }

    #[inline]
    pub(crate) fn first_atom(&self, id: NodeId) -> A {
        self.label(id)[0]
    }

    #[inline]
    pub(crate) fn find_child(&self, id: NodeId, atom: A) -> Option<(usize, NodeId)> {
        self.store
            .node(id)
            .children
            .find(atom, |c| self.first_atom(c))
    }

    /// The descent kernel. `on_edge(parent, slot)` fires once per followed
    /// edge, before moving to the child; `find` uses it to record the slot
    /// path for its cursor.
    pub(crate) fn descend(
        &self,
        start: NodeId,
        key: &[A],
        mut on_edge: impl FnMut(NodeId, usize),
    ) -> Descent {
        let mut node = start;
        let mut base_len = 0;
        let mut pos = 0;
        let mut lab_off = 0;
        loop {
            let label = self.label(node);
            let mut k = lab_off;
            while pos < key.len() && k < label.len() && label[k] == key[pos] {
                k += 1;
                pos += 1;
            }
            if pos == key.len() {
                let step = if k == label.len() {
                    Step::Exact
                } else {
                    Step::KeyEnded { label_pos: k }
                };
                return Descent {
                    node,
                    step,
                    base_len,
                };
            }
            if k < label.len() {
                return Descent {
                    node,
                    step: Step::Diverged {
                        label_pos: k,
                        key_pos: pos,
                    },
                    base_len,
                };
            }
            let Some((slot, child)) = self.find_child(node, key[pos]) else {
                return Descent {
                    node,
                    step: Step::NoChild { key_pos: pos },
                    base_len,
                };
            };
            on_edge(node, slot);
            node = child;
            base_len = pos;
            pos += 1;
            lab_off = 1;
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert `value` at `key`; `replace` arbitrates when a value is already
    /// there. The length grows exactly when a value is introduced.
    pub fn insert_with(
        &mut self,
        key: &[A],
        value: S::Value,
        replace: impl FnOnce(&mut S::Value, S::Value),
    ) {
        if self.store.is_empty() {
            let label = self.arena.append(key, None);
            let root = self.store.new_node(0);
            let node = self.store.node_mut(root);
            node.label = label;
            node.slot.set(value);
            if node.slot.present() {
                self.len += 1;
            }
            return;
        }

        let d = self.descend(self.root_id(), key, |_, _| {});
        let target = match d.step {
            Step::Exact => {
                let node = self.store.node_mut(d.node);
                if let Some(old) = node.slot.get_mut() {
                    replace(old, value);
                    return;
                }
                d.node
            }
            Step::KeyEnded { label_pos } => {
                // The query stops inside this label: split and put the value
                // on the prefix half.
                self.split(d.node, label_pos, 1);
                d.node
            }
            Step::Diverged { label_pos, key_pos } => {
                self.split(d.node, label_pos, 2);
                self.new_edge(d.node, &key[key_pos..])
            }
            Step::NoChild { key_pos } => self.new_edge(d.node, &key[key_pos..]),
        };
        let node = self.store.node_mut(target);
        node.slot.set(value);
        if node.slot.present() {
            self.len += 1;
        }
    }

    /// Split `node`'s label at `at`, moving the suffix (with all children
    /// and any value) into a fresh successor, installed as the sole child.
    ///
    /// Allocation happens before any mutation; both halves keep pointing
    /// into the same arena chunk, so no label atoms move.
    fn split(&mut self, node: NodeId, at: usize, hint: usize) {
        debug_assert!(at < self.store.node(node).label.len());
        let succ = self.store.new_node(hint);

        let label = self.store.node(node).label;
        let cut = label.begin + at as u32;
        self.store.node_mut(succ).label = LabelRef {
            chunk: label.chunk,
            begin: cut,
            end: label.end,
        };
        self.store.node_mut(node).label.end = cut;

        let (n, s) = self.store.pair_mut(node, succ);
        std::mem::swap(&mut n.children, &mut s.children);
        std::mem::swap(&mut n.slot, &mut s.slot);

        self.attach(node, succ);
    }

    /// Create a node carrying `suffix` and hang it under `parent`. The
    /// label is appended with the parent's chunk as placement hint.
    fn new_edge(&mut self, parent: NodeId, suffix: &[A]) -> NodeId {
        debug_assert!(!suffix.is_empty());
        let hint = self.store.node(parent).label.chunk;
        let label = self.arena.append(suffix, Some(hint));
        let id = self.store.new_node(0);
        self.store.node_mut(id).label = label;
        self.attach(parent, id);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let atom = self.first_atom(child);
        // The table is taken out so its grow path can read first atoms
        // through `&self`.
        let mut table = std::mem::take(&mut self.store.node_mut(parent).children);
        table.put(child, atom, |c| self.first_atom(c));
        self.store.node_mut(parent).children = table;
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn get(&self, key: &[A]) -> Option<&S::Value> {
        if self.store.is_empty() {
            return None;
        }
        match self.descend(self.root_id(), key, |_, _| {}) {
            Descent {
                node,
                step: Step::Exact,
                ..
            } => self.store.node(node).slot.get(),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &[A]) -> Option<&mut S::Value> {
        if self.store.is_empty() {
            return None;
        }
        match self.descend(self.root_id(), key, |_, _| {}) {
            Descent {
                node,
                step: Step::Exact,
                ..
            } => self.store.node_mut(node).slot.get_mut(),
            _ => None,
        }
    }

    pub fn contains(&self, key: &[A]) -> bool {
        self.get(key).is_some()
    }

    /// Cursor positioned at `key` iff it is present with a value; the end
    /// cursor otherwise. The cursor's stack is seeded with the slot path, so
    /// enumeration continues through the rest of the trie.
    pub fn find(&self, key: &[A]) -> Cursor<'_, A, S> {
        if self.store.is_empty() {
            return Cursor::end(self);
        }
        let mut frames = Vec::new();
        let d = self.descend(self.root_id(), key, |node, slot| {
            frames.push(Frame { node, slot })
        });
        match d.step {
            Step::Exact if self.store.node(d.node).slot.present() => {
                Cursor::seeded(self, self.root_id(), frames)
            }
            _ => Cursor::end(self),
        }
    }

    /// Prefix lookup from `start`. Reaching a node exactly or stopping
    /// mid-label both root a cursor there; running past the trie is a miss.
    /// `on_exact` fires when the query itself ends a key with a value.
    pub(crate) fn find_prefix_from(
        &self,
        start: NodeId,
        key: &[A],
        on_exact: &mut dyn FnMut(),
    ) -> Cursor<'_, A, S> {
        let d = self.descend(start, key, |_, _| {});
        match d.step {
            Step::Exact => {
                if self.store.node(d.node).slot.present() {
                    on_exact();
                }
                Cursor::rooted(self, d.node, key[..d.base_len].to_vec())
            }
            Step::KeyEnded { .. } => Cursor::rooted(self, d.node, key[..d.base_len].to_vec()),
            _ => Cursor::end(self),
        }
    }

    pub fn find_prefix(&self, key: &[A], on_exact: &mut dyn FnMut()) -> Cursor<'_, A, S> {
        if self.store.is_empty() {
            return Cursor::end(self);
        }
        self.find_prefix_from(self.root_id(), key, on_exact)
    }

    /// Cursor over every value-bearing node, or the end cursor when empty.
    pub fn cursor(&self) -> Cursor<'_, A, S> {
        if self.store.is_empty() {
            return Cursor::end(self);
        }
        Cursor::rooted(self, self.root_id(), Vec::new())
    }

    pub fn memory_usage(&self) -> MemoryStats {
        let label_bytes = self.arena.reserved_bytes();
        let node_bytes = self.store.len() * std::mem::size_of::<crate::node::Node<S>>();
        let table_bytes: usize = self
            .store
            .iter_ids()
            .map(|id| self.store.node(id).children.table_bytes())
            .sum();
        let num_keys = self.len;
        let total = label_bytes + node_bytes + table_bytes;
        MemoryStats {
            label_bytes,
            label_chunks: self.arena.num_chunks(),
            node_bytes,
            table_bytes,
            num_keys,
            bytes_per_key: if num_keys > 0 {
                total as f64 / num_keys as f64
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MapSlot;

    type Map = RawTrie<u8, MapSlot<u32>>;

    fn map(entries: &[(&[u8], u32)]) -> Map {
        let mut t = Map::new(64);
        for &(k, v) in entries {
            t.insert_with(k, v, |old, new| *old = new);
        }
        t
    }

    #[test]
    fn first_insert_becomes_root() {
        let t = map(&[(b"abc", 1)]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.store.len(), 1);
        assert_eq!(t.label(NodeId(0)), b"abc");
        assert_eq!(t.get(b"abc"), Some(&1));
    }

    #[test]
    fn suffix_key_adds_edge() {
        let t = map(&[(b"ab", 1), (b"abc", 2)]);
        assert_eq!(t.get(b"ab"), Some(&1));
        assert_eq!(t.get(b"abc"), Some(&2));
        assert_eq!(t.get(b"a"), None);
        assert_eq!(t.store.len(), 2);
    }

    #[test]
    fn prefix_key_splits_edge() {
        let t = map(&[(b"abc", 1), (b"ab", 2)]);
        assert_eq!(t.get(b"abc"), Some(&1));
        assert_eq!(t.get(b"ab"), Some(&2));
        // Prefix node keeps [begin, begin+2); successor holds the "c".
        assert_eq!(t.label(NodeId(0)), b"ab");
        assert_eq!(t.label(NodeId(1)), b"c");
    }

    #[test]
    fn diverging_keys_split_and_branch() {
        let t = map(&[(b"abc", 1), (b"abd", 2)]);
        assert_eq!(t.get(b"abc"), Some(&1));
        assert_eq!(t.get(b"abd"), Some(&2));
        assert_eq!(t.get(b"ab"), None);
        // Root became the common prefix with two children.
        assert_eq!(t.label(NodeId(0)), b"ab");
        assert_eq!(t.store.node(NodeId(0)).children.num_children(), 2);
    }

    #[test]
    fn first_atom_divergence_splits_root_at_zero() {
        let t = map(&[(b"abc", 1), (b"xyz", 2)]);
        assert_eq!(t.label(NodeId(0)), b"");
        assert_eq!(t.get(b"abc"), Some(&1));
        assert_eq!(t.get(b"xyz"), Some(&2));
    }

    #[test]
    fn replace_policy_controls_overwrite() {
        let mut t = map(&[(b"k", 1)]);
        t.insert_with(b"k", 10, |old, new| *old = new);
        assert_eq!(t.get(b"k"), Some(&10));
        assert_eq!(t.len(), 1);
        t.insert_with(b"k", 5, |old, new| *old += new);
        assert_eq!(t.get(b"k"), Some(&15));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn value_on_interior_node_counts_once() {
        // "ab" ends at an interior node created by the earlier split.
        let mut t = map(&[(b"abc", 1), (b"abd", 2)]);
        assert_eq!(t.len(), 2);
        t.insert_with(b"ab", 3, |old, new| *old = new);
        assert_eq!(t.len(), 3);
        t.insert_with(b"ab", 4, |old, new| *old = new);
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(b"ab"), Some(&4));
    }

    #[test]
    fn empty_key_is_a_key() {
        let mut t = map(&[(b"abc", 1)]);
        t.insert_with(b"", 7, |old, new| *old = new);
        assert_eq!(t.get(b""), Some(&7));
        assert_eq!(t.get(b"abc"), Some(&1));
        assert_eq!(t.len(), 2);
        assert_eq!(t.label(NodeId(0)), b"");
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut t = map(&[(b"k", 1)]);
        *t.get_mut(b"k").unwrap() = 9;
        assert_eq!(t.get(b"k"), Some(&9));
        assert!(t.get_mut(b"missing").is_none());
    }

    #[test]
    fn adaptive_table_size_follows_xor_rule() {
        // First atoms 'a' (97) and 'c' (99): xor = 2 -> table size 4.
        let t = map(&[(b"apple", 1), (b"cherry", 2)]);
        let root = NodeId(0);
        assert_eq!(t.label(root), b"");
        assert_eq!(t.store.node(root).children.len(), 4);

        // 'd' (100) vs 'e' (101): xor = 1 -> size 2 suffices.
        let t = map(&[(b"dog", 1), (b"elk", 2)]);
        assert_eq!(t.store.node(NodeId(0)).children.len(), 2);
    }

    #[test]
    fn split_shares_the_arena_chunk() {
        let t = map(&[(b"abcdef", 1), (b"abcxyz", 2)]);
        let root_label = t.store.node(NodeId(0)).label;
        let succ_label = t.store.node(NodeId(1)).label;
        assert_eq!(root_label.chunk, succ_label.chunk);
        assert_eq!(root_label.end, succ_label.begin);
    }

    #[test]
    fn long_chain_of_splits() {
        let keys: Vec<&[u8]> = vec![
            b"abcabc",
            b"abcabcabc",
            b"abcvabc",
            b"abcxabc",
            b"abcyasbc",
            b"xabcvabc",
            b"xabcxabc",
            b"xabcyasbc",
        ];
        let mut t = Map::new(16);
        for (i, &k) in keys.iter().enumerate() {
            t.insert_with(k, i as u32, |old, new| *old = new);
        }
        assert_eq!(t.len(), keys.len());
        for (i, &k) in keys.iter().enumerate() {
            assert_eq!(t.get(k), Some(&(i as u32)), "key {:?}", k);
        }
        assert_eq!(t.get(b"abc"), None);
        assert_eq!(t.get(b"xabc"), None);
    }
}
