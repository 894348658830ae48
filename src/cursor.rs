//! Depth-first enumeration over the trie.
//!
//! A cursor is a traversal root, a stack of `(parent, slot)` frames, and an
//! optional base prefix. The stack records which child slot was taken at
//! each level; the current node is the child in the top frame's slot, or the
//! root when the stack is empty. Keys are reconstructed by concatenating the
//! base prefix, the root's label, and the label of every descended child.
//!
//! Enumeration order is physical slot order within each table (first-atom
//! low bits), so it is deterministic for a given insertion history but not
//! lexicographic.

use crate::node::NodeId;
use crate::trie::RawTrie;
use crate::value::ValueSlot;
use crate::Atom;

/// One level of descent: the slot taken in `node`'s child table.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub node: NodeId,
    pub slot: usize,
}

/// A position in the trie supporting depth-first stepping.
///
/// Cursors own their stack; `clone` is a deep copy of the enumeration
/// state. Equality compares the node currently pointed at, so any two end
/// cursors of the same trie are equal.
#[derive(Clone)]
pub struct Cursor<'a, A: Atom, S: ValueSlot> {
    trie: &'a RawTrie<A, S>,
    root: Option<NodeId>,
    frames: Vec<Frame>,
    base_prefix: Vec<A>,
}

impl<'a, A: Atom, S: ValueSlot> Cursor<'a, A, S> {
    pub(crate) fn end(trie: &'a RawTrie<A, S>) -> Self {
        Self {
            trie,
            root: None,
            frames: Vec::new(),
            base_prefix: Vec::new(),
        }
    }

    /// Cursor rooted at `node`, advanced to the first value-bearing node of
    /// that subtree. `base_prefix` holds the atoms consumed strictly before
    /// `node`'s own label.
    pub(crate) fn rooted(trie: &'a RawTrie<A, S>, node: NodeId, base_prefix: Vec<A>) -> Self {
        let mut cursor = Self {
            trie,
            root: Some(node),
            frames: Vec::new(),
            base_prefix,
        };
        cursor.normalize();
        cursor
    }

    /// Cursor whose stack was seeded by a descent from the trie root.
    pub(crate) fn seeded(trie: &'a RawTrie<A, S>, root: NodeId, frames: Vec<Frame>) -> Self {
        let mut cursor = Self {
            trie,
            root: Some(root),
            frames,
            base_prefix: Vec::new(),
        };
        cursor.normalize();
        cursor
    }

    fn normalize(&mut self) {
        if let Some(node) = self.current() {
            if !self.trie.store.node(node).slot.present() {
                self.next_value();
            }
        }
    }

    /// Whether enumeration is exhausted.
    pub fn is_end(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn current(&self) -> Option<NodeId> {
        let root = self.root?;
        match self.frames.last() {
            Some(frame) => self.trie.store.node(frame.node).children.get(frame.slot),
            None => Some(root),
        }
    }

    /// Descend into the current node's first occupied child slot.
    pub fn step_down(&mut self) -> bool {
        let Some(node) = self.current() else {
            return false;
        };
        match self.trie.store.node(node).children.first_occupied(0) {
            Some(slot) => {
                self.frames.push(Frame { node, slot });
                true
            }
            None => false,
        }
    }

    /// Advance the top frame to the next occupied sibling slot.
    pub fn step_fore(&mut self) -> bool {
        let Some(frame) = self.frames.last() else {
            return false;
        };
        let table = &self.trie.store.node(frame.node).children;
        match table.first_occupied(frame.slot + 1) {
            Some(slot) => {
                self.frames.last_mut().unwrap().slot = slot;
                true
            }
            None => {
                // Park at the end of the table; `next` pops from here.
                self.frames.last_mut().unwrap().slot = table.len();
                false
            }
        }
    }

    /// Pop one level and advance to the next sibling there.
    pub fn step_up(&mut self) -> bool {
        self.frames.pop();
        self.step_fore()
    }

    /// Depth-first advance to the next node, or to the end. A root with no
    /// children goes straight to the end.
    pub fn next(&mut self) {
        if self.step_down() {
            return;
        }
        if self.step_fore() {
            return;
        }
        while !self.frames.is_empty() {
            if self.step_up() {
                return;
            }
        }
        self.root = None;
    }

    /// Advance to the next node with a present value. Returns `false` when
    /// the enumeration is exhausted.
    pub fn next_value(&mut self) -> bool {
        loop {
            self.next();
            match self.current() {
                None => return false,
                Some(node) if self.trie.store.node(node).slot.present() => return true,
                Some(_) => {}
            }
        }
    }

    /// Reconstruct the full key of the current node.
    pub fn key(&self) -> Vec<A> {
        let mut out = self.base_prefix.clone();
        let Some(root) = self.root else {
            return out;
        };
        out.extend_from_slice(self.trie.label(root));
        for frame in &self.frames {
            if let Some(node) = self.trie.store.node(frame.node).children.get(frame.slot) {
                out.extend_from_slice(self.trie.label(node));
            }
        }
        out
    }

    /// The current node's value, if any.
    pub fn value(&self) -> Option<&'a S::Value> {
        let node = self.current()?;
        self.trie.store.node(node).slot.get()
    }

    /// Consume the cursor into an iterator over the remaining entries.
    pub fn entries(self) -> Iter<'a, A, S> {
        Iter { cursor: self }
    }
}

impl<A: Atom, S: ValueSlot> PartialEq for Cursor<'_, A, S> {
    fn eq(&self, other: &Self) -> bool {
        (self.is_end() && other.is_end()) || self.current() == other.current()
    }
}

/// Iterator over `(key, value)` pairs in cursor order.
pub struct Iter<'a, A: Atom, S: ValueSlot> {
    cursor: Cursor<'a, A, S>,
}

impl<'a, A: Atom, S: ValueSlot> Iterator for Iter<'a, A, S> {
    type Item = (Vec<A>, &'a S::Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_end() {
            return None;
        }
        let key = self.cursor.key();
        let value = self.cursor.value()?;
        self.cursor.next_value();
        Some((key, value))
    }
}
