//! Debug rendering and structural verification.
//!
//! `dump` renders the tree in a compact braces form, one node as
//! `label(=value){child}{child}`. `verify_invariants` walks every node and
//! reports violations of the structural rules as strings; tests run it
//! after randomized fills.

use std::fmt::Display;
use std::fmt::Write as _;

use crate::node::NodeId;
use crate::trie::RawTrie;
use crate::value::ValueSlot;
use crate::{Atom, TrieMap, TrieSet};

impl<S: ValueSlot> RawTrie<u8, S>
where
    S::Value: Display,
{
    pub(crate) fn dump(&self) -> String {
        if self.store.is_empty() {
            return "[ empty ]".to_string();
        }
        let mut out = String::new();
        self.dump_node(self.root_id(), &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, out: &mut String) {
        out.push_str(&String::from_utf8_lossy(self.label(id)));
        let node = self.store.node(id);
        if let Some(value) = node.slot.get() {
            let _ = write!(out, "(={})", value);
        }
        for (_, child) in node.children.iter() {
            out.push('{');
            self.dump_node(child, out);
            out.push('}');
        }
    }
}

impl<A: Atom, S: ValueSlot> RawTrie<A, S> {
    /// Check the structural invariants over the whole tree. Returns one
    /// message per violation; empty means the structure is sound.
    pub(crate) fn verify_invariants(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.store.is_empty() {
            if self.len() != 0 {
                issues.push(format!("empty store but len() = {}", self.len()));
            }
            return issues;
        }

        let mut visited = 0usize;
        let mut values = 0usize;
        let mut stack = vec![(self.root_id(), true)];
        while let Some((id, is_root)) = stack.pop() {
            visited += 1;
            let node = self.store.node(id);

            if !is_root && self.label(id).is_empty() {
                issues.push(format!("non-root node {:?} has an empty label", id));
            }
            if node.slot.present() {
                values += 1;
            } else if !is_root && node.children.num_children() == 0 {
                issues.push(format!("node {:?} has neither value nor children", id));
            }

            let table = &node.children;
            let mut first_atoms = Vec::new();
            for (slot, child) in table.iter() {
                let atom = self.first_atom(child);
                if first_atoms.contains(&atom) {
                    issues.push(format!(
                        "node {:?} has two children starting with {:?}",
                        id, atom
                    ));
                }
                first_atoms.push(atom);
                let expected = atom.as_usize() & (table.len() - 1);
                if slot != expected {
                    issues.push(format!(
                        "node {:?}: child with first atom {:?} sits in slot {} instead of {}",
                        id, atom, slot, expected
                    ));
                }
                stack.push((child, false));
            }
            if !table.is_empty() && !table.len().is_power_of_two() {
                issues.push(format!(
                    "node {:?} has a table of non-power-of-two size {}",
                    id,
                    table.len()
                ));
            }
        }

        if visited != self.store.len() {
            issues.push(format!(
                "{} nodes reachable from the root but {} allocated",
                visited,
                self.store.len()
            ));
        }
        if values != self.len() {
            issues.push(format!(
                "{} value-bearing nodes but len() = {}",
                values,
                self.len()
            ));
        }
        issues
    }
}

impl<V: Display> TrieMap<V> {
    /// Render the tree in the compact braces form, for troubleshooting.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl<V, A: Atom> TrieMap<V, A> {
    /// Check structural invariants; returns one message per violation.
    pub fn verify_invariants(&self) -> Vec<String> {
        self.raw.verify_invariants()
    }
}

impl TrieSet {
    /// Render the tree in the compact braces form, for troubleshooting.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl<A: Atom> TrieSet<A> {
    /// Check structural invariants; returns one message per violation.
    pub fn verify_invariants(&self) -> Vec<String> {
        self.raw.verify_invariants()
    }
}
