//! Chunked storage for edge labels.
//!
//! All label atoms live in append-only chunks owned by the trie. Nodes refer
//! to their label by a `(chunk, begin, end)` handle instead of a pointer, so
//! label storage can grow without invalidating anything.
//!
//! Locality matters here: during descent the hot data is the labels of a
//! node and its children, so `append` takes a hint ("put this label in the
//! same chunk as its parent's") and only opens a new chunk when the write
//! would not fit. A chunk's capacity is reserved up front and an existing
//! chunk is reused only when the write fits inside that reservation, so
//! chunk data never reallocates and handles stay valid for the lifetime of
//! the arena.
//!
//! `min_chunk = 0` disables pooling entirely: every label gets its own
//! exactly-sized chunk. That wastes no bytes but gives up locality.

use crate::Atom;

/// Default chunk reservation, in atoms.
pub(crate) const DEFAULT_MIN_CHUNK: usize = 256;

/// Handle to a label slice: `chunks[chunk][begin..end]`.
///
/// Handles are never invalidated by later appends. Two nodes produced by an
/// edge split share one chunk through adjacent handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LabelRef {
    pub chunk: u32,
    pub begin: u32,
    pub end: u32,
}

impl LabelRef {
    /// Placeholder for freshly constructed nodes; replaced before first use.
    pub const EMPTY: LabelRef = LabelRef {
        chunk: 0,
        begin: 0,
        end: 0,
    };

    #[inline]
    pub fn len(self) -> usize {
        (self.end - self.begin) as usize
    }
}

/// Append-only label storage.
pub(crate) struct ChunkArena<A> {
    chunks: Vec<Vec<A>>,
    min_chunk: usize,
}

impl<A: Atom> ChunkArena<A> {
    pub fn new(min_chunk: usize) -> Self {
        Self {
            chunks: Vec::new(),
            min_chunk,
        }
    }

    /// Append `atoms` and return a stable handle to them.
    ///
    /// `hint` names the chunk holding the parent's label; it is preferred as
    /// long as the write fits its reservation. Otherwise the most recent
    /// chunk is tried, and failing that a fresh chunk is opened with
    /// capacity `max(min_chunk, atoms.len())`.
    pub fn append(&mut self, atoms: &[A], hint: Option<u32>) -> LabelRef {
        let chunk = self.select_chunk(atoms.len(), hint);
        let buf = &mut self.chunks[chunk];
        debug_assert!(buf.len() + atoms.len() <= buf.capacity() || atoms.is_empty());
        let begin = buf.len() as u32;
        buf.extend_from_slice(atoms);
        LabelRef {
            chunk: chunk as u32,
            begin,
            end: buf.len() as u32,
        }
    }

    fn select_chunk(&mut self, len: usize, hint: Option<u32>) -> usize {
        if self.min_chunk > 0 {
            if let Some(h) = hint {
                let c = &self.chunks[h as usize];
                if c.len() + len <= c.capacity() {
                    return h as usize;
                }
            }
            if let Some(last) = self.chunks.last() {
                if last.len() + len <= last.capacity() {
                    return self.chunks.len() - 1;
                }
            }
        }
        self.chunks.push(Vec::with_capacity(self.min_chunk.max(len)));
        self.chunks.len() - 1
    }

    /// Resolve a handle to its atoms.
    #[inline]
    pub fn get(&self, label: LabelRef) -> &[A] {
        if label.begin == label.end {
            return &[];
        }
        &self.chunks[label.chunk as usize][label.begin as usize..label.end as usize]
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Reserved label bytes, for memory accounting.
    pub fn reserved_bytes(&self) -> usize {
        self.chunks.iter().map(|c| c.capacity()).sum::<usize>() * std::mem::size_of::<A>()
    }
}
