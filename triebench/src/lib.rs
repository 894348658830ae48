//! Input generation for the trie benchmarks.
//!
//! The interesting workloads for a radix trie are word-like keys with heavy
//! prefix sharing. The canonical source is the system word list; machines
//! without one get a deterministic pseudo-word fallback so benches and
//! examples behave the same everywhere.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs;
use std::io;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Default word-list location on most Unix systems.
pub const SYSTEM_WORDS: &str = "/usr/share/dict/words";

/// A loaded (or generated) word list.
pub struct WordList {
    /// The words, one entry per line of the source file.
    pub words: Vec<String>,
}

impl WordList {
    /// Load a newline-delimited word file.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let words: Vec<String> = data
            .par_lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Ok(Self { words })
    }

    /// Load `path`, falling back to `size` generated pseudo-words when the
    /// file is missing (CI images rarely ship a dictionary).
    pub fn load_or_generate(path: impl AsRef<Path>, size: usize, seed: u64) -> Self {
        Self::load(path).unwrap_or_else(|_| Self::generate(size, seed))
    }

    /// Deterministic pseudo-words built from syllables.
    pub fn generate(size: usize, seed: u64) -> Self {
        const SYLLABLES: &[&str] = &[
            "al", "an", "ar", "ba", "be", "ca", "co", "da", "de", "el", "en", "er", "fa", "ga",
            "in", "is", "ka", "la", "le", "ma", "mi", "na", "no", "or", "pa", "ra", "re", "sa",
            "se", "ta", "ti", "to", "ur", "va", "vi", "za",
        ];
        let mut rng = StdRng::seed_from_u64(seed);
        let words = (0..size)
            .map(|_| {
                let syllables = rng.gen_range(2..6);
                (0..syllables)
                    .map(|_| SYLLABLES[rng.gen_range(0..SYLLABLES.len())])
                    .collect::<String>()
            })
            .collect();
        Self { words }
    }

    /// Shuffle the list in place with a seeded generator.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.words.shuffle(&mut rng);
    }
}

/// Produces keys by joining random words with dots, like
/// `alpha.beta.gamma`. `seq_len` extra words are prepended per key; zero
/// gives bare words.
pub struct Generator<'a> {
    words: &'a [String],
    rng: StdRng,
    /// Number of dotted words prepended to each key.
    pub seq_len: usize,
}

impl<'a> Generator<'a> {
    /// A generator over `words` with its own seeded RNG.
    pub fn new(words: &'a [String], seed: u64) -> Self {
        Self {
            words,
            rng: StdRng::seed_from_u64(seed),
            seq_len: 0,
        }
    }

    /// Next dotted-word key.
    pub fn next_key(&mut self) -> String {
        let mut out = String::new();
        for _ in 0..self.seq_len {
            out.push_str(&self.words[self.rng.gen_range(0..self.words.len())]);
            out.push('.');
        }
        out.push_str(&self.words[self.rng.gen_range(0..self.words.len())]);
        out
    }

    /// Generate `n` keys as byte vectors.
    pub fn take_keys(&mut self, n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|_| self.next_key().into_bytes()).collect()
    }
}

/// Sequential keys with a fully shared stem, the friendliest case.
pub fn sequential_keys(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("key:{:08}", i).into_bytes()).collect()
}

/// URL-shaped keys with moderate prefix sharing.
pub fn url_like_keys(n: usize) -> Vec<Vec<u8>> {
    let domains = ["example.com", "test.org", "demo.net", "sample.io"];
    let paths = ["users", "posts", "comments", "api/v1", "api/v2"];

    (0..n)
        .map(|i| {
            let domain = domains[i % domains.len()];
            let path = paths[(i / domains.len()) % paths.len()];
            let id = i / (domains.len() * paths.len());
            format!("{}/{}/{}", domain, path, id).into_bytes()
        })
        .collect()
}
