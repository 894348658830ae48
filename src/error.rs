//! Error surface. Lookups signal absence with `Option`; only the checked
//! access path (`at` / indexing) turns a missing key into an error.

use thiserror::Error;

/// Returned by `at` when the key is not present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("key not present in trie")]
pub struct OutOfRangeError;
