//! Heuristic equivalence between field names (and field values compared as text).
//!
//! Two texts are equivalent when either:
//! 1. their whitespace-delimited, lowercased word sets are equal
//!    (`"Breakfast Included"` ~ `"included breakfast"`), or
//! 2. one is a literal, case-sensitive substring of the other
//!    (`"beach"` ~ `"beach front"`).
//!
//! This is a pairwise judgement, not a canonicalization. It is not transitive:
//! `"pool"` ~ `"pool bar"` and `"pool bar"` ~ `"bar"`, yet `"pool"` !~ `"bar"`.
//! No grouping across more than two items is attempted.

use std::collections::BTreeSet;

fn word_set(s: &str) -> BTreeSet<String> {
    s.split_whitespace().map(str::to_lowercase).collect()
}

/// True when two field names should be treated as the same concept.
pub fn equivalent(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a) || word_set(a) == word_set(b)
}

/// Value-level dedup check. Same rule as [`equivalent`].
pub fn equivalent_text(a: &str, b: &str) -> bool {
    equivalent(a, b)
}
