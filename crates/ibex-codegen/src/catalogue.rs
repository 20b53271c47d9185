//! The fixed, ordered reason catalogue.
//!
//! Order is externally meaningful: the checker runtime indexes into the
//! generated table positionally, so entries must never be reordered, only
//! appended.

/// The production reason catalogue.
pub const CATALOGUE: &[&str] = &[
    "a < (b + c): a < c; 0 <= b",
    "(a + b) <= c: a <= (c - b)",
    "a < b: a < c; c <= b",
    "a <= b: a <= c; c <= b",
    "a < (b + c): a < (b0 + c0); b0 <= b; c0 <= c",
];
