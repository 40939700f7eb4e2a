// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenizers: raw strings to token sequences.
//!
//! Two implementations: character q-grams (the edit-distance join's
//! tokenizer) and whitespace words (for set-overlap measures). Both operate
//! on characters, never bytes, so multi-byte text tokenizes the way a reader
//! counts it.

mod qgram;
mod whitespace;

pub use qgram::QgramTokenizer;
pub use whitespace::WhitespaceTokenizer;

/// The seam between raw strings and the ordering/index layers.
///
/// Implementations decide their own unit (grams, words) and whether repeated
/// tokens are kept. Downstream code treats the output as opaque strings.
pub trait Tokenizer {
    /// Tokenize one input string. Empty output is legal.
    fn tokenize(&self, input: &str) -> Vec<String>;
}

/// Deduplicate preserving first occurrence. Shared by the `return_set` modes.
pub(crate) fn dedup_preserving_order(tokens: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(tokens.len());
    tokens.into_iter().filter(|t| seen.insert(t.clone())).collect()
}
