// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Whitespace word tokenization for set-overlap measures.

use super::{dedup_preserving_order, Tokenizer};

/// Splits on Unicode whitespace. Runs of whitespace produce no empty tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitespaceTokenizer {
    return_set: bool,
}

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        Self { return_set: false }
    }

    /// Emit each distinct word once (first occurrence order).
    pub fn return_set(mut self, return_set: bool) -> Self {
        self.return_set = return_set;
        self
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, input: &str) -> Vec<String> {
        let words: Vec<String> = input.split_whitespace().map(str::to_string).collect();
        if self.return_set {
            dedup_preserving_order(words)
        } else {
            words
        }
    }
}
