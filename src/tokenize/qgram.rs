// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Character q-gram tokenization.
//!
//! With padding on (the default), the input is framed by `qval - 1` pad
//! characters on each side before windowing, so `"ab"` at `qval = 2` becomes
//! `#ab$` and tokenizes to `["#a", "ab", "b$"]`. Padding guarantees
//! `chars + qval - 1` grams for every input, including the empty string, and
//! gives boundary characters the same number of gram memberships as interior
//! ones. That count is what the edit-distance size filter reasons about, so
//! joins should leave padding on.

use super::{dedup_preserving_order, Tokenizer};

/// Sliding-window q-gram tokenizer over characters.
#[derive(Debug, Clone, PartialEq)]
pub struct QgramTokenizer {
    qval: usize,
    padding: bool,
    prefix_pad: char,
    suffix_pad: char,
    return_set: bool,
}

impl QgramTokenizer {
    /// Tokenizer with the conventional defaults: padding on, `#`/`$` pads,
    /// duplicates kept.
    pub fn new(qval: usize) -> Self {
        Self {
            qval,
            padding: true,
            prefix_pad: '#',
            suffix_pad: '$',
            return_set: false,
        }
    }

    /// Toggle padding.
    pub fn padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    /// Emit each distinct gram once (first occurrence order) instead of the
    /// full bag.
    pub fn return_set(mut self, return_set: bool) -> Self {
        self.return_set = return_set;
        self
    }

    pub fn qval(&self) -> usize {
        self.qval
    }
}

impl Default for QgramTokenizer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Tokenizer for QgramTokenizer {
    fn tokenize(&self, input: &str) -> Vec<String> {
        // A window width of zero has no meaningful grams.
        if self.qval == 0 {
            return Vec::new();
        }

        let mut chars: Vec<char> = Vec::with_capacity(input.len() + 2 * (self.qval - 1));
        if self.padding {
            chars.extend(std::iter::repeat(self.prefix_pad).take(self.qval - 1));
        }
        chars.extend(input.chars());
        if self.padding {
            chars.extend(std::iter::repeat(self.suffix_pad).take(self.qval - 1));
        }

        if chars.len() < self.qval {
            return Vec::new();
        }

        let grams: Vec<String> = chars
            .windows(self.qval)
            .map(|w| w.iter().collect())
            .collect();

        if self.return_set {
            dedup_preserving_order(grams)
        } else {
            grams
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigrams_with_padding() {
        let tok = QgramTokenizer::new(2);
        assert_eq!(tok.tokenize("ab"), vec!["#a", "ab", "b$"]);
    }

    #[test]
    fn test_trigram_padding_width() {
        let tok = QgramTokenizer::new(3);
        assert_eq!(
            tok.tokenize("ab"),
            vec!["##a", "#ab", "ab$", "b$$"]
        );
    }

    #[test]
    fn test_empty_string_still_tokenizes_under_padding() {
        let tok = QgramTokenizer::new(2);
        assert_eq!(tok.tokenize(""), vec!["#$"]);
    }

    #[test]
    fn test_padded_gram_count_is_chars_plus_q_minus_one() {
        let tok = QgramTokenizer::new(3);
        for s in ["", "a", "ab", "wooden desk", "tōkyō"] {
            let expected = s.chars().count() + 2;
            assert_eq!(tok.tokenize(s).len(), expected, "input: {:?}", s);
        }
    }

    #[test]
    fn test_no_padding_short_input_yields_nothing() {
        let tok = QgramTokenizer::new(3).padding(false);
        assert_eq!(tok.tokenize("ab"), Vec::<String>::new());
        assert_eq!(tok.tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn test_no_padding_windows_only_the_input() {
        let tok = QgramTokenizer::new(2).padding(false);
        assert_eq!(tok.tokenize("abc"), vec!["ab", "bc"]);
    }

    #[test]
    fn test_return_set_keeps_first_occurrence_order() {
        let tok = QgramTokenizer::new(2).padding(false).return_set(true);
        // "aaab" bag: aa, aa, ab
        assert_eq!(tok.tokenize("aaab"), vec!["aa", "ab"]);
    }

    #[test]
    fn test_multibyte_characters_window_by_char() {
        let tok = QgramTokenizer::new(2).padding(false);
        assert_eq!(tok.tokenize("héllo"), vec!["hé", "él", "ll", "lo"]);
    }

    #[test]
    fn test_zero_qval_yields_nothing() {
        let tok = QgramTokenizer::new(0);
        assert_eq!(tok.tokenize("abc"), Vec::<String>::new());
    }
}
