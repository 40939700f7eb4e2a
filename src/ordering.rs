// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Global token ordering: token strings to frequency-ranked ids.
//!
//! Prefix filtering is only sound when every record's tokens are sorted under
//! one consistent global ordering, conventionally ascending document
//! frequency so that the rarest tokens land in the prefix and postings lists
//! stay short. This module derives that ordering from the join inputs and
//! translates token strings to [`TokenId`]s.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. RANK_DETERMINISM: ids depend only on the multiset of input tokens.
//!    Ties in frequency are broken by token string, never by map iteration
//!    order.
//! 2. RANK_DENSITY: ids are exactly `0..vocabulary_size`, rarest token first.
//! 3. UNKNOWN_TOKENS_SKIPPED: `map`/`order` drop tokens outside the
//!    vocabulary rather than inventing ids for them.

use crate::types::TokenId;
use std::collections::HashMap;

/// Frequency-ascending token ranking over one or more token collections.
#[derive(Debug, Clone, Default)]
pub struct TokenOrdering {
    ranks: HashMap<String, TokenId>,
}

impl TokenOrdering {
    /// Derive an ordering from every token vector of every participating
    /// table. Frequencies count occurrences (bag semantics), so a token
    /// repeated within one record counts each time.
    pub fn for_tables(token_tables: &[&[Vec<String>]]) -> Self {
        let mut freqs: HashMap<&str, usize> = HashMap::new();
        for table in token_tables {
            for record in *table {
                for token in record {
                    *freqs.entry(token.as_str()).or_insert(0) += 1;
                }
            }
        }

        // INVARIANT: RANK_DETERMINISM - sort by (frequency, token) before
        // assigning ids; HashMap iteration order must never leak into ranks.
        let mut by_rarity: Vec<(usize, &str)> =
            freqs.into_iter().map(|(token, freq)| (freq, token)).collect();
        by_rarity.sort_unstable_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        let ranks = by_rarity
            .into_iter()
            .enumerate()
            .map(|(rank, (_freq, token))| (token.to_string(), rank as TokenId))
            .collect();

        Self { ranks }
    }

    /// Rank of a single token, if it is in the vocabulary.
    pub fn rank(&self, token: &str) -> Option<TokenId> {
        self.ranks.get(token).copied()
    }

    /// Translate tokens to ids keeping their original positions. Unknown
    /// tokens are skipped.
    pub fn map(&self, tokens: &[String]) -> Vec<TokenId> {
        tokens
            .iter()
            .filter_map(|t| self.ranks.get(t.as_str()).copied())
            .collect()
    }

    /// Translate then sort ascending: the ordered token vector every index
    /// build consumes. Duplicate tokens stay duplicated, adjacent after the
    /// sort.
    pub fn order(&self, tokens: &[String]) -> Vec<TokenId> {
        let mut ids = self.map(tokens);
        ids.sort_unstable();
        ids
    }

    /// Vocabulary size.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vecs(records: &[&[&str]]) -> Vec<Vec<String>> {
        records
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_rarest_token_gets_lowest_id() {
        let left = vecs(&[&["ab", "bc"], &["ab", "cd"]]);
        let ordering = TokenOrdering::for_tables(&[&left]);
        // ab appears twice; bc and cd once each, tie broken alphabetically.
        assert_eq!(ordering.rank("bc"), Some(0));
        assert_eq!(ordering.rank("cd"), Some(1));
        assert_eq!(ordering.rank("ab"), Some(2));
    }

    #[test]
    fn test_counts_span_all_tables() {
        let left = vecs(&[&["xy"]]);
        let right = vecs(&[&["xy"], &["zz"]]);
        let ordering = TokenOrdering::for_tables(&[&left, &right]);
        assert_eq!(ordering.rank("zz"), Some(0));
        assert_eq!(ordering.rank("xy"), Some(1));
        assert_eq!(ordering.len(), 2);
    }

    #[test]
    fn test_order_sorts_and_keeps_duplicates() {
        let records = vecs(&[&["aa", "bb"], &["aa"], &["aa"]]);
        let ordering = TokenOrdering::for_tables(&[&records]);
        // bb is rarer than aa, so it sorts first.
        assert_eq!(ordering.rank("bb"), Some(0));
        assert_eq!(ordering.rank("aa"), Some(1));
        let ordered = ordering.order(&vecs(&[&["aa", "bb", "aa"]])[0]);
        assert_eq!(ordered, vec![0, 1, 1]);
    }

    #[test]
    fn test_unknown_tokens_are_skipped() {
        let records = vecs(&[&["aa"]]);
        let ordering = TokenOrdering::for_tables(&[&records]);
        let mapped = ordering.map(&vecs(&[&["aa", "??", "aa"]])[0]);
        assert_eq!(mapped, vec![0, 0]);
    }

    #[test]
    fn test_empty_input_yields_empty_ordering() {
        let none: Vec<Vec<String>> = Vec::new();
        let ordering = TokenOrdering::for_tables(&[&none]);
        assert!(ordering.is_empty());
        assert_eq!(ordering.rank("aa"), None);
    }
}
