// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Position-carrying prefix index for measures that need token positions.
//!
//! Same prefix discipline as [`super::PrefixIndex`], but each postings entry
//! keeps the zero-based positions at which the token occurs in the record's
//! ordered sequence, and the index tracks aggregate length statistics plus
//! the ids of empty records. Position filtering tightens the overlap bound
//! before verification has to touch the strings at all.

use crate::measures::SimMeasure;
use crate::types::{RecordId, TokenId};
use std::collections::{BTreeMap, HashMap};

/// Prefix index whose postings carry token positions.
///
/// Entries are `(record, positions)` where `positions` lists every zero-based
/// occurrence of the token in that record, ascending. A record enters a list
/// once per occurrence of the token inside its prefix, so consumers that
/// want one visit per record must deduplicate while probing.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    index: BTreeMap<TokenId, Vec<(RecordId, Vec<usize>)>>,
    sizes: Vec<usize>,
    min_length: usize,
    max_length: usize,
    empty_records: Vec<RecordId>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self {
            index: BTreeMap::new(),
            sizes: Vec::new(),
            min_length: usize::MAX,
            max_length: 0,
            empty_records: Vec::new(),
        }
    }

    /// Index prefixes of `token_sequences` under `measure` at `threshold`.
    ///
    /// The prefix bound comes from [`SimMeasure::prefix_length`], so this
    /// index serves every measure, not just the edit-distance one. Records
    /// with no tokens are remembered in [`empty_records`](Self::empty_records)
    /// instead of the postings.
    pub fn build(&mut self, token_sequences: &[Vec<TokenId>], measure: SimMeasure, threshold: f64) {
        self.index = BTreeMap::new();
        self.sizes = Vec::with_capacity(token_sequences.len());
        self.min_length = usize::MAX;
        self.max_length = 0;
        self.empty_records = Vec::new();

        for (record, tokens) in token_sequences.iter().enumerate() {
            let m = tokens.len();
            self.sizes.push(m);

            if m == 0 {
                self.empty_records.push(record as RecordId);
                continue;
            }
            self.min_length = self.min_length.min(m);
            self.max_length = self.max_length.max(m);

            let mut positions: HashMap<TokenId, Vec<usize>> = HashMap::new();
            for (pos, &token) in tokens.iter().enumerate() {
                positions.entry(token).or_default().push(pos);
            }

            let prefix_length = measure.prefix_length(m, threshold).min(m);
            for &token in &tokens[..prefix_length] {
                let occurrences = positions[&token].clone();
                self.index
                    .entry(token)
                    .or_default()
                    .push((record as RecordId, occurrences));
            }
        }
    }

    /// Postings for one token; empty when the token was never indexed.
    pub fn probe(&self, token: TokenId) -> &[(RecordId, Vec<usize>)] {
        self.index.get(&token).map_or(&[], Vec::as_slice)
    }

    /// Token count of one record, if it exists.
    pub fn size_of(&self, record: RecordId) -> Option<usize> {
        self.sizes.get(record as usize).copied()
    }

    /// Shortest non-empty record length, `usize::MAX` when none exist.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Longest record length, zero when no non-empty record exists.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Record ids that tokenized to nothing, in input order.
    pub fn empty_records(&self) -> &[RecordId] {
        &self.empty_records
    }

    pub fn num_records(&self) -> usize {
        self.sizes.len()
    }
}
