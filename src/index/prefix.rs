// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The prefix inverted index: postings restricted to filter prefixes.
//!
//! For each record only the first `min(trunc(qval·threshold + 1), m)` of its
//! `m` ordered tokens are indexed. That bound is the pigeonhole argument
//! behind prefix filtering: two records within edit distance `threshold`
//! (measured on `qval`-gram profiles) must share at least one token among
//! those leading entries, so probing the postings of a record's own prefix
//! tokens reaches every candidate worth verifying. The companion size vector
//! records every record's full token count for the size filter.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. SIZES_ALIGNED: `sizes[i]` is the token count of record `i`; the vector
//!    has exactly one entry per input record.
//! 2. POSTINGS_APPEND_ORDER: every postings list is populated by a single
//!    forward pass over record ids, so lists are non-decreasing, and strictly
//!    increasing whenever each record's prefix tokens are distinct.
//! 3. PREFIX_ONLY: record `i` appears under token `t` exactly as many times
//!    as `t` occurs before position `prefix_length(i)` in record `i`'s
//!    sequence. Later occurrences are not indexed.
//! 4. NO_VALIDATION: neither [`PrefixIndex::build`] nor the state-transfer
//!    paths inspect their inputs. Ordering of token sequences, `qval > 0`,
//!    and threshold sanity are caller contracts (see crate docs); the
//!    arithmetic here is deliberately unguarded.

use crate::types::{RecordId, TokenId};
use std::collections::BTreeMap;

/// Inverted index over record prefixes plus a per-record size vector.
///
/// Build input is already tokenized and ordered; this structure stores only
/// derived data (ids and counts), never the token sequences themselves.
/// Rebuilding, not incremental update, is the only way to change content:
/// every [`build`](Self::build) call discards prior state first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixIndex {
    postings: BTreeMap<TokenId, Vec<RecordId>>,
    sizes: Vec<usize>,
}

impl PrefixIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt externally supplied state, e.g. deserialized from a file.
    ///
    /// **Trust boundary**: the structures are taken verbatim, with no
    /// invariant checks. Callers own the consistency of what they supply;
    /// [`crate::verify::check_prefix_index`] exists for the suspicious.
    pub fn from_parts(postings: BTreeMap<TokenId, Vec<RecordId>>, sizes: Vec<usize>) -> Self {
        Self { postings, sizes }
    }

    /// Replace both structures wholesale. Same no-validation contract as
    /// [`from_parts`](Self::from_parts).
    pub fn set_fields(&mut self, postings: BTreeMap<TokenId, Vec<RecordId>>, sizes: Vec<usize>) {
        self.postings = postings;
        self.sizes = sizes;
    }

    /// Index the prefixes of `token_sequences`.
    ///
    /// Per record `i`: its token count `m` is appended to the size vector,
    /// `prefix_length = min(trunc(qval·threshold + 1), m)` is computed with a
    /// truncating conversion, and record id `i` is appended to the postings
    /// list of each of its first `prefix_length` tokens, in the sequence's
    /// own order.
    ///
    /// The conversion saturates: negative or NaN products yield an empty
    /// prefix, an infinite product indexes the whole record. No input
    /// validation happens here.
    pub fn build(&mut self, token_sequences: &[Vec<TokenId>], qval: usize, threshold: f64) {
        self.postings = BTreeMap::new();
        self.sizes = Vec::with_capacity(token_sequences.len());

        for (record, tokens) in token_sequences.iter().enumerate() {
            let m = tokens.len();
            self.sizes.push(m);

            // Truncating, not rounding: trunc(qval*threshold + 1) equals
            // floor(qval*threshold) + 1 over the valid domain.
            let prefix_length = ((qval as f64 * threshold + 1.0) as usize).min(m);

            for &token in &tokens[..prefix_length] {
                // INVARIANT: POSTINGS_APPEND_ORDER - record ids enter in
                // input order, once per prefix occurrence of the token.
                self.postings.entry(token).or_default().push(record as RecordId);
            }
        }
    }

    /// The postings map, keyed by token id, ascending.
    pub fn postings(&self) -> &BTreeMap<TokenId, Vec<RecordId>> {
        &self.postings
    }

    /// Token counts, index-aligned to record ids.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Postings list for one token; empty slice when the token was never
    /// indexed.
    pub fn probe(&self, token: TokenId) -> &[RecordId] {
        self.postings.get(&token).map_or(&[], Vec::as_slice)
    }

    /// Token count of one record, if it exists.
    pub fn size_of(&self, record: RecordId) -> Option<usize> {
        self.sizes.get(record as usize).copied()
    }

    /// Number of indexed records.
    pub fn num_records(&self) -> usize {
        self.sizes.len()
    }
}
