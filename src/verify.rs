// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Optional well-formedness checks for adopted index state.
//!
//! The state-transfer paths on [`PrefixIndex`] take whatever they are given.
//! This module is the opt-in audit for callers who load state from outside
//! (a file, another process) and want the structural guarantees a fresh
//! build provides before they probe it. Nothing in the crate calls these
//! checks implicitly.

use crate::index::PrefixIndex;
use crate::types::{RecordId, TokenId};
use std::fmt;

/// A structural defect found in adopted index state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// A postings list decreases at `position`.
    PostingsOutOfOrder { token: TokenId, position: usize },
    /// A postings entry names a record the size vector does not know.
    RecordOutOfBounds {
        token: TokenId,
        record: RecordId,
        num_records: usize,
    },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::PostingsOutOfOrder { token, position } => {
                write!(f, "postings for token {} decrease at position {}", token, position)
            }
            InvariantError::RecordOutOfBounds {
                token,
                record,
                num_records,
            } => {
                write!(
                    f,
                    "postings for token {} name record {} >= num_records {}",
                    token, record, num_records
                )
            }
        }
    }
}

impl std::error::Error for InvariantError {}

/// Check that `index` looks like the output of a build.
///
/// Verifies, per postings list: record ids are non-decreasing and every id
/// has a size vector entry. Returns the first defect found, scanning tokens
/// in ascending order.
pub fn check_prefix_index(index: &PrefixIndex) -> Result<(), InvariantError> {
    let num_records = index.sizes().len();

    for (&token, records) in index.postings() {
        let mut previous: Option<RecordId> = None;
        for (position, &record) in records.iter().enumerate() {
            if (record as usize) >= num_records {
                return Err(InvariantError::RecordOutOfBounds {
                    token,
                    record,
                    num_records,
                });
            }
            if previous.is_some_and(|p| record < p) {
                return Err(InvariantError::PostingsOutOfOrder { token, position });
            }
            previous = Some(record);
        }
    }

    Ok(())
}
