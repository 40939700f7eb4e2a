// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shared domain types for the join pipelines.
//!
//! Terminology used throughout the crate:
//!
//! | Term | Meaning |
//! |------|---------|
//! | record | one row of a [`Table`] |
//! | join attribute | the string column a join compares |
//! | key attribute | the unique identifier column echoed into join output |
//! | token | one unit produced by a tokenizer (q-gram, word) |
//!
//! Cells are `Option<String>`: `None` models a missing value. Join and key
//! attributes are string-typed by contract; numeric payload columns travel
//! through joins untouched as their string renderings.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Token identifier assigned by a [`TokenOrdering`](crate::TokenOrdering).
///
/// Dense, 0-based, ascending by global token frequency. The indexes impose no
/// ordering assumptions of their own; they store whatever ids the caller
/// supplies.
pub type TokenId = u32;

/// Record identifier: 0-based position of a row within its table (or within
/// a projected view of it, for the join pipelines).
pub type RecordId = u32;

// ============================================================================
// TABLE
// ============================================================================

/// An in-memory relation: named columns over rows of optional strings.
///
/// The JSON form mirrors the struct:
///
/// ```json
/// { "attrs": ["id", "name"], "rows": [["1", "wooden desk"], ["2", null]] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Column names, in cell order.
    pub attrs: Vec<String>,
    /// Row-major cells. Every row must have `attrs.len()` entries.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new(attrs: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { attrs, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column.
    pub fn attr_index(&self, attr: &str) -> Result<usize, String> {
        self.attrs
            .iter()
            .position(|a| a == attr)
            .ok_or_else(|| format!("attribute '{}' not found in table", attr))
    }

    /// Cell accessor tolerant of ragged rows; out-of-range reads are `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// Check that a column can serve as a key: present in every row and
    /// never repeated.
    pub fn validate_key(&self, key_attr: &str) -> Result<(), String> {
        let idx = self.attr_index(key_attr)?;
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.rows.len());
        for (row_id, row) in self.rows.iter().enumerate() {
            match row.get(idx).and_then(|c| c.as_deref()) {
                None => {
                    return Err(format!(
                        "key attribute '{}' has a missing value at row {}",
                        key_attr, row_id
                    ));
                }
                Some(value) => {
                    if !seen.insert(value) {
                        return Err(format!(
                            "key attribute '{}' has a duplicate value '{}' at row {}",
                            key_attr, value, row_id
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// COMPARISON OPERATOR
// ============================================================================

/// Comparison applied to the verified edit distance versus the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompOp {
    /// distance <= threshold
    Le,
    /// distance < threshold
    Lt,
}

impl CompOp {
    /// Parse from the textual forms accepted on the CLI.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "<=" | "le" => Ok(Self::Le),
            "<" | "lt" => Ok(Self::Lt),
            other => Err(format!(
                "invalid comparison operator '{}' (expected '<=' or '<')",
                other
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Le => "<=",
            Self::Lt => "<",
        }
    }

    /// Evaluate the operator.
    pub fn holds(self, distance: f64, threshold: f64) -> bool {
        match self {
            Self::Le => distance <= threshold,
            Self::Lt => distance < threshold,
        }
    }
}
