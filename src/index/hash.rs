// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Exact-match hash index: join value to the record ids carrying it.

use crate::types::RecordId;
use std::collections::HashMap;

/// Maps each distinct join value to the records that contain it.
///
/// Backs the equality join, where candidate generation is a single hash
/// probe instead of a prefix scan.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    index: HashMap<String, Vec<RecordId>>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `values`, one entry per record in input order.
    pub fn build(&mut self, values: &[String]) {
        self.index = HashMap::new();
        for (record, value) in values.iter().enumerate() {
            self.index
                .entry(value.clone())
                .or_default()
                .push(record as RecordId);
        }
    }

    /// Records holding exactly `value`; empty slice on a miss.
    pub fn probe(&self, value: &str) -> &[RecordId] {
        self.index.get(value).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
