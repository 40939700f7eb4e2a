// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk index state.
//!
//! [`PrefixIndex`] owns no file format; this module wraps its two raw
//! structures in a versioned JSON document together with the build
//! parameters, and guards the payload with a CRC32 computed over a
//! canonical byte stream. A load verifies the checksum before the state is
//! handed to the index, so a truncated or hand-edited file fails at load
//! time instead of probing as silent garbage.

use crate::index::PrefixIndex;
use crate::types::{RecordId, TokenId};
use crc32fast::Hasher as Crc32Hasher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Current state file layout version.
pub const STATE_VERSION: u32 = 1;

fn default_version() -> u32 {
    STATE_VERSION
}

/// Serialized index state plus the parameters it was built with.
///
/// JSON maps require string keys, so token ids round-trip through their
/// decimal representations; serde handles both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub qval: usize,
    pub threshold: f64,
    /// CRC32 over the canonical byte stream of postings and sizes.
    pub checksum: u32,
    pub postings: BTreeMap<TokenId, Vec<RecordId>>,
    pub sizes: Vec<usize>,
}

impl IndexFile {
    /// Snapshot an index's state for writing.
    pub fn from_index(index: &PrefixIndex, qval: usize, threshold: f64) -> Self {
        Self {
            version: STATE_VERSION,
            qval,
            threshold,
            checksum: state_checksum(index.postings(), index.sizes()),
            postings: index.postings().clone(),
            sizes: index.sizes().to_vec(),
        }
    }

    /// Hand the stored structures to an index.
    ///
    /// The transfer itself performs no checks; [`load_index_file`] has
    /// already verified the checksum by the time this runs.
    pub fn into_index(self) -> PrefixIndex {
        PrefixIndex::from_parts(self.postings, self.sizes)
    }

    pub fn num_records(&self) -> usize {
        self.sizes.len()
    }

    pub fn num_tokens(&self) -> usize {
        self.postings.len()
    }
}

/// CRC32 over an unambiguous encoding of the two structures: each token id
/// (ascending) followed by its length-prefixed record list, then the
/// length-prefixed size vector. Little-endian throughout.
fn state_checksum(postings: &BTreeMap<TokenId, Vec<RecordId>>, sizes: &[usize]) -> u32 {
    let mut hasher = Crc32Hasher::new();
    for (&token, records) in postings {
        hasher.update(&token.to_le_bytes());
        hasher.update(&(records.len() as u64).to_le_bytes());
        for &record in records {
            hasher.update(&record.to_le_bytes());
        }
    }
    hasher.update(&(sizes.len() as u64).to_le_bytes());
    for &size in sizes {
        hasher.update(&(size as u64).to_le_bytes());
    }
    hasher.finalize()
}

/// Write `file` to `path` as pretty-printed JSON.
pub fn save_index_file(path: &Path, file: &IndexFile) -> Result<(), String> {
    let json = serde_json::to_string_pretty(file)
        .map_err(|e| format!("Failed to serialize index state: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Read and verify an index state file.
///
/// # Errors
///
/// Unreadable files, malformed JSON, an unknown layout version, and a
/// checksum that does not match the recomputed value are all rejected.
pub fn load_index_file(path: &Path) -> Result<IndexFile, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let file: IndexFile = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid index state JSON in {}: {}", path.display(), e))?;

    if file.version != STATE_VERSION {
        return Err(format!(
            "Unsupported index state version {} (expected {})",
            file.version, STATE_VERSION
        ));
    }

    let computed = state_checksum(&file.postings, &file.sizes);
    if file.checksum != computed {
        return Err(format!(
            "Checksum mismatch in {}: stored {:08x}, computed {:08x}",
            path.display(),
            file.checksum,
            computed
        ));
    }

    Ok(file)
}
