//! Shared test utilities and fixtures.

#![allow(dead_code)]

use simjoin::{check_prefix_index, JoinOutput, JoinParams, PrefixIndex, Table};
use std::fs;

// ============================================================================
// DATASET PATHS
// ============================================================================

/// Left table of the generated product dataset (`cargo xtask gen-data`).
pub const PRODUCTS_LEFT: &str = "target/datasets/products_left.json";

/// Right table of the generated product dataset.
pub const PRODUCTS_RIGHT: &str = "target/datasets/products_right.json";

/// Check whether the generated product dataset is available.
pub fn products_available() -> bool {
    fs::metadata(PRODUCTS_LEFT).is_ok() && fs::metadata(PRODUCTS_RIGHT).is_ok()
}

/// Load one of the generated product tables.
pub fn load_products(path: &str) -> Table {
    let raw = fs::read_to_string(path).expect("Failed to read dataset table");
    serde_json::from_str(&raw).expect("Invalid dataset table")
}

// ============================================================================
// TABLE FIXTURES
// ============================================================================

/// Two-column table with synthetic "k{i}" keys and one join attribute.
pub fn name_table(values: &[&str]) -> Table {
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, v)| vec![Some(format!("k{}", i)), Some((*v).to_string())])
        .collect();
    Table::new(vec!["id".to_string(), "name".to_string()], rows)
}

/// Table with explicit attributes and rows, `None` marking missing cells.
pub fn make_table(attrs: &[&str], rows: &[Vec<Option<&str>>]) -> Table {
    let attrs = attrs.iter().map(|a| (*a).to_string()).collect();
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
        .collect();
    Table::new(attrs, rows)
}

/// Join params keyed and joined on the given attributes, progress off.
pub fn quiet_params(l_key: &str, r_key: &str, l_join: &str, r_join: &str) -> JoinParams {
    let mut params = JoinParams::new(l_key, r_key, l_join, r_join);
    params.show_progress = false;
    params
}

// ============================================================================
// INVARIANT CHECKS
// ============================================================================

/// Assert the structural invariants of a prefix index.
pub fn assert_prefix_index_well_formed(index: &PrefixIndex) {
    if let Err(e) = check_prefix_index(index) {
        panic!("INVARIANT VIOLATED: {}", e);
    }

    // Every postings entry corresponds to one prefix token occurrence, so the
    // total across lists can never exceed the total token count.
    let entries: usize = index.postings().values().map(Vec::len).sum();
    let tokens: usize = index.sizes().iter().sum();
    assert!(
        entries <= tokens,
        "INVARIANT VIOLATED: {} postings entries exceed {} total tokens",
        entries,
        tokens
    );
}

// ============================================================================
// ORACLES
// ============================================================================

/// All (left row, right row) pairs within edit distance `threshold`, found by
/// exhaustive comparison. Rows with a missing join value never pair.
pub fn brute_force_ed_pairs(
    left: &Table,
    right: &Table,
    l_join: usize,
    r_join: usize,
    threshold: usize,
) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for li in 0..left.len() {
        let Some(l_value) = left.cell(li, l_join) else {
            continue;
        };
        for ri in 0..right.len() {
            let Some(r_value) = right.cell(ri, r_join) else {
                continue;
            };
            if strsim::levenshtein(l_value, r_value) <= threshold {
                pairs.push((li, ri));
            }
        }
    }
    pairs
}

/// Key pairs reported by a join output, assuming the `_id, l_key, r_key, ...`
/// column layout the joins emit.
pub fn output_key_pairs(output: &JoinOutput) -> Vec<(String, String)> {
    output
        .rows
        .iter()
        .map(|row| {
            (
                row[1].as_str().expect("left key not a string").to_string(),
                row[2].as_str().expect("right key not a string").to_string(),
            )
        })
        .collect()
}

/// Decode a "k{i}" synthetic key back to its row index.
pub fn key_row(key: &str) -> usize {
    key[1..].parse().expect("key not in k{i} form")
}
