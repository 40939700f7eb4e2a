// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for prefix index construction.
//!
//! Builds from arbitrary token sequences and arbitrary parameter bit
//! patterns, including NaN, infinite, and negative thresholds. Construction
//! must never panic, and the result must satisfy every structural property
//! the joins rely on.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simjoin::{check_prefix_index, PrefixIndex};

/// Fuzz input for index construction
#[derive(Debug, Arbitrary)]
struct BuildInput {
    /// Token sequences, one per record (capped to avoid timeout)
    sequences: Vec<Vec<u32>>,
    /// Gram length, taken modulo a small range
    qval: usize,
    /// Threshold as raw bits, so every float value is reachable
    threshold_bits: u64,
}

fuzz_target!(|input: BuildInput| {
    // Cap sizes to keep iterations fast
    let mut sequences = input.sequences;
    sequences.truncate(64);
    for seq in &mut sequences {
        seq.truncate(32);
        for token in seq.iter_mut() {
            *token %= 1024;
        }
    }

    let qval = input.qval % 16;
    let threshold = f64::from_bits(input.threshold_bits);

    let mut index = PrefixIndex::new();
    index.build(&sequences, qval, threshold);

    // INVARIANT 1: One size entry per record, equal to its token count
    assert_eq!(
        index.sizes().len(),
        sequences.len(),
        "size vector length {} != record count {}",
        index.sizes().len(),
        sequences.len()
    );
    for (i, seq) in sequences.iter().enumerate() {
        assert_eq!(
            index.sizes()[i],
            seq.len(),
            "record {} has size {} but {} tokens",
            i,
            index.sizes()[i],
            seq.len()
        );
    }

    // INVARIANT 2: Each record contributes exactly its prefix length,
    // computed with the same saturating cast the builder uses
    let mut counts = vec![0usize; sequences.len()];
    for records in index.postings().values() {
        for &record in records {
            counts[record as usize] += 1;
        }
    }
    for (i, seq) in sequences.iter().enumerate() {
        let expected = ((qval as f64 * threshold + 1.0) as usize).min(seq.len());
        assert_eq!(
            counts[i], expected,
            "record {} contributed {} entries, expected prefix length {}",
            i, counts[i], expected
        );
    }

    // INVARIANT 3: Postings lists are non-decreasing and in bounds
    if let Err(e) = check_prefix_index(&index) {
        panic!("built index failed structural check: {}", e);
    }

    // INVARIANT 4: Building is deterministic
    let mut again = PrefixIndex::new();
    again.build(&sequences, qval, threshold);
    assert_eq!(index, again, "two builds from the same input differ");

    // INVARIANT 5: A rebuild discards prior state completely
    let mut reused = PrefixIndex::new();
    reused.build(&[vec![1, 2, 3], vec![4]], 2, 1.0);
    reused.build(&sequences, qval, threshold);
    assert_eq!(index, reused, "rebuild retained state from a previous build");
});
