// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the bounded edit distance verifier.
//!
//! The verifier is the last gate before a pair reaches the output; if it
//! misreports a distance, the join emits wrong pairs. Checks the metric
//! axioms and the cutoff contract against arbitrary string pairs and caps.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simjoin::edit_distance_within;

/// Fuzz input for distance verification
#[derive(Debug, Arbitrary)]
struct DistanceInput {
    /// Left string bytes, lossily converted to UTF-8
    left_bytes: Vec<u8>,
    /// Right string bytes, lossily converted to UTF-8
    right_bytes: Vec<u8>,
    /// Distance cap, taken modulo a small range
    cap: usize,
}

fuzz_target!(|input: DistanceInput| {
    let left: String = String::from_utf8_lossy(&input.left_bytes)
        .chars()
        .take(64)
        .collect();
    let right: String = String::from_utf8_lossy(&input.right_bytes)
        .chars()
        .take(64)
        .collect();
    let cap = input.cap % 16;

    let result = edit_distance_within(&left, &right, cap);

    let l_chars = left.chars().count();
    let r_chars = right.chars().count();

    if let Some(d) = result {
        // INVARIANT 1: A reported distance respects the cap
        assert!(d <= cap, "distance {} exceeds cap {}", d, cap);

        // INVARIANT 2: Zero exactly for equal strings
        assert_eq!(
            d == 0,
            left == right,
            "distance {} for left={:?} right={:?}",
            d,
            left,
            right
        );

        // INVARIANT 3: The length gap lower-bounds the distance, and
        // rewriting the longer string char by char upper-bounds it
        assert!(
            l_chars.abs_diff(r_chars) <= d,
            "length gap {} exceeds distance {}",
            l_chars.abs_diff(r_chars),
            d
        );
        assert!(
            d <= l_chars.max(r_chars),
            "distance {} exceeds longer length {}",
            d,
            l_chars.max(r_chars)
        );
    } else {
        // INVARIANT 4: A cutoff can only happen when some edit is needed
        assert_ne!(left, right, "equal strings cut off at cap {}", cap);
    }

    // INVARIANT 5: Symmetric in its arguments
    assert_eq!(
        result,
        edit_distance_within(&right, &left, cap),
        "asymmetric result for left={:?} right={:?} cap={}",
        left,
        right,
        cap
    );

    // INVARIANT 6: Raising the cap never changes a reported distance and
    // never resurrects a cutoff below the old cap
    let relaxed = edit_distance_within(&left, &right, cap + 1);
    match (result, relaxed) {
        (Some(d), Some(d2)) => assert_eq!(d, d2, "distance changed when cap was raised"),
        (Some(d), None) => panic!("distance {} vanished when cap was raised", d),
        (None, Some(d2)) => assert_eq!(
            d2,
            cap + 1,
            "cutoff at cap {} but relaxed cap reports {}",
            cap,
            d2
        ),
        (None, None) => {}
    }
});
