// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded edit distance over characters.
//!
//! `|len(a) - len(b)|` is a lower bound on edit distance, so pairs whose
//! lengths differ by more than the cap are rejected before the O(nm) DP
//! allocates anything. Inside the DP, a row whose minimum already exceeds
//! the cap can never recover, which gives a second exit.

/// Edit distance between `a` and `b`, or `None` when it exceeds `max`.
///
/// Distances are measured over characters, not bytes, so multi-byte
/// codepoints count as single edits. The returned value is exact whenever
/// it is `Some`; callers that only need a yes/no can treat `Some(_)` as a
/// hit.
pub fn edit_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    // Length difference is a lower bound on the distance.
    if a_len.abs_diff(b_len) > max {
        return None;
    }
    if a_len == 0 {
        return Some(b_len);
    }

    let b_chars: Vec<char> = b.chars().collect();
    let mut dp: Vec<usize> = (0..=b_len).collect();

    for (i, ac) in a.chars().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        let mut min_row = dp[0];

        for (j, &bc) in b_chars.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
            min_row = min_row.min(dp[j + 1]);
        }

        // Row minimum only grows from here.
        if min_row > max {
            return None;
        }
    }

    (dp[b_len] <= max).then_some(dp[b_len])
}
