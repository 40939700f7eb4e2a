// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Kani model checking proofs for simjoin's filtering arithmetic.
//!
//! This standalone crate extracts the prefix-length computation and proves
//! its behavior for every float bit pattern, including the hostile ones the
//! main crate deliberately leaves unguarded.
//!
//! Run with: `cargo kani`
//!
//! ## Verified Properties
//!
//! 1. **No panics**: the saturating cast absorbs NaN, infinities, and
//!    negative products
//! 2. **Clamp**: the result never exceeds the record's token count
//! 3. **Floor**: with sane parameters at least one token is indexed
//! 4. **Monotonicity**: a larger threshold never shrinks the prefix

// ============================================================================
// PREFIX LENGTH (copied from src/index/prefix.rs)
// ============================================================================

/// Number of leading tokens of a record that enter the index.
///
/// `qval * threshold + 1` truncated toward zero, clamped to the token
/// count. The cast saturates: NaN and negative products give 0, positive
/// infinity gives `usize::MAX` before the clamp.
pub fn prefix_length(qval: usize, threshold: f64, num_tokens: usize) -> usize {
    ((qval as f64 * threshold + 1.0) as usize).min(num_tokens)
}

// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Verify prefix_length never panics, for any bit pattern.
    #[kani::proof]
    fn verify_prefix_length_no_panic() {
        let qval: usize = kani::any();
        let threshold = f64::from_bits(kani::any());
        let num_tokens: usize = kani::any();

        // This must not panic, NaN and infinities included
        let len = prefix_length(qval, threshold, num_tokens);

        // Clamp: never more than the record has
        kani::assert(len <= num_tokens, "prefix length exceeds token count");
    }

    /// Verify at least one token is indexed under sane parameters.
    #[kani::proof]
    fn verify_prefix_length_floor() {
        let qval: usize = kani::any();
        let threshold: f64 = kani::any();
        let num_tokens: usize = kani::any();
        kani::assume(threshold.is_finite() && threshold >= 0.0);

        let len = prefix_length(qval, threshold, num_tokens);

        // The +1 guarantees a non-empty prefix for non-empty records
        kani::assert(
            len >= 1.min(num_tokens),
            "non-empty record indexed no tokens",
        );
    }

    /// Verify a zero threshold indexes exactly one token.
    #[kani::proof]
    fn verify_zero_threshold_indexes_one() {
        let qval: usize = kani::any();
        let num_tokens: usize = kani::any();

        let len = prefix_length(qval, 0.0, num_tokens);
        kani::assert(
            len == 1.min(num_tokens),
            "zero threshold must index exactly the first token",
        );
    }

    /// Verify raising the threshold never shrinks the prefix.
    #[kani::proof]
    fn verify_prefix_length_monotone() {
        let qval: usize = kani::any();
        let lo: f64 = kani::any();
        let hi: f64 = kani::any();
        let num_tokens: usize = kani::any();
        kani::assume(lo.is_finite() && lo >= 0.0);
        kani::assume(hi.is_finite() && hi >= lo);

        kani::assert(
            prefix_length(qval, lo, num_tokens) <= prefix_length(qval, hi, num_tokens),
            "prefix length must grow with the threshold",
        );
    }

    /// Verify the hostile inputs collapse the way the saturating cast says.
    #[kani::proof]
    fn verify_hostile_thresholds_saturate() {
        let qval: usize = kani::any();
        let num_tokens: usize = kani::any();
        kani::assume(qval >= 1);

        kani::assert(
            prefix_length(qval, f64::NAN, num_tokens) == 0,
            "NaN threshold must index nothing",
        );
        kani::assert(
            prefix_length(qval, f64::INFINITY, num_tokens) == num_tokens,
            "infinite threshold must index every token",
        );
        kani::assert(
            prefix_length(qval, -2.0, num_tokens) == 0,
            "negative product must index nothing",
        );
    }
}
