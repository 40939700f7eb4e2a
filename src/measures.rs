// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Measure-specific prefix-length and size bounds.
//!
//! Every similarity measure admits a pigeonhole bound: two records meeting
//! the threshold must share a token within the first `prefix_length` entries
//! of their frequency-ordered token vectors, and their token counts must fall
//! inside a mutual size window. [`SimMeasure`] computes both. The
//! edit-distance arm is the same `min(trunc(qval·threshold + 1), m)` bound
//! that [`PrefixIndex::build`](crate::PrefixIndex::build) hardcodes.
//!
//! All conversions truncate; none round. Results saturate at zero rather
//! than going negative, and divisions by a zero threshold saturate at
//! `usize::MAX` (an unbounded window). Threshold domain checks belong to the
//! join layer, not here.

/// A similarity or distance measure with its filter bounds.
///
/// Thresholds are fractions in `(0, 1]` for Cosine/Dice/Jaccard, an absolute
/// overlap count for Overlap, and an absolute edit distance for EditDistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMeasure {
    Cosine,
    Dice,
    Jaccard,
    Overlap,
    /// Edit distance over q-gram profiles; carries the gram width the
    /// profiles were built with.
    EditDistance { qval: usize },
}

impl SimMeasure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Dice => "dice",
            Self::Jaccard => "jaccard",
            Self::Overlap => "overlap",
            Self::EditDistance { .. } => "edit_distance",
        }
    }

    /// Number of leading ordered tokens that must be indexed for the prefix
    /// filter to be complete at this threshold.
    pub fn prefix_length(self, num_tokens: usize, threshold: f64) -> usize {
        if num_tokens == 0 {
            return 0;
        }
        let n = num_tokens as f64;
        match self {
            Self::Cosine => (n - (threshold * threshold * n).ceil() + 1.0) as usize,
            Self::Dice => (n - (threshold / (2.0 - threshold) * n).ceil() + 1.0) as usize,
            Self::Jaccard => (n - (threshold * n).ceil() + 1.0) as usize,
            Self::Overlap => (n - threshold + 1.0) as usize,
            Self::EditDistance { qval } => {
                ((qval as f64 * threshold + 1.0) as usize).min(num_tokens)
            }
        }
    }

    /// Smallest token count a matching record can have.
    pub fn size_lower_bound(self, num_tokens: usize, threshold: f64) -> usize {
        let n = num_tokens as f64;
        match self {
            Self::Cosine => (threshold * threshold * n).ceil() as usize,
            Self::Dice => (threshold / (2.0 - threshold) * n).ceil() as usize,
            Self::Jaccard => (threshold * n).ceil() as usize,
            Self::Overlap => threshold as usize,
            Self::EditDistance { .. } => (n - threshold) as usize,
        }
    }

    /// Largest token count a matching record can have.
    pub fn size_upper_bound(self, num_tokens: usize, threshold: f64) -> usize {
        let n = num_tokens as f64;
        match self {
            Self::Cosine => (n / (threshold * threshold)).floor() as usize,
            Self::Dice => ((2.0 - threshold) / threshold * n).floor() as usize,
            Self::Jaccard => (n / threshold).floor() as usize,
            Self::Overlap => usize::MAX,
            Self::EditDistance { .. } => (n + threshold) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_prefix_length() {
        assert_eq!(SimMeasure::Jaccard.prefix_length(5, 0.8), 2);
        // Threshold 1.0 still needs one indexed token.
        assert_eq!(SimMeasure::Jaccard.prefix_length(5, 1.0), 1);
    }

    #[test]
    fn test_cosine_prefix_length() {
        // 10 - ceil(0.25 * 10) + 1 = 8
        assert_eq!(SimMeasure::Cosine.prefix_length(10, 0.5), 8);
    }

    #[test]
    fn test_dice_prefix_length() {
        // 4 - ceil((0.8 / 1.2) * 4) + 1 = 4 - 3 + 1 = 2
        assert_eq!(SimMeasure::Dice.prefix_length(4, 0.8), 2);
    }

    #[test]
    fn test_overlap_prefix_length() {
        assert_eq!(SimMeasure::Overlap.prefix_length(6, 3.0), 4);
    }

    #[test]
    fn test_edit_distance_prefix_matches_index_bound() {
        let ed = SimMeasure::EditDistance { qval: 2 };
        assert_eq!(ed.prefix_length(5, 1.0), 3);
        // Fractional products truncate: 2 * 0.5 + 1 = 2.0 -> 2
        assert_eq!(ed.prefix_length(5, 0.5), 2);
        // Clamped by the record's own token count.
        assert_eq!(ed.prefix_length(2, 4.0), 2);
    }

    #[test]
    fn test_zero_tokens_always_zero_prefix() {
        for measure in [
            SimMeasure::Cosine,
            SimMeasure::Dice,
            SimMeasure::Jaccard,
            SimMeasure::Overlap,
            SimMeasure::EditDistance { qval: 2 },
        ] {
            assert_eq!(measure.prefix_length(0, 0.7), 0, "{}", measure.as_str());
        }
    }

    #[test]
    fn test_edit_distance_size_window() {
        let ed = SimMeasure::EditDistance { qval: 2 };
        assert_eq!(ed.size_lower_bound(5, 2.0), 3);
        assert_eq!(ed.size_upper_bound(5, 2.0), 7);
        // Fractional thresholds truncate on both sides.
        assert_eq!(ed.size_lower_bound(5, 2.5), 2);
        assert_eq!(ed.size_upper_bound(5, 2.5), 7);
        // Lower bound saturates instead of wrapping.
        assert_eq!(ed.size_lower_bound(1, 4.0), 0);
    }

    #[test]
    fn test_jaccard_size_window() {
        assert_eq!(SimMeasure::Jaccard.size_lower_bound(10, 0.5), 5);
        assert_eq!(SimMeasure::Jaccard.size_upper_bound(10, 0.5), 20);
    }

    #[test]
    fn test_overlap_upper_bound_is_unbounded() {
        assert_eq!(SimMeasure::Overlap.size_upper_bound(3, 2.0), usize::MAX);
    }

    #[test]
    fn test_zero_threshold_division_saturates() {
        assert_eq!(SimMeasure::Jaccard.size_upper_bound(4, 0.0), usize::MAX);
    }
}
