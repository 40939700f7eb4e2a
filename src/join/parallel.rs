// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Work splitting and progress reporting for parallel joins.
//!
//! Joins parallelize over the probe side: the right table is cut into
//! contiguous ranges, one per worker, and each worker probes the shared
//! left-side index. Ranges are recombined in order, so parallel output is
//! byte-identical to sequential output.

use indicatif::{ProgressBar, ProgressStyle};
use std::ops::Range;

/// Cut `0..total` into `parts` contiguous ranges differing in length by at
/// most one. Empty ranges are never produced; fewer than `parts` ranges
/// come back when `total < parts`.
pub(crate) fn partition_ranges(total: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let base = total / parts;
    let remainder = total % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for part in 0..parts {
        let len = base + usize::from(part < remainder);
        if len == 0 {
            break;
        }
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Progress bar over `total` probe rows, or `None` when reporting is off.
pub(crate) fn probe_progress(total: u64, show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("━━╸"),
    );
    bar.set_prefix("Probing");
    Some(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_cover_total_in_order() {
        let ranges = partition_ranges(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn test_even_split() {
        let ranges = partition_ranges(8, 4);
        assert_eq!(ranges, vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_more_parts_than_items_drops_empty_ranges() {
        let ranges = partition_ranges(2, 5);
        assert_eq!(ranges, vec![0..1, 1..2]);
    }

    #[test]
    fn test_zero_total_yields_no_ranges() {
        assert!(partition_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_zero_parts_treated_as_one() {
        assert_eq!(partition_ranges(3, 0), vec![0..3]);
    }
}
