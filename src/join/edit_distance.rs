// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit-distance join via q-gram prefix filtering.
//!
//! The pipeline: project rows that have a join value, tokenize those values
//! into q-gram bags, rank grams by corpus frequency (rare first), index the
//! left side's prefixes, then probe the index with every right row's prefix
//! and verify the surviving candidates with a bounded distance computation.
//! Prefix filtering does the heavy lifting: most row pairs never reach the
//! dynamic program.

use crate::distance::edit_distance_within;
use crate::index::PrefixIndex;
use crate::ordering::TokenOrdering;
use crate::tokenize::{QgramTokenizer, Tokenizer};
use crate::types::{CompOp, RecordId, Table, TokenId};
use serde_json::Value;
use std::collections::BTreeSet;

use super::{
    assign_ids, missing_value_pairs, output_header, output_row, project_nonmissing,
    resolve_join_attrs, resolve_jobs, JoinAttrs, JoinOutput, JoinParams, Projection,
};

#[cfg(feature = "parallel")]
use super::parallel::{partition_ranges, probe_progress};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Join `ltable` and `rtable` on rows whose join attributes are within
/// `threshold` edits, per `comp_op`.
///
/// Output columns are `_id`, the two key attributes under their prefixes,
/// any passthrough attributes, and `_sim_score` (the exact distance) when
/// `params.out_sim_score` is set. Pairs arrive in right-table order, with
/// candidates for each right row in ascending left-record order;
/// `allow_missing` pairs follow at the end.
///
/// # Coverage caveat
///
/// Candidates must share a q-gram. When the longer string of a pair has
/// fewer than `qval * threshold - qval + 2` characters, the threshold can
/// rewrite it past all gram overlap and the pair goes unreported. Very
/// short join attributes are better served by [`super::exact_join`] or a
/// smaller `qval`.
///
/// # Errors
///
/// Rejects unknown attributes, key attributes that are missing or
/// duplicated in their rows, and a `threshold` that is negative, NaN, or
/// infinite.
pub fn edit_distance_join(
    ltable: &Table,
    rtable: &Table,
    threshold: f64,
    comp_op: CompOp,
    tokenizer: &QgramTokenizer,
    params: &JoinParams,
) -> Result<JoinOutput, String> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(format!(
            "edit distance threshold must be a non-negative finite number, got {}",
            threshold
        ));
    }
    let attrs = resolve_join_attrs(ltable, rtable, params)?;

    // Filtering arithmetic assumes gram bags; the set flag is overridden.
    let tokenizer = tokenizer.clone().return_set(false);

    let l_proj = project_nonmissing(ltable, attrs.l_join);
    let r_proj = project_nonmissing(rtable, attrs.r_join);

    let l_tokens: Vec<Vec<String>> = l_proj.values.iter().map(|v| tokenizer.tokenize(v)).collect();
    let r_tokens: Vec<Vec<String>> = r_proj.values.iter().map(|v| tokenizer.tokenize(v)).collect();

    let ordering = TokenOrdering::for_tables(&[&l_tokens, &r_tokens]);
    let l_ordered: Vec<Vec<TokenId>> = l_tokens.iter().map(|t| ordering.order(t)).collect();
    let r_ordered: Vec<Vec<TokenId>> = r_tokens.iter().map(|t| ordering.order(t)).collect();

    let mut index = PrefixIndex::new();
    index.build(&l_ordered, tokenizer.qval(), threshold);

    // Largest distance the comparison can accept; verification stops there.
    let cap = match comp_op {
        CompOp::Le => threshold.floor() as usize,
        CompOp::Lt => (threshold.ceil() as usize).saturating_sub(1),
    };

    let ctx = ProbeContext {
        ltable,
        rtable,
        attrs: &attrs,
        index: &index,
        l_proj: &l_proj,
        r_proj: &r_proj,
        r_ordered: &r_ordered,
        qval: tokenizer.qval(),
        threshold,
        comp_op,
        cap,
        out_sim_score: params.out_sim_score,
    };

    let jobs = resolve_jobs(params.n_jobs, r_proj.rows.len());
    let mut pair_rows = if jobs <= 1 {
        probe_sequential(&ctx, params.show_progress)
    } else {
        probe_parallel(&ctx, jobs, params.show_progress)
    };

    if params.allow_missing {
        pair_rows.extend(missing_value_pairs(
            ltable,
            rtable,
            &attrs,
            params.out_sim_score,
        ));
    }
    assign_ids(&mut pair_rows);

    let mut header = output_header(&attrs, params);
    header.insert(0, "_id".to_string());
    if params.out_sim_score {
        header.push("_sim_score".to_string());
    }

    Ok(JoinOutput {
        attrs: header,
        rows: pair_rows,
    })
}

/// Everything a probe worker needs, shared read-only across workers.
struct ProbeContext<'a> {
    ltable: &'a Table,
    rtable: &'a Table,
    attrs: &'a JoinAttrs,
    index: &'a PrefixIndex,
    l_proj: &'a Projection,
    r_proj: &'a Projection,
    r_ordered: &'a [Vec<TokenId>],
    qval: usize,
    threshold: f64,
    comp_op: CompOp,
    cap: usize,
    out_sim_score: bool,
}

impl ProbeContext<'_> {
    /// Pairs produced by right projection row `ri`, in ascending left order.
    fn probe_row(&self, ri: usize) -> Vec<Vec<Value>> {
        let r_row = self.r_proj.rows[ri];
        let r_value = &self.r_proj.values[ri];
        let tokens = &self.r_ordered[ri];
        let m_r = tokens.len();

        // Probe prefix mirrors the indexing bound.
        let probe_len = ((self.qval as f64 * self.threshold + 1.0) as usize).min(m_r);

        let mut candidates: BTreeSet<RecordId> = BTreeSet::new();
        for &token in &tokens[..probe_len] {
            candidates.extend(self.index.probe(token).iter().copied());
        }

        let mut rows = Vec::new();
        for l_record in candidates {
            let li = l_record as usize;

            // Under padded grams the token-count gap equals the character
            // gap, which lower-bounds the distance.
            let m_l = self.index.sizes()[li];
            if m_l.abs_diff(m_r) as f64 > self.threshold {
                continue;
            }

            let l_value = &self.l_proj.values[li];
            if let Some(d) = edit_distance_within(l_value, r_value, self.cap) {
                if self.comp_op.holds(d as f64, self.threshold) {
                    let l_row = self.l_proj.rows[li];
                    let mut row =
                        output_row(self.ltable, self.rtable, l_row, r_row, self.attrs);
                    if self.out_sim_score {
                        row.push(Value::from(d as f64));
                    }
                    rows.push(row);
                }
            }
        }
        rows
    }
}

fn probe_sequential(ctx: &ProbeContext<'_>, show_progress: bool) -> Vec<Vec<Value>> {
    #[cfg(feature = "parallel")]
    let progress = probe_progress(ctx.r_proj.rows.len() as u64, show_progress);
    #[cfg(not(feature = "parallel"))]
    let _ = show_progress;

    let mut rows = Vec::new();
    for ri in 0..ctx.r_proj.rows.len() {
        rows.extend(ctx.probe_row(ri));
        #[cfg(feature = "parallel")]
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    #[cfg(feature = "parallel")]
    if let Some(bar) = &progress {
        bar.finish_with_message(format!("{} pairs", rows.len()));
    }
    rows
}

#[cfg(feature = "parallel")]
fn probe_parallel(ctx: &ProbeContext<'_>, jobs: usize, show_progress: bool) -> Vec<Vec<Value>> {
    let total = ctx.r_proj.rows.len();
    let progress = probe_progress(total as u64, show_progress);
    let counter = AtomicUsize::new(0);

    // Ranges recombine in order, so output matches the sequential path.
    let chunks: Vec<Vec<Vec<Value>>> = partition_ranges(total, jobs)
        .into_par_iter()
        .map(|range| {
            let mut rows = Vec::new();
            for ri in range {
                rows.extend(ctx.probe_row(ri));
                let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(bar) = &progress {
                    bar.set_position(count as u64);
                }
            }
            rows
        })
        .collect();

    let rows: Vec<Vec<Value>> = chunks.into_iter().flatten().collect();
    if let Some(bar) = &progress {
        bar.finish_with_message(format!("{} pairs", rows.len()));
    }
    rows
}

/// Non-parallel fallback: sequential probe regardless of the requested jobs.
#[cfg(not(feature = "parallel"))]
fn probe_parallel(ctx: &ProbeContext<'_>, _jobs: usize, show_progress: bool) -> Vec<Vec<Value>> {
    probe_sequential(ctx, show_progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(attrs: &[&str], rows: &[&[Option<&str>]]) -> Table {
        Table::new(
            attrs.iter().map(|a| a.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    fn quiet_params() -> JoinParams {
        let mut params = JoinParams::new("id", "id", "name", "name");
        params.show_progress = false;
        params
    }

    #[test]
    fn test_finds_single_edit_pair_with_score() {
        let l = table(&["id", "name"], &[&[Some("l1"), Some("hello")]]);
        let r = table(&["id", "name"], &[&[Some("r1"), Some("hallo")]]);

        let out = edit_distance_join(
            &l,
            &r,
            1.0,
            CompOp::Le,
            &QgramTokenizer::new(2),
            &quiet_params(),
        )
        .unwrap();

        assert_eq!(out.attrs, vec!["_id", "l_id", "r_id", "_sim_score"]);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(
            out.rows[0],
            vec![
                Value::from(0u64),
                Value::from("l1"),
                Value::from("r1"),
                Value::from(1.0),
            ]
        );
    }

    #[test]
    fn test_strict_comparison_excludes_boundary_distance() {
        let l = table(
            &["id", "name"],
            &[&[Some("l1"), Some("hello")], &[Some("l2"), Some("hallo")]],
        );
        let r = table(&["id", "name"], &[&[Some("r1"), Some("hello")]]);

        let out = edit_distance_join(
            &l,
            &r,
            1.0,
            CompOp::Lt,
            &QgramTokenizer::new(2),
            &quiet_params(),
        )
        .unwrap();

        // Only the distance-zero pair survives d < 1.
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0][1], Value::from("l1"));
    }

    #[test]
    fn test_zero_threshold_matches_equal_strings_only() {
        let l = table(
            &["id", "name"],
            &[&[Some("l1"), Some("mouse")], &[Some("l2"), Some("house")]],
        );
        let r = table(&["id", "name"], &[&[Some("r1"), Some("mouse")]]);

        let out = edit_distance_join(
            &l,
            &r,
            0.0,
            CompOp::Le,
            &QgramTokenizer::new(2),
            &quiet_params(),
        )
        .unwrap();

        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0][1], Value::from("l1"));
        assert_eq!(out.rows[0][3], Value::from(0.0));
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let t = table(&["id", "name"], &[&[Some("1"), Some("a")]]);
        let tok = QgramTokenizer::new(2);
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err =
                edit_distance_join(&t, &t, bad, CompOp::Le, &tok, &quiet_params()).unwrap_err();
            assert!(err.contains("threshold"), "{}", err);
        }
    }

    #[test]
    fn test_missing_join_values_drop_unless_allowed() {
        let l = table(
            &["id", "name"],
            &[&[Some("l1"), Some("wooden desk")], &[Some("l2"), None]],
        );
        let r = table(&["id", "name"], &[&[Some("r1"), Some("wooden desk")]]);

        let tok = QgramTokenizer::new(2);
        let out = edit_distance_join(&l, &r, 1.0, CompOp::Le, &tok, &quiet_params()).unwrap();
        assert_eq!(out.rows.len(), 1);

        let mut params = quiet_params();
        params.allow_missing = true;
        let out = edit_distance_join(&l, &r, 1.0, CompOp::Le, &tok, &params).unwrap();
        // The matched pair plus (l2, r1) with a null score.
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[1][1], Value::from("l2"));
        assert_eq!(out.rows[1][3], Value::Null);
        // Ids stay dense across the appended block.
        assert_eq!(out.rows[1][0], Value::from(1u64));
    }

    #[test]
    fn test_passthrough_attrs_follow_keys() {
        let l = table(
            &["id", "name", "price"],
            &[&[Some("l1"), Some("lamp"), Some("10")]],
        );
        let r = table(&["id", "name"], &[&[Some("r1"), Some("lamp")]]);

        let mut params = quiet_params();
        params.l_out_attrs = Some(vec!["price".to_string()]);
        let out =
            edit_distance_join(&l, &r, 1.0, CompOp::Le, &QgramTokenizer::new(2), &params).unwrap();

        assert_eq!(
            out.attrs,
            vec!["_id", "l_id", "r_id", "l_price", "_sim_score"]
        );
        assert_eq!(out.rows[0][3], Value::from("10"));
    }

    #[test]
    fn test_parallel_jobs_match_sequential_output() {
        let names = [
            "wooden desk", "wood desk", "metal chair", "metal chairs", "floor lamp",
            "flor lamp", "area rug", "area rugs", "book shelf", "bookshelf",
        ];
        let rows: Vec<Vec<Option<String>>> = names
            .iter()
            .enumerate()
            .map(|(i, n)| vec![Some(format!("k{}", i)), Some(n.to_string())])
            .collect();
        let t = Table::new(vec!["id".to_string(), "name".to_string()], rows);

        let tok = QgramTokenizer::new(2);
        let sequential =
            edit_distance_join(&t, &t, 2.0, CompOp::Le, &tok, &quiet_params()).unwrap();

        let mut params = quiet_params();
        params.n_jobs = 3;
        let parallel = edit_distance_join(&t, &t, 2.0, CompOp::Le, &tok, &params).unwrap();

        assert_eq!(sequential, parallel);
        // Every record at least matches itself.
        assert!(sequential.rows.len() >= names.len());
    }
}
