// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Equality join via hash indexing.
//!
//! The degenerate end of the similarity spectrum: candidates are exact
//! value matches, so a single hash probe per right row replaces prefix
//! filtering and there is nothing to verify or score.

use crate::index::HashIndex;
use crate::types::Table;
use serde_json::Value;

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

/// Join `ltable` and `rtable` on rows whose join attributes are equal.
///
/// Comparison is byte-for-byte on the attribute strings. Output columns are
/// `_id`, the two key attributes under their prefixes, then any passthrough
/// attributes; this join never emits a score column. Pairs arrive in
/// right-table order, matches for each right row in left-table order;
/// `allow_missing` pairs follow at the end.
///
/// # Errors
///
/// Rejects unknown attributes and key attributes that are missing or
/// duplicated in their rows.
pub fn exact_join(
    ltable: &Table,
    rtable: &Table,
    params: &JoinParams,
) -> Result<JoinOutput, String> {
    let attrs = resolve_join_attrs(ltable, rtable, params)?;

    let l_proj = project_nonmissing(ltable, attrs.l_join);
    let r_proj = project_nonmissing(rtable, attrs.r_join);

    let mut index = HashIndex::new();
    index.build(&l_proj.values);

    let ctx = ProbeContext {
        ltable,
        rtable,
        attrs: &attrs,
        index: &index,
        l_proj: &l_proj,
        r_proj: &r_proj,
    };

    let jobs = resolve_jobs(params.n_jobs, r_proj.rows.len());
    let mut pair_rows = if jobs <= 1 {
        probe_sequential(&ctx, params.show_progress)
    } else {
        probe_parallel(&ctx, jobs, params.show_progress)
    };

    if params.allow_missing {
        pair_rows.extend(missing_value_pairs(ltable, rtable, &attrs, false));
    }
    assign_ids(&mut pair_rows);

    let mut header = output_header(&attrs, params);
    header.insert(0, "_id".to_string());

    Ok(JoinOutput {
        attrs: header,
        rows: pair_rows,
    })
}

struct ProbeContext<'a> {
    ltable: &'a Table,
    rtable: &'a Table,
    attrs: &'a JoinAttrs,
    index: &'a HashIndex,
    l_proj: &'a Projection,
    r_proj: &'a Projection,
}

impl ProbeContext<'_> {
    fn probe_row(&self, ri: usize) -> Vec<Vec<Value>> {
        let r_row = self.r_proj.rows[ri];
        let r_value = &self.r_proj.values[ri];
        self.index
            .probe(r_value)
            .iter()
            .map(|&l_record| {
                let l_row = self.l_proj.rows[l_record as usize];
                output_row(self.ltable, self.rtable, l_row, r_row, self.attrs)
            })
            .collect()
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
