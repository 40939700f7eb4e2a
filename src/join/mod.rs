// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Table joins built on the index layer.
//!
//! Two join flavors share this module's plumbing:
//!
//! - [`edit_distance_join`]: pairs whose join attributes are within an edit
//!   distance threshold, found through q-gram prefix filtering.
//! - [`exact_join`]: pairs whose join attributes are equal, found through a
//!   hash index.
//!
//! Both take the probe side on the right: the left table is indexed once,
//! then every right row probes it. Output rows carry the two key values,
//! any requested passthrough attributes, and (for the scored join) the
//! distance, with a fresh `_id` column numbering rows from zero.

mod edit_distance;
mod exact;
#[cfg(feature = "parallel")]
mod parallel;

pub use edit_distance::edit_distance_join;
pub use exact::exact_join;

use crate::types::Table;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// PARAMETERS AND OUTPUT
// ============================================================================

/// Knobs shared by the join operations.
///
/// The four attribute names are required; everything else has a
/// conventional default. Construct with [`JoinParams::new`] and override
/// fields directly.
#[derive(Debug, Clone)]
pub struct JoinParams {
    /// Key attribute of the left table. Must be unique and never missing.
    pub l_key_attr: String,
    /// Key attribute of the right table. Must be unique and never missing.
    pub r_key_attr: String,
    /// Attribute of the left table the join condition reads.
    pub l_join_attr: String,
    /// Attribute of the right table the join condition reads.
    pub r_join_attr: String,
    /// Extra left-table attributes to carry into the output.
    pub l_out_attrs: Option<Vec<String>>,
    /// Extra right-table attributes to carry into the output.
    pub r_out_attrs: Option<Vec<String>>,
    /// Prefix for left-table column names in the output.
    pub l_out_prefix: String,
    /// Prefix for right-table column names in the output.
    pub r_out_prefix: String,
    /// Also emit every pair where either side's join attribute is missing.
    /// A left row with a missing join value pairs with every right row and
    /// vice versa; such rows get a null score in scored joins.
    pub allow_missing: bool,
    /// Append the verified distance as a `_sim_score` column. Ignored by
    /// joins that have no score to report.
    pub out_sim_score: bool,
    /// Worker count. Positive is taken as-is, negative counts down from the
    /// machine's CPUs (joblib style: `cpus + 1 + n_jobs`), and anything
    /// that resolves below one runs sequentially. Capped by the number of
    /// probe-side rows.
    pub n_jobs: i32,
    /// Render a progress bar on stderr while probing. Effective only with
    /// the `parallel` feature and a terminal.
    pub show_progress: bool,
}

impl Default for JoinParams {
    fn default() -> Self {
        Self {
            l_key_attr: String::new(),
            r_key_attr: String::new(),
            l_join_attr: String::new(),
            r_join_attr: String::new(),
            l_out_attrs: None,
            r_out_attrs: None,
            l_out_prefix: "l_".to_string(),
            r_out_prefix: "r_".to_string(),
            allow_missing: false,
            out_sim_score: true,
            n_jobs: 1,
            show_progress: true,
        }
    }
}

impl JoinParams {
    /// Parameters with the given key and join attributes, defaults elsewhere.
    pub fn new(l_key_attr: &str, r_key_attr: &str, l_join_attr: &str, r_join_attr: &str) -> Self {
        Self {
            l_key_attr: l_key_attr.to_string(),
            r_key_attr: r_key_attr.to_string(),
            l_join_attr: l_join_attr.to_string(),
            r_join_attr: r_join_attr.to_string(),
            ..Self::default()
        }
    }
}

/// A join result: column names plus rows of JSON values.
///
/// Cells are strings for attribute values, null for missing passthrough
/// cells and unscored pairs, and numbers for `_id` and `_sim_score`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutput {
    pub attrs: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl JoinOutput {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// SHARED PLUMBING
// ============================================================================

/// Column indices resolved once per join, after validation.
#[derive(Debug)]
pub(crate) struct JoinAttrs {
    pub l_key: usize,
    pub r_key: usize,
    pub l_join: usize,
    pub r_join: usize,
    /// Output attribute indices, key attribute already dropped.
    pub l_out: Vec<usize>,
    pub r_out: Vec<usize>,
    /// Names matching `l_out` / `r_out`, for header construction.
    pub l_out_names: Vec<String>,
    pub r_out_names: Vec<String>,
}

/// Validate attribute references and key integrity, resolve indices.
///
/// Key attributes must exist, be unique, and have no missing values in
/// their table. Output attributes must exist; a key attribute repeated in
/// an output list is dropped since keys are always emitted.
pub(crate) fn resolve_join_attrs(
    ltable: &Table,
    rtable: &Table,
    params: &JoinParams,
) -> Result<JoinAttrs, String> {
    let l_key = ltable
        .attr_index(&params.l_key_attr)
        .map_err(|e| format!("left table: {}", e))?;
    let r_key = rtable
        .attr_index(&params.r_key_attr)
        .map_err(|e| format!("right table: {}", e))?;
    let l_join = ltable
        .attr_index(&params.l_join_attr)
        .map_err(|e| format!("left table: {}", e))?;
    let r_join = rtable
        .attr_index(&params.r_join_attr)
        .map_err(|e| format!("right table: {}", e))?;

    let (l_out, l_out_names) =
        resolve_out_attrs(ltable, params.l_out_attrs.as_deref(), &params.l_key_attr)
            .map_err(|e| format!("left table: {}", e))?;
    let (r_out, r_out_names) =
        resolve_out_attrs(rtable, params.r_out_attrs.as_deref(), &params.r_key_attr)
            .map_err(|e| format!("right table: {}", e))?;

    ltable
        .validate_key(&params.l_key_attr)
        .map_err(|e| format!("left table: {}", e))?;
    rtable
        .validate_key(&params.r_key_attr)
        .map_err(|e| format!("right table: {}", e))?;

    Ok(JoinAttrs {
        l_key,
        r_key,
        l_join,
        r_join,
        l_out,
        r_out,
        l_out_names,
        r_out_names,
    })
}

fn resolve_out_attrs(
    table: &Table,
    out_attrs: Option<&[String]>,
    key_attr: &str,
) -> Result<(Vec<usize>, Vec<String>), String> {
    let mut indices = Vec::new();
    let mut names = Vec::new();
    for attr in out_attrs.unwrap_or(&[]) {
        if attr == key_attr {
            continue;
        }
        indices.push(table.attr_index(attr)?);
        names.push(attr.clone());
    }
    Ok((indices, names))
}

/// Rows whose join attribute is present, with their values extracted.
pub(crate) struct Projection {
    /// Original row indices, ascending.
    pub rows: Vec<usize>,
    /// Join attribute values, aligned with `rows`.
    pub values: Vec<String>,
}

pub(crate) fn project_nonmissing(table: &Table, join_attr: usize) -> Projection {
    let mut rows = Vec::with_capacity(table.len());
    let mut values = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        if let Some(value) = table.cell(row, join_attr) {
            rows.push(row);
            values.push(value.to_string());
        }
    }
    Projection { rows, values }
}

/// Header for the pair columns: keys first, then passthrough attributes,
/// each under its table's prefix. The caller prepends `_id` and appends
/// `_sim_score` as appropriate.
pub(crate) fn output_header(attrs: &JoinAttrs, params: &JoinParams) -> Vec<String> {
    let mut header = Vec::with_capacity(2 + attrs.l_out.len() + attrs.r_out.len());
    header.push(format!("{}{}", params.l_out_prefix, params.l_key_attr));
    header.push(format!("{}{}", params.r_out_prefix, params.r_key_attr));
    for name in &attrs.l_out_names {
        header.push(format!("{}{}", params.l_out_prefix, name));
    }
    for name in &attrs.r_out_names {
        header.push(format!("{}{}", params.r_out_prefix, name));
    }
    header
}

fn cell_value(table: &Table, row: usize, col: usize) -> Value {
    table
        .cell(row, col)
        .map_or(Value::Null, |v| Value::String(v.to_string()))
}

/// One output row: key pair then passthrough cells, no score.
pub(crate) fn output_row(
    ltable: &Table,
    rtable: &Table,
    l_row: usize,
    r_row: usize,
    attrs: &JoinAttrs,
) -> Vec<Value> {
    let mut row = Vec::with_capacity(2 + attrs.l_out.len() + attrs.r_out.len());
    row.push(cell_value(ltable, l_row, attrs.l_key));
    row.push(cell_value(rtable, r_row, attrs.r_key));
    for &col in &attrs.l_out {
        row.push(cell_value(ltable, l_row, col));
    }
    for &col in &attrs.r_out {
        row.push(cell_value(rtable, r_row, col));
    }
    row
}

/// Resolve the worker count for a probe side of `probe_rows` rows.
///
/// Always at least one; one means the sequential path.
pub(crate) fn resolve_jobs(n_jobs: i32, probe_rows: usize) -> usize {
    let requested = if n_jobs < 0 {
        let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        (cpus as i64 + 1 + i64::from(n_jobs)).max(1) as usize
    } else {
        (n_jobs as usize).max(1)
    };
    requested.min(probe_rows).max(1)
}

/// Pairs involving a missing join attribute, for `allow_missing` joins.
///
/// Every left row with a missing join value pairs with every right row;
/// every right row with a missing join value pairs with every left row
/// whose join value is present. Both-missing pairs appear once, via the
/// first rule. When `scored`, each row gets a trailing null score cell.
pub(crate) fn missing_value_pairs(
    ltable: &Table,
    rtable: &Table,
    attrs: &JoinAttrs,
    scored: bool,
) -> Vec<Vec<Value>> {
    let mut rows = Vec::new();

    for l_row in 0..ltable.len() {
        if ltable.cell(l_row, attrs.l_join).is_some() {
            continue;
        }
        for r_row in 0..rtable.len() {
            let mut row = output_row(ltable, rtable, l_row, r_row, attrs);
            if scored {
                row.push(Value::Null);
            }
            rows.push(row);
        }
    }

    for r_row in 0..rtable.len() {
        if rtable.cell(r_row, attrs.r_join).is_some() {
            continue;
        }
        for l_row in 0..ltable.len() {
            if ltable.cell(l_row, attrs.l_join).is_none() {
                continue;
            }
            let mut row = output_row(ltable, rtable, l_row, r_row, attrs);
            if scored {
                row.push(Value::Null);
            }
            rows.push(row);
        }
    }

    rows
}

/// Number pair rows 0.. and prepend the id as the first cell.
pub(crate) fn assign_ids(rows: &mut [Vec<Value>]) {
    for (id, row) in rows.iter_mut().enumerate() {
        row.insert(0, Value::from(id as u64));
    }
}
