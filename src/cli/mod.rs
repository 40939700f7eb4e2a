// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the simjoin command-line interface.
//!
//! Four subcommands: `join-ed` and `join-exact` run table joins and write
//! the pair table as JSON, `index` builds a prefix index from one table
//! and saves its state to disk, and `inspect` examines a saved state file.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "simjoin",
    about = "Prefix-filtered similarity joins for tabular string data",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join two JSON tables on edit distance between join attributes
    JoinEd {
        /// Left table file (JSON: {"attrs": [...], "rows": [[...]]})
        ltable: String,

        /// Right table file, probed row by row
        rtable: String,

        /// Key attribute of the left table
        #[arg(long)]
        l_key: String,

        /// Key attribute of the right table
        #[arg(long)]
        r_key: String,

        /// Join attribute of the left table
        #[arg(long)]
        l_join: String,

        /// Join attribute of the right table
        #[arg(long)]
        r_join: String,

        /// Maximum edit distance between join attribute values
        #[arg(short, long)]
        threshold: f64,

        /// Comparison against the threshold: "<=" (default) or "<"
        #[arg(long, default_value = "<=")]
        comp_op: String,

        /// Q-gram width for tokenization
        #[arg(short, long, default_value = "2")]
        qval: usize,

        /// Left-table attributes to carry into the output (comma separated)
        #[arg(long, value_delimiter = ',')]
        l_out: Option<Vec<String>>,

        /// Right-table attributes to carry into the output (comma separated)
        #[arg(long, value_delimiter = ',')]
        r_out: Option<Vec<String>>,

        /// Prefix for left-table columns in the output
        #[arg(long, default_value = "l_")]
        l_prefix: String,

        /// Prefix for right-table columns in the output
        #[arg(long, default_value = "r_")]
        r_prefix: String,

        /// Also pair rows whose join attribute is missing with every row of
        /// the other table
        #[arg(long)]
        allow_missing: bool,

        /// Omit the _sim_score column
        #[arg(long)]
        no_sim_score: bool,

        /// Worker count; negative counts down from the machine's CPUs
        #[arg(short = 'j', long, default_value = "1", allow_hyphen_values = true)]
        jobs: i32,

        /// Suppress the progress bar
        #[arg(long)]
        quiet: bool,

        /// Output file for the pair table (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Join two JSON tables on join attribute equality
    JoinExact {
        /// Left table file (JSON: {"attrs": [...], "rows": [[...]]})
        ltable: String,

        /// Right table file, probed row by row
        rtable: String,

        /// Key attribute of the left table
        #[arg(long)]
        l_key: String,

        /// Key attribute of the right table
        #[arg(long)]
        r_key: String,

        /// Join attribute of the left table
        #[arg(long)]
        l_join: String,

        /// Join attribute of the right table
        #[arg(long)]
        r_join: String,

        /// Left-table attributes to carry into the output (comma separated)
        #[arg(long, value_delimiter = ',')]
        l_out: Option<Vec<String>>,

        /// Right-table attributes to carry into the output (comma separated)
        #[arg(long, value_delimiter = ',')]
        r_out: Option<Vec<String>>,

        /// Prefix for left-table columns in the output
        #[arg(long, default_value = "l_")]
        l_prefix: String,

        /// Prefix for right-table columns in the output
        #[arg(long, default_value = "r_")]
        r_prefix: String,

        /// Also pair rows whose join attribute is missing with every row of
        /// the other table
        #[arg(long)]
        allow_missing: bool,

        /// Worker count; negative counts down from the machine's CPUs
        #[arg(short = 'j', long, default_value = "1", allow_hyphen_values = true)]
        jobs: i32,

        /// Suppress the progress bar
        #[arg(long)]
        quiet: bool,

        /// Output file for the pair table (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build a prefix index over one table attribute and save its state
    Index {
        /// Table file (JSON: {"attrs": [...], "rows": [[...]]})
        input: String,

        /// Attribute to tokenize and index
        #[arg(short, long)]
        attr: String,

        /// Q-gram width for tokenization
        #[arg(short, long, default_value = "2")]
        qval: usize,

        /// Edit distance threshold the prefixes are sized for
        #[arg(short, long)]
        threshold: f64,

        /// Output path for the index state file
        #[arg(short, long)]
        output: String,
    },

    /// Inspect an index state file
    Inspect {
        /// Path to the state file written by `index`
        file: String,
    },
}
