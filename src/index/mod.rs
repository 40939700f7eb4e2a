// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction: the structures candidate generation probes.
//!
//! Three index types, one per join strategy:
//! - **Prefix index**: token -> record postings restricted to each record's
//!   filter prefix (edit-distance and set-similarity candidate generation)
//! - **Position index**: prefix postings carrying occurrence positions, for
//!   positional filters
//! - **Hash index**: exact value lookup for equality joins

mod hash;
mod position;
mod prefix;

pub use hash::*;
pub use position::*;
pub use prefix::*;
