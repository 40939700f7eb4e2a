//! Prefix-filtered similarity joins over tables of strings.
//!
//! This crate finds pairs of records whose join attributes are similar,
//! without comparing every record against every other. Candidate pairs are
//! generated from a prefix inverted index and then verified with an exact
//! measure such as edit distance.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  tokenize/   │────▶│ ordering.rs  │────▶│    index/    │
//! │  (q-grams,   │     │ (rank tokens │     │ (PrefixIndex,│
//! │   words)     │     │  by freq)    │     │PositionIndex)│
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        │                    │                     │
//!        ▼                    ▼                     ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                         join/                           │
//! │   (edit_distance_join, exact_join - candidate           │
//! │    generation, verification, output assembly)           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The pigeonhole argument behind the prefix filter: order every record's
//! tokens by a single global ranking, keep only a short prefix of each, and
//! two records within the similarity threshold must share at least one
//! prefix token. Probing the prefix index therefore yields a candidate set
//! that contains every qualifying pair.
//!
//! # Usage
//!
//! ```ignore
//! use simjoin::{edit_distance_join, CompOp, JoinParams, QgramTokenizer, Table};
//!
//! let left = Table::new(vec!["id".into(), "name".into()], left_rows);
//! let right = Table::new(vec!["id".into(), "name".into()], right_rows);
//!
//! let params = JoinParams::new("id", "id", "name", "name");
//! let tokenizer = QgramTokenizer::new(2);
//! let pairs = edit_distance_join(&left, &right, 1.0, CompOp::Le, &tokenizer, &params)?;
//! ```

// Module declarations
mod distance;
pub mod index;
pub mod join;
pub mod measures;
pub mod ordering;
pub mod state;
pub mod tokenize;
pub mod types;
pub mod verify;

// Re-exports for public API
pub use distance::edit_distance_within;
pub use index::{HashIndex, PositionIndex, PrefixIndex};
pub use join::{edit_distance_join, exact_join, JoinOutput, JoinParams};
pub use measures::SimMeasure;
pub use ordering::TokenOrdering;
pub use state::{load_index_file, save_index_file, IndexFile, STATE_VERSION};
pub use tokenize::{QgramTokenizer, Tokenizer, WhitespaceTokenizer};
pub use types::{CompOp, RecordId, Table, TokenId};
pub use verify::{check_prefix_index, InvariantError};
