//! Unit tests for individual components.

mod common;

#[path = "unit/tokenize.rs"]
mod tokenize;

#[path = "unit/ordering.rs"]
mod ordering;

#[path = "unit/indexes.rs"]
mod indexes;
