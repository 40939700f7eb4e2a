//! Global token ordering over joined inputs.

use simjoin::{QgramTokenizer, TokenId, TokenOrdering, Tokenizer};
use std::collections::BTreeSet;

fn tokens_of(values: &[&str]) -> Vec<Vec<String>> {
    let tok = QgramTokenizer::new(2);
    values.iter().map(|v| tok.tokenize(v)).collect()
}

#[test]
fn ranks_are_dense_over_the_vocabulary() {
    let left = tokens_of(&["wooden table", "wooden chair"]);
    let right = tokens_of(&["steel table"]);
    let ordering = TokenOrdering::for_tables(&[&left, &right]);

    let mut distinct: BTreeSet<&String> = BTreeSet::new();
    for record in left.iter().chain(right.iter()) {
        distinct.extend(record);
    }
    assert_eq!(ordering.len(), distinct.len());

    let mut ranks: Vec<TokenId> = distinct
        .iter()
        .map(|t| ordering.rank(t.as_str()).expect("vocabulary token has a rank"))
        .collect();
    ranks.sort_unstable();
    let expected: Vec<TokenId> = (0..distinct.len() as TokenId).collect();
    assert_eq!(ranks, expected);
}

#[test]
fn shared_grams_rank_after_rare_ones() {
    let left = tokens_of(&["table", "table"]);
    let right = tokens_of(&["table", "chair"]);
    let ordering = TokenOrdering::for_tables(&[&left, &right]);

    // "ta" occurs in three records, "ch" in one, so "ch" ranks lower.
    let table_gram = ordering.rank("ta").unwrap();
    let chair_gram = ordering.rank("ch").unwrap();
    assert!(chair_gram < table_gram);
}

#[test]
fn ordering_is_stable_across_rebuilds() {
    let records = tokens_of(&["red lamp", "blue lamp", "red desk"]);
    let first = TokenOrdering::for_tables(&[&records]);
    let second = TokenOrdering::for_tables(&[&records]);
    for record in &records {
        assert_eq!(first.map(record), second.map(record));
    }
}

#[test]
fn order_output_is_ascending_so_prefixes_are_too() {
    let records = tokens_of(&["vintage mirror", "vintage clock"]);
    let ordering = TokenOrdering::for_tables(&[&records]);
    for record in &records {
        let ordered = ordering.order(record);
        assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
    }
}
