//! Index construction through the public API.

use super::common::assert_prefix_index_well_formed;
use simjoin::{
    HashIndex, PositionIndex, PrefixIndex, QgramTokenizer, RecordId, SimMeasure, TokenId,
    TokenOrdering, Tokenizer,
};
use std::collections::{BTreeMap, BTreeSet};

fn ordered_sequences(values: &[&str], qval: usize) -> Vec<Vec<TokenId>> {
    let tok = QgramTokenizer::new(qval);
    let tokens: Vec<Vec<String>> = values.iter().map(|v| tok.tokenize(v)).collect();
    let ordering = TokenOrdering::for_tables(&[&tokens]);
    tokens.iter().map(|t| ordering.order(t)).collect()
}

#[test]
fn built_prefix_index_satisfies_every_invariant() {
    let sequences = ordered_sequences(
        &[
            "vintage oak table",
            "vintage oak tables",
            "steel desk",
            "folding chair",
            "",
        ],
        2,
    );
    let mut index = PrefixIndex::new();
    index.build(&sequences, 2, 2.0);

    assert_prefix_index_well_formed(&index);
    assert_eq!(index.num_records(), 5);
    assert_eq!(index.size_of(4), Some(0));
}

#[test]
fn from_parts_round_trips_accessors() {
    let mut postings: BTreeMap<TokenId, Vec<RecordId>> = BTreeMap::new();
    postings.insert(3, vec![0, 2]);
    postings.insert(7, vec![1]);
    let sizes = vec![4, 2, 6];

    let index = PrefixIndex::from_parts(postings.clone(), sizes.clone());
    assert_eq!(index.postings(), &postings);
    assert_eq!(index.sizes(), sizes.as_slice());
    assert_eq!(index.probe(3), &[0, 2]);
    assert_eq!(index.probe(99), &[] as &[RecordId]);
}

#[test]
fn position_index_prefix_agrees_with_measure() {
    let sequences = ordered_sequences(&["mozzarella", "mortadella", "rico"], 2);
    let measure = SimMeasure::EditDistance { qval: 2 };
    let mut index = PositionIndex::new();
    index.build(&sequences, measure, 1.0);

    // Each record contributes exactly prefix_length(m, 1.0) postings entries.
    let vocabulary: BTreeSet<TokenId> = sequences.iter().flatten().copied().collect();
    for (record, sequence) in sequences.iter().enumerate() {
        let expected = measure.prefix_length(sequence.len(), 1.0);
        let contributed: usize = vocabulary
            .iter()
            .map(|&token| {
                index
                    .probe(token)
                    .iter()
                    .filter(|(r, _)| *r == record as RecordId)
                    .count()
            })
            .sum();
        assert_eq!(contributed, expected, "record {}", record);
    }
}

#[test]
fn position_index_tracks_length_stats() {
    let sequences = vec![vec![1, 2, 3], vec![], vec![4, 5]];
    let mut index = PositionIndex::new();
    index.build(&sequences, SimMeasure::Jaccard, 0.5);

    assert_eq!(index.num_records(), 3);
    assert_eq!(index.min_length(), 2);
    assert_eq!(index.max_length(), 3);
    assert_eq!(index.empty_records(), &[1]);
    assert_eq!(index.size_of(1), Some(0));
}

#[test]
fn hash_index_groups_equal_strings_in_row_order() {
    let values = vec![
        "lamp".to_string(),
        "desk".to_string(),
        "lamp".to_string(),
        "Lamp".to_string(),
    ];
    let mut index = HashIndex::new();
    index.build(&values);

    assert_eq!(index.probe("lamp"), &[0, 2]);
    assert_eq!(index.probe("Lamp"), &[3]);
    assert_eq!(index.probe("bench"), &[] as &[RecordId]);
}
