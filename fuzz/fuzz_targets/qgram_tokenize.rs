// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the tokenizers.
//!
//! Feeds arbitrary (possibly invalid) UTF-8 through the q-gram and
//! whitespace tokenizers. Token counts and gram widths must follow the
//! window arithmetic for every input, including empty strings, lone
//! combining marks, and multi-byte codepoints at the window edges.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simjoin::{QgramTokenizer, Tokenizer, WhitespaceTokenizer};

/// Fuzz input for tokenization
#[derive(Debug, Arbitrary)]
struct TokenizeInput {
    /// Raw text bytes, lossily converted to UTF-8
    text_bytes: Vec<u8>,
    /// Gram length, taken modulo a small range
    qval: usize,
}

fuzz_target!(|input: TokenizeInput| {
    let text = String::from_utf8_lossy(&input.text_bytes);
    let text = text.chars().take(200).collect::<String>();
    let qval = input.qval % 8;

    let bag_tokenizer = QgramTokenizer::new(qval);
    let grams = bag_tokenizer.tokenize(&text);
    let num_chars = text.chars().count();

    if qval == 0 {
        // INVARIANT 1: A zero gram length yields nothing
        assert!(grams.is_empty(), "qval 0 produced {} grams", grams.len());
        return;
    }

    // INVARIANT 2: Padded gram count is chars + qval - 1
    assert_eq!(
        grams.len(),
        num_chars + qval - 1,
        "{} chars at qval {} produced {} grams",
        num_chars,
        qval,
        grams.len()
    );

    // INVARIANT 3: Every gram is exactly qval characters
    for gram in &grams {
        assert_eq!(
            gram.chars().count(),
            qval,
            "gram {:?} is not {} characters",
            gram,
            qval
        );
    }

    // INVARIANT 4: Unpadded grams are substrings of the input
    let unpadded = QgramTokenizer::new(qval).padding(false).tokenize(&text);
    for gram in &unpadded {
        assert!(
            text.contains(gram.as_str()),
            "unpadded gram {:?} not found in input",
            gram
        );
    }

    // INVARIANT 5: Set mode keeps first occurrences of the bag, deduplicated
    let set_grams = QgramTokenizer::new(qval).return_set(true).tokenize(&text);
    let mut seen = std::collections::BTreeSet::new();
    let mut expected = Vec::new();
    for gram in &grams {
        if seen.insert(gram.clone()) {
            expected.push(gram.clone());
        }
    }
    assert_eq!(set_grams, expected, "set mode diverged from deduplicated bag");

    // INVARIANT 6: Whitespace tokens carry no whitespace and rejoin to the
    // non-whitespace portion of the input
    let words = WhitespaceTokenizer::new().tokenize(&text);
    for word in &words {
        assert!(!word.is_empty(), "empty whitespace token");
        assert!(
            !word.chars().any(char::is_whitespace),
            "token {:?} contains whitespace",
            word
        );
    }
    let rejoined: String = words.concat();
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(rejoined, stripped, "whitespace tokens lost characters");
});
