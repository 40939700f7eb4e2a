//! Tokenizer behavior through the public API.

use simjoin::{QgramTokenizer, Tokenizer, WhitespaceTokenizer};

#[test]
fn default_qgram_tokenizer_is_padded_bigrams() {
    let tok = QgramTokenizer::default();
    assert_eq!(tok.qval(), 2);
    assert_eq!(tok.tokenize("hi"), vec!["#h", "hi", "i$"]);
}

#[test]
fn unigram_tokenizer_needs_no_padding() {
    let tok = QgramTokenizer::new(1);
    assert_eq!(tok.tokenize("abc"), vec!["a", "b", "c"]);
    assert_eq!(tok.tokenize(""), Vec::<String>::new());
}

#[test]
fn tokenizers_compose_behind_the_trait() {
    let tokenizers: Vec<Box<dyn Tokenizer>> = vec![
        Box::new(QgramTokenizer::new(2)),
        Box::new(WhitespaceTokenizer::new()),
    ];
    let outputs: Vec<Vec<String>> = tokenizers.iter().map(|t| t.tokenize("ab cd")).collect();
    // Padded bigram count is chars + 1; the word tokenizer sees two words.
    assert_eq!(outputs[0].len(), 6);
    assert_eq!(outputs[1], vec!["ab", "cd"]);
}

#[test]
fn whitespace_tokenizer_splits_all_whitespace_runs() {
    let tok = WhitespaceTokenizer::new();
    assert_eq!(
        tok.tokenize("  red\t\toak   table\n"),
        vec!["red", "oak", "table"]
    );
}

#[test]
fn whitespace_set_flag_keeps_first_occurrence() {
    let tok = WhitespaceTokenizer::new().return_set(true);
    assert_eq!(
        tok.tokenize("to be or not to be"),
        vec!["to", "be", "or", "not"]
    );
}

#[test]
fn unpadded_gram_count_follows_window_formula() {
    let tok = QgramTokenizer::new(3).padding(false);
    for s in ["abc", "abcd", "abcdefg"] {
        assert_eq!(tok.tokenize(s).len(), s.chars().count() - 2, "input: {}", s);
    }
}
