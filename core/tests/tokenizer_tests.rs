use search_core::tokenizer::Normalizer;

#[test]
fn it_normalizes_and_lemmatizes() {
    let words = Normalizer::english().normalize("Running Runners RUN! The surgeon's surgeries.");
    assert!(words.contains(&"run".to_string()));
    assert_eq!(words.iter().filter(|w| *w == "run").count(), 2);
    let surgery = Normalizer::english().single_token("surgery").unwrap();
    assert!(words.contains(&surgery));
}

#[test]
fn it_filters_stopwords() {
    let words = Normalizer::english().normalize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn it_keeps_order_and_duplicates() {
    let n = Normalizer::new(["of"]);
    let words = n.normalize("heart of heart, HEART");
    assert_eq!(words, vec!["heart", "heart", "heart"]);
}

#[test]
fn empty_and_punctuation_only_input_yield_nothing() {
    let n = Normalizer::english();
    assert!(n.normalize("").is_empty());
    assert!(n.normalize("  ... !!! --- ").is_empty());
}

#[test]
fn custom_stopwords_replace_builtin_list() {
    let n = Normalizer::new(["doctor"]);
    assert!(n.normalize("doctor").is_empty());
    assert_eq!(n.normalize("the").len(), 1);
}
