//! Part-of-speech tagging and lemmatization.
//!
//! The tagger is a small rule set over suffixes and the preceding word; the lemmatizer
//! maps irregular forms through per-tag exception tables and then reduces the base form
//! with the Snowball English stemmer. Both are deterministic, so the same word in the
//! same context always yields the same token.

use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

const ADVERB_SUFFIXES: &[&str] = &["ly"];
const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "ical", "less"];
const VERB_SUFFIXES: &[&str] = &["ing", "ed", "ize", "ise", "ify"];

lazy_static! {
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref DETERMINERS: HashSet<&'static str> = [
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its",
        "our", "their", "each", "every", "some", "any", "no",
    ]
    .into_iter()
    .collect();
    static ref VERB_MARKERS: HashSet<&'static str> = [
        "to", "will", "would", "can", "could", "should", "shall", "may", "might", "must", "do",
        "does", "did", "dont", "doesnt", "didnt", "cant", "wont",
    ]
    .into_iter()
    .collect();
    static ref NOUN_EXCEPTIONS: HashMap<&'static str, &'static str> = [
        ("children", "child"), ("men", "man"), ("women", "woman"), ("people", "person"),
        ("feet", "foot"), ("teeth", "tooth"), ("mice", "mouse"), ("geese", "goose"),
        ("diagnoses", "diagnosis"), ("prognoses", "prognosis"), ("analyses", "analysis"),
        ("crises", "crisis"), ("criteria", "criterion"), ("phenomena", "phenomenon"),
        ("indices", "index"), ("vertebrae", "vertebra"), ("bacteria", "bacterium"),
        ("nuclei", "nucleus"), ("fungi", "fungus"), ("stimuli", "stimulus"),
    ]
    .into_iter()
    .collect();
    static ref VERB_EXCEPTIONS: HashMap<&'static str, &'static str> = [
        ("ran", "run"), ("went", "go"), ("gone", "go"), ("saw", "see"), ("seen", "see"),
        ("took", "take"), ("taken", "take"), ("made", "make"), ("gave", "give"),
        ("given", "give"), ("knew", "know"), ("known", "know"), ("wrote", "write"),
        ("written", "write"), ("taught", "teach"), ("thought", "think"), ("brought", "bring"),
        ("found", "find"), ("began", "begin"), ("begun", "begin"), ("led", "lead"),
        ("held", "hold"), ("kept", "keep"), ("felt", "feel"), ("spoke", "speak"),
        ("spoken", "speak"), ("chose", "choose"), ("chosen", "choose"), ("grew", "grow"),
        ("grown", "grow"), ("built", "build"), ("spent", "spend"), ("became", "become"),
        ("left", "leave"), ("met", "meet"), ("sought", "seek"), ("bled", "bleed"),
        ("broke", "break"), ("broken", "break"),
    ]
    .into_iter()
    .collect();
    static ref ADJECTIVE_EXCEPTIONS: HashMap<&'static str, &'static str> = [
        ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
        ("farther", "far"), ("farthest", "far"), ("elder", "old"), ("eldest", "old"),
    ]
    .into_iter()
    .collect();
}

fn has_suffix(word: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| word.len() > s.len() + 2 && word.ends_with(s))
}

/// Tag `word` using its suffix and the word that preceded it, defaulting to a noun.
pub fn tag(previous: Option<&str>, word: &str) -> PartOfSpeech {
    if previous.is_some_and(|p| VERB_MARKERS.contains(p)) {
        return PartOfSpeech::Verb;
    }
    if has_suffix(word, ADVERB_SUFFIXES) {
        return PartOfSpeech::Adverb;
    }
    if has_suffix(word, ADJECTIVE_SUFFIXES) || ADJECTIVE_EXCEPTIONS.contains_key(word) {
        return PartOfSpeech::Adjective;
    }
    if previous.is_some_and(|p| DETERMINERS.contains(p)) {
        return PartOfSpeech::Noun;
    }
    if has_suffix(word, VERB_SUFFIXES) || VERB_EXCEPTIONS.contains_key(word) {
        return PartOfSpeech::Verb;
    }
    PartOfSpeech::Noun
}

fn exception(pos: PartOfSpeech, word: &str) -> Option<&'static str> {
    match pos {
        PartOfSpeech::Noun => NOUN_EXCEPTIONS.get(word).copied(),
        PartOfSpeech::Verb => VERB_EXCEPTIONS.get(word).copied(),
        PartOfSpeech::Adjective => ADJECTIVE_EXCEPTIONS.get(word).copied(),
        PartOfSpeech::Adverb => None,
    }
}

/// Reduce `word` to its base form for the given part of speech.
pub fn lemmatize(word: &str, pos: PartOfSpeech) -> String {
    let base = exception(pos, word).unwrap_or(word);
    STEMMER.stem(base).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_from_context_and_suffix() {
        assert_eq!(tag(Some("to"), "treat"), PartOfSpeech::Verb);
        assert_eq!(tag(Some("the"), "left"), PartOfSpeech::Noun);
        assert_eq!(tag(None, "quickly"), PartOfSpeech::Adverb);
        assert_eq!(tag(None, "famous"), PartOfSpeech::Adjective);
        assert_eq!(tag(None, "treating"), PartOfSpeech::Verb);
        assert_eq!(tag(None, "heart"), PartOfSpeech::Noun);
    }

    #[test]
    fn irregular_forms_follow_the_tag() {
        assert_eq!(lemmatize("children", PartOfSpeech::Noun), lemmatize("child", PartOfSpeech::Noun));
        assert_eq!(lemmatize("ran", PartOfSpeech::Verb), lemmatize("run", PartOfSpeech::Verb));
        assert_eq!(lemmatize("best", PartOfSpeech::Adjective), lemmatize("good", PartOfSpeech::Adjective));
        // "left" as a noun is not the past tense of "leave"
        assert_ne!(lemmatize("left", PartOfSpeech::Noun), lemmatize("left", PartOfSpeech::Verb));
    }

    #[test]
    fn regular_inflections_share_a_base() {
        assert_eq!(lemmatize("surgeries", PartOfSpeech::Noun), lemmatize("surgery", PartOfSpeech::Noun));
        assert_eq!(lemmatize("treated", PartOfSpeech::Verb), lemmatize("treat", PartOfSpeech::Verb));
    }
}
