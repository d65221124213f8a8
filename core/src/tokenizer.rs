use crate::error::{Error, Result};
use crate::lemma::{lemmatize, tag};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

pub type Token = String;

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r"[\p{P}\p{S}]").expect("valid regex");
}

/// English stopwords used when no stopword file is supplied.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
];

/// Punctuation that ends a clause; the tagger does not look back across it.
const CLAUSE_END: &[char] = &['.', ';', ':', '!', '?'];

fn lowercase(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// NFKC-normalize, lowercase and remove punctuation without inserting spaces.
fn fold(text: &str) -> String {
    PUNCT.replace_all(&lowercase(text), "").into_owned()
}

/// Text normalization pipeline shared by indexing and querying.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Normalizer {
    /// Stopword entries go through the same folding as text, so `don't` matches `dont`.
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords
            .into_iter()
            .map(|w| fold(w.as_ref()).trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { stopwords }
    }

    pub fn english() -> Self {
        Self::new(ENGLISH_STOPWORDS.iter().copied())
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Lowercase, strip punctuation, split, tag, drop stopwords and lemmatize.
    /// Order and duplicates are preserved.
    ///
    /// Punctuation never contains whitespace, so stripping each whitespace-separated
    /// word yields the same words as stripping first; splitting first lets the tagger
    /// see clause ends such as the field separator.
    pub fn normalize(&self, text: &str) -> Vec<Token> {
        let lowered = lowercase(text);
        let mut tokens = Vec::new();
        let mut previous: Option<String> = None;
        for raw in lowered.split_whitespace() {
            let ends_clause = raw.ends_with(CLAUSE_END);
            let word = PUNCT.replace_all(raw, "");
            if word.is_empty() {
                if ends_clause {
                    previous = None;
                }
                continue;
            }
            let pos = tag(previous.as_deref(), &word);
            previous = if ends_clause { None } else { Some(word.to_string()) };
            if self.is_stopword(&word) {
                continue;
            }
            let lemma = lemmatize(&word, pos);
            if !lemma.is_empty() {
                tokens.push(lemma);
            }
        }
        tokens
    }

    /// Normalize a caller-supplied term that must map to exactly one token.
    pub fn single_token(&self, term: &str) -> Result<Token> {
        let mut tokens = self.normalize(term);
        if tokens.len() != 1 {
            return Err(Error::InvalidTerm { term: term.to_string(), tokens: tokens.len() });
        }
        Ok(tokens.remove(0))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}
