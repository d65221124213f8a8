use crate::error::{Error, Result};
use crate::tokenizer::{Normalizer, Token};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

pub type DocId = u32;

pub type Postings = HashMap<Token, BTreeSet<DocId>>;
pub type TermFrequencies = HashMap<DocId, HashMap<Token, u32>>;
pub type DocLengths = HashMap<DocId, u32>;
pub type DocMap = BTreeMap<DocId, Doctor>;

/// Separator placed between fields of the indexed text.
pub const FIELD_SEPARATOR: &str = ". ";

const POSTING_SHARDS: usize = 16;

/// A doctor profile as it appears in the corpus. Fields beyond the indexed ones are
/// carried through untouched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DocId,
    pub name: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Doctor {
    /// Indexed text: name, specialty, hospital, location, bio joined by [`FIELD_SEPARATOR`].
    pub fn indexed_text(&self) -> String {
        [
            self.name.as_str(),
            self.specialty.as_str(),
            self.hospital.as_deref().unwrap_or(""),
            self.location.as_deref().unwrap_or(""),
            self.bio.as_deref().unwrap_or(""),
        ]
        .join(FIELD_SEPARATOR)
    }
}

/// In-memory inverted index over a doctor corpus.
///
/// Term-frequency tables are the source of truth; postings are derived from them on
/// every build and checked against them on load.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    normalizer: Normalizer,
    postings: Postings,
    term_frequencies: TermFrequencies,
    doc_lengths: DocLengths,
    docs: DocMap,
}

impl InvertedIndex {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer, ..Self::default() }
    }

    /// Reassemble an index from persisted tables, rejecting tables that disagree.
    pub(crate) fn from_tables(
        normalizer: Normalizer,
        postings: Postings,
        term_frequencies: TermFrequencies,
        doc_lengths: DocLengths,
        docs: DocMap,
    ) -> std::result::Result<Self, String> {
        let index = Self { normalizer, postings, term_frequencies, doc_lengths, docs };
        index.check_consistency()?;
        Ok(index)
    }

    /// Replace all state with an index over `documents`.
    pub fn build(&mut self, documents: Vec<Doctor>) -> Result<()> {
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in &documents {
            if !seen.insert(doc.id) {
                return Err(Error::DuplicateDocument(doc.id));
            }
        }

        let normalizer = &self.normalizer;
        let analyzed: Vec<(DocId, HashMap<Token, u32>, u32)> = documents
            .par_iter()
            .map(|doc| {
                let tokens = normalizer.normalize(&doc.indexed_text());
                let length = tokens.len() as u32;
                let mut counts: HashMap<Token, u32> = HashMap::new();
                for token in tokens {
                    *counts.entry(token).or_insert(0) += 1;
                }
                (doc.id, counts, length)
            })
            .collect();

        let mut term_frequencies = TermFrequencies::with_capacity(analyzed.len());
        let mut doc_lengths = DocLengths::with_capacity(analyzed.len());
        for (doc_id, counts, length) in analyzed {
            term_frequencies.insert(doc_id, counts);
            doc_lengths.insert(doc_id, length);
        }

        self.postings = derive_postings(&term_frequencies);
        self.term_frequencies = term_frequencies;
        self.doc_lengths = doc_lengths;
        self.docs = documents.into_iter().map(|d| (d.id, d)).collect();

        tracing::info!(num_docs = self.docs.len(), num_terms = self.postings.len(), "built inverted index");
        Ok(())
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn postings(&self) -> &Postings {
        &self.postings
    }

    pub fn term_frequencies(&self) -> &TermFrequencies {
        &self.term_frequencies
    }

    pub fn doc_lengths(&self) -> &DocLengths {
        &self.doc_lengths
    }

    pub fn documents(&self) -> &DocMap {
        &self.docs
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Doctor> {
        self.docs.get(&doc_id)
    }

    pub fn document_count(&self) -> usize {
        self.docs.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn document_length(&self, doc_id: DocId) -> u32 {
        self.doc_lengths.get(&doc_id).copied().unwrap_or(0)
    }

    /// Documents containing an already-normalized token, ascending.
    pub fn token_postings(&self, token: &str) -> Option<&BTreeSet<DocId>> {
        self.postings.get(token)
    }

    pub fn document_frequency(&self, token: &str) -> usize {
        self.postings.get(token).map_or(0, BTreeSet::len)
    }

    pub fn token_frequency(&self, doc_id: DocId, token: &str) -> u32 {
        self.term_frequencies
            .get(&doc_id)
            .and_then(|counts| counts.get(token))
            .copied()
            .unwrap_or(0)
    }

    /// Ids of documents containing `term`, which must normalize to a single token.
    pub fn documents_containing(&self, term: &str) -> Result<Vec<DocId>> {
        let token = self.normalizer.single_token(term)?;
        Ok(self
            .token_postings(&token)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Occurrences of `term` in `doc_id`; zero for unknown documents or tokens.
    pub fn term_frequency(&self, doc_id: DocId, term: &str) -> Result<u32> {
        let token = self.normalizer.single_token(term)?;
        Ok(self.token_frequency(doc_id, &token))
    }

    pub fn average_document_length(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        let total: u64 = self.doc_lengths.values().map(|&l| u64::from(l)).sum();
        total as f64 / self.doc_lengths.len() as f64
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.doc_lengths.len() != self.docs.len()
            || self.term_frequencies.len() != self.docs.len()
        {
            return Err(format!(
                "table sizes disagree: {} documents, {} lengths, {} frequency tables",
                self.docs.len(),
                self.doc_lengths.len(),
                self.term_frequencies.len()
            ));
        }
        for (doc_id, doc) in &self.docs {
            if doc.id != *doc_id {
                return Err(format!("document keyed {doc_id} carries id {}", doc.id));
            }
            let counts = self
                .term_frequencies
                .get(doc_id)
                .ok_or_else(|| format!("no frequency table for document {doc_id}"))?;
            let length = self
                .doc_lengths
                .get(doc_id)
                .ok_or_else(|| format!("no length for document {doc_id}"))?;
            let sum: u64 = counts.values().map(|&c| u64::from(c)).sum();
            if sum != u64::from(*length) {
                return Err(format!("document {doc_id} has length {length} but {sum} counted tokens"));
            }
        }
        if derive_postings(&self.term_frequencies) != self.postings {
            return Err("postings do not match term frequencies".to_string());
        }
        Ok(())
    }
}

/// Equality over the four persisted tables and the stopwords they were built with.
impl PartialEq for InvertedIndex {
    fn eq(&self, other: &Self) -> bool {
        self.normalizer == other.normalizer
            && self.postings == other.postings
            && self.term_frequencies == other.term_frequencies
            && self.doc_lengths == other.doc_lengths
            && self.docs == other.docs
    }
}

fn shard_of(token: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    (hasher.finish() as usize) % POSTING_SHARDS
}

/// Invert per-document counts into per-token document sets, in parallel over documents
/// with tokens spread across mutex-guarded shards.
fn derive_postings(term_frequencies: &TermFrequencies) -> Postings {
    let shards: Vec<Mutex<Postings>> = (0..POSTING_SHARDS).map(|_| Mutex::new(Postings::new())).collect();
    term_frequencies.par_iter().for_each(|(doc_id, counts)| {
        for (token, &count) in counts {
            if count == 0 {
                continue;
            }
            shards[shard_of(token)]
                .lock()
                .entry(token.clone())
                .or_default()
                .insert(*doc_id);
        }
    });
    shards.into_iter().flat_map(|shard| shard.into_inner()).collect()
}
