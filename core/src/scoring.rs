//! TF-IDF and BM25 scoring over a read-only [`InvertedIndex`].
//!
//! Every function here takes the index by shared reference and never mutates it, so a
//! loaded index can serve any number of concurrent readers.

use crate::error::Result;
use crate::index::{DocId, InvertedIndex};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// BM25 tuning: `k1` controls term-frequency saturation, `b` length normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
}

/// `ln((N + 1) / (df + 1))`
pub fn idf(index: &InvertedIndex, term: &str) -> Result<f64> {
    let token = index.normalizer().single_token(term)?;
    Ok(token_idf(index, &token))
}

pub fn tf_idf(index: &InvertedIndex, doc_id: DocId, term: &str) -> Result<f64> {
    let token = index.normalizer().single_token(term)?;
    Ok(f64::from(index.token_frequency(doc_id, &token)) * token_idf(index, &token))
}

/// `ln((N - df + 0.5) / (df + 0.5) + 1)`
pub fn bm25_idf(index: &InvertedIndex, term: &str) -> Result<f64> {
    let token = index.normalizer().single_token(term)?;
    Ok(token_bm25_idf(index, &token))
}

pub fn bm25_tf(index: &InvertedIndex, doc_id: DocId, term: &str, params: Bm25Params) -> Result<f64> {
    let token = index.normalizer().single_token(term)?;
    Ok(token_bm25_tf(index, doc_id, &token, index.average_document_length(), params))
}

pub fn bm25(index: &InvertedIndex, doc_id: DocId, term: &str, params: Bm25Params) -> Result<f64> {
    let token = index.normalizer().single_token(term)?;
    let bm25_idf = token_bm25_idf(index, &token);
    Ok(token_bm25_tf(index, doc_id, &token, index.average_document_length(), params) * bm25_idf)
}

fn token_idf(index: &InvertedIndex, token: &str) -> f64 {
    let n = index.document_count() as f64;
    let df = index.document_frequency(token) as f64;
    ((n + 1.0) / (df + 1.0)).ln()
}

fn token_bm25_idf(index: &InvertedIndex, token: &str) -> f64 {
    let n = index.document_count() as f64;
    let df = index.document_frequency(token) as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

fn token_bm25_tf(index: &InvertedIndex, doc_id: DocId, token: &str, avg_doc_length: f64, params: Bm25Params) -> f64 {
    let tf = index.token_frequency(doc_id, token);
    saturate(tf, index.document_length(doc_id), avg_doc_length, params)
}

/// Length-normalized, saturating term frequency.
pub fn saturate(tf: u32, doc_length: u32, avg_doc_length: f64, params: Bm25Params) -> f64 {
    if tf == 0 {
        return 0.0;
    }
    let ratio = if avg_doc_length > 0.0 { f64::from(doc_length) / avg_doc_length } else { 0.0 };
    let length_norm = (1.0 - params.b) + params.b * ratio;
    let tf = f64::from(tf);
    (tf * (params.k1 + 1.0)) / (tf + params.k1 * length_norm)
}

/// Rank documents for `query` by summed BM25 over its tokens.
///
/// Repeated query tokens are scored again. Only documents containing at least one
/// query token are returned, best first, ties broken by ascending id.
pub fn search(index: &InvertedIndex, query: &str, limit: usize, params: Bm25Params) -> Vec<SearchHit> {
    if limit == 0 {
        return Vec::new();
    }
    let tokens = index.normalizer().normalize(query);
    let avg_doc_length = index.average_document_length();

    let contributions: Vec<Vec<(DocId, f64)>> = tokens
        .par_iter()
        .map(|token| match index.token_postings(token) {
            Some(ids) => {
                let bm25_idf = token_bm25_idf(index, token);
                ids.iter()
                    .map(|&doc_id| (doc_id, token_bm25_tf(index, doc_id, token, avg_doc_length, params) * bm25_idf))
                    .collect::<Vec<_>>()
            }
            None => Vec::new(),
        })
        .collect();

    // summed in query order so totals do not depend on scheduling
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for (doc_id, score) in contributions.into_iter().flatten() {
        *scores.entry(doc_id).or_insert(0.0) += score;
    }

    let mut ranked: Vec<SearchHit> = scores
        .into_iter()
        .map(|(doc_id, score)| SearchHit { doc_id, score })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    ranked.truncate(limit);
    ranked
}
