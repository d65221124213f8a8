mod common;

use common::{built_index, doctor, A, B, C};
use search_core::scoring::{self, bm25_idf, bm25_tf, idf, search, tf_idf};
use search_core::{Bm25Params, Error, InvertedIndex, Normalizer};

const EPS: f64 = 1e-9;

#[test]
fn document_lengths_match_scenario() {
    let index = built_index();
    assert_eq!(index.document_length(A), 10);
    assert_eq!(index.document_length(B), 5);
    assert_eq!(index.document_length(C), 5);
    assert!((index.average_document_length() - 20.0 / 3.0).abs() < EPS);
}

#[test]
fn documents_containing_is_sorted() {
    let index = built_index();
    assert_eq!(index.documents_containing("heart").unwrap(), vec![A, B]);
    assert_eq!(index.documents_containing("Hearts").unwrap(), vec![A, B]);
    assert!(index.documents_containing("lungs").unwrap().is_empty());
}

#[test]
fn term_frequency_counts_and_absences() {
    let index = built_index();
    assert_eq!(index.term_frequency(A, "heart").unwrap(), 3);
    assert_eq!(index.term_frequency(B, "heart").unwrap(), 1);
    assert_eq!(index.term_frequency(C, "heart").unwrap(), 0);
    assert_eq!(index.term_frequency(99, "heart").unwrap(), 0);
    assert_eq!(index.term_frequency(A, "lungs").unwrap(), 0);
}

#[test]
fn absent_tokens_have_zero_frequency_everywhere() {
    let index = built_index();
    for (token, ids) in index.postings() {
        for doc_id in index.documents().keys() {
            let tf = index.token_frequency(*doc_id, token);
            assert_eq!(tf > 0, ids.contains(doc_id), "token {token} doc {doc_id}");
        }
    }
}

#[test]
fn multi_token_and_empty_terms_are_rejected() {
    let index = built_index();
    assert!(matches!(
        index.term_frequency(A, "heart disease"),
        Err(Error::InvalidTerm { tokens: 2, .. })
    ));
    assert!(matches!(idf(&index, ""), Err(Error::InvalidTerm { tokens: 0, .. })));
    assert!(matches!(bm25_idf(&index, "the"), Err(Error::InvalidTerm { .. })));
}

#[test]
fn classic_idf_values() {
    let index = built_index();
    assert!((idf(&index, "heart").unwrap() - (4.0f64 / 3.0).ln()).abs() < EPS);
    assert!((idf(&index, "lungs").unwrap() - 4.0f64.ln()).abs() < EPS);
    for term in ["heart", "clinic", "skin", "cardiology", "scan", "lungs"] {
        assert!(idf(&index, term).unwrap() >= 0.0);
    }
}

#[test]
fn tf_idf_multiplies() {
    let index = built_index();
    let expected = 3.0 * (4.0f64 / 3.0).ln();
    assert!((tf_idf(&index, A, "heart").unwrap() - expected).abs() < EPS);
    assert_eq!(tf_idf(&index, C, "heart").unwrap(), 0.0);
}

#[test]
fn bm25_idf_formula() {
    let index = built_index();
    let expected = ((3.0 - 2.0 + 0.5) / (2.0 + 0.5) + 1.0f64).ln();
    assert!((bm25_idf(&index, "heart").unwrap() - expected).abs() < EPS);
    let unseen = ((3.0 + 0.5) / 0.5 + 1.0f64).ln();
    assert!((bm25_idf(&index, "lungs").unwrap() - unseen).abs() < EPS);
}

#[test]
fn bm25_tf_uses_length_normalization() {
    let index = built_index();
    let params = Bm25Params::default();
    let avg = 20.0 / 3.0;
    let norm_a = 0.25 + 0.75 * (10.0 / avg);
    let expected_a = (3.0 * 2.5) / (3.0 + 1.5 * norm_a);
    assert!((bm25_tf(&index, A, "heart", params).unwrap() - expected_a).abs() < EPS);
    assert_eq!(bm25_tf(&index, C, "heart", params).unwrap(), 0.0);

    let flat = Bm25Params { k1: 1.5, b: 0.0 };
    let expected_flat = (1.0 * 2.5) / (1.0 + 1.5);
    assert!((bm25_tf(&index, B, "heart", flat).unwrap() - expected_flat).abs() < EPS);
}

#[test]
fn combined_bm25_is_product() {
    let index = built_index();
    let params = Bm25Params::default();
    let product = bm25_tf(&index, A, "heart", params).unwrap() * bm25_idf(&index, "heart").unwrap();
    assert!((scoring::bm25(&index, A, "heart", params).unwrap() - product).abs() < EPS);
}

#[test]
fn search_ranks_higher_frequency_first() {
    let index = built_index();
    let hits = search(&index, "heart surgery", 2, Bm25Params::default());
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc_id, A);
    assert_eq!(hits[1].doc_id, B);
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn search_limits_and_excludes_unmatched() {
    let index = built_index();
    assert!(search(&index, "heart", 0, Bm25Params::default()).is_empty());
    assert_eq!(search(&index, "heart", 1, Bm25Params::default()).len(), 1);
    let hits = search(&index, "heart", 10, Bm25Params::default());
    assert!(hits.iter().all(|h| h.doc_id != C));
    assert!(search(&index, "lungs", 10, Bm25Params::default()).is_empty());
    assert!(search(&index, "", 10, Bm25Params::default()).is_empty());
}

#[test]
fn repeated_query_tokens_accumulate() {
    let index = built_index();
    let once = search(&index, "heart", 5, Bm25Params::default());
    let twice = search(&index, "heart heart", 5, Bm25Params::default());
    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.doc_id, b.doc_id);
        assert!((b.score - 2.0 * a.score).abs() < EPS);
    }
}

#[test]
fn ties_break_by_ascending_id() {
    let mut index = InvertedIndex::new(Normalizer::english());
    index
        .build(vec![
            doctor(9, "Eve Hart", "Cardiology", "heart"),
            doctor(4, "Eve Hart", "Cardiology", "heart"),
            doctor(6, "Max Pole", "Radiology", "scan"),
        ])
        .unwrap();
    let hits = search(&index, "cardiology heart", 5, Bm25Params::default());
    assert_eq!(hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), vec![4, 9]);
    assert_eq!(hits[0].score, hits[1].score);
}

#[test]
fn search_output_is_sorted() {
    let index = built_index();
    let hits = search(&index, "heart clinic scan skin", 10, Bm25Params::default());
    for pair in hits.windows(2) {
        assert!(pair[0].score > pair[1].score || (pair[0].score == pair[1].score && pair[0].doc_id < pair[1].doc_id));
    }
}
