pub mod corpus;
pub mod error;
pub mod index;
pub mod lemma;
pub mod persist;
pub mod scoring;
pub mod tokenizer;

pub use error::{Error, Result, Unavailable};
pub use index::{DocId, Doctor, InvertedIndex};
pub use scoring::{Bm25Params, SearchHit};
pub use tokenizer::{Normalizer, Token};
