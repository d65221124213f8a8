use crate::DocId;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a persisted index could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// Nothing has been saved yet, or a save was interrupted before its commit marker.
    Missing,
    /// Files exist but do not decode or do not agree with each other.
    Corrupt,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Missing => f.write_str("missing"),
            Unavailable::Corrupt => f.write_str("corrupt"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus unavailable at {}: {reason}", .path.display())]
    CorpusUnavailable { path: PathBuf, reason: String },

    #[error("invalid term {term:?}: expected exactly one token, got {tokens}")]
    InvalidTerm { term: String, tokens: usize },

    #[error("index {kind} at {}: {reason}", .path.display())]
    IndexUnavailable {
        path: PathBuf,
        kind: Unavailable,
        reason: String,
    },

    #[error("duplicate document id {0} in corpus")]
    DuplicateDocument(DocId),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn missing_index(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::IndexUnavailable { path: path.into(), kind: Unavailable::Missing, reason: reason.into() }
    }

    pub(crate) fn corrupt_index(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::IndexUnavailable { path: path.into(), kind: Unavailable::Corrupt, reason: reason.to_string() }
    }
}
