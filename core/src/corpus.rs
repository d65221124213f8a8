//! Corpus and stopword providers backed by files in the data directory.

use crate::error::{Error, Result};
use crate::index::Doctor;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::Path;

pub const DOCTORS_FILE: &str = "doctors.json";
pub const STOPWORDS_FILE: &str = "stopwords.txt";

/// Load the doctor records from a JSON array, in file order.
pub fn load_doctors(path: &Path) -> Result<Vec<Doctor>> {
    let f = File::open(path).map_err(|e| Error::CorpusUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let doctors: Vec<Doctor> = serde_json::from_reader(BufReader::new(f)).map_err(|e| Error::CorpusUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), num_docs = doctors.len(), "loaded corpus");
    Ok(doctors)
}

/// One stopword per line; blank lines are skipped.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Like [`load_stopwords`], but `None` when the file does not exist.
pub fn load_stopwords_if_present(path: &Path) -> Result<Option<HashSet<String>>> {
    match load_stopwords(path) {
        Ok(words) => Ok(Some(words)),
        Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
