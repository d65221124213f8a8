use crate::error::{Error, Result};
use crate::index::{DocLengths, DocMap, InvertedIndex, Postings, TermFrequencies};
use crate::tokenizer::Normalizer;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 2;

/// Commit marker written after all four tables are in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
    /// Stopwords the index was built with; queries must normalize with the same set.
    pub stopwords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    pub fn docs(&self) -> PathBuf { self.root.join("docs.json") }
    pub fn term_frequencies(&self) -> PathBuf { self.root.join("term_frequencies.bin") }
    pub fn doc_lengths(&self) -> PathBuf { self.root.join("doc_lengths.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` beside `path`, flush to disk, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    let mut f = File::create(&tmp)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote table");
    Ok(())
}

fn encode_bin<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| Error::Io(io::Error::new(ErrorKind::InvalidData, e)))
}

fn encode_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| Error::Io(io::Error::new(ErrorKind::InvalidData, e)))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::missing_index(path, "file not found"));
        }
        Err(e) => return Err(e.into()),
    };
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    tracing::debug!(path = %path.display(), bytes = buf.len(), "read table");
    Ok(buf)
}

fn load_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let buf = read_file(path)?;
    bincode::deserialize(&buf).map_err(|e| Error::corrupt_index(path, e))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let buf = read_file(path)?;
    serde_json::from_slice(&buf).map_err(|e| Error::corrupt_index(path, e))
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    load_json(&paths.meta())
}

/// Persist all four tables as one unit.
///
/// The previous marker is removed before any table is replaced, so a save that stops
/// halfway leaves an index that loads as missing rather than one that mixes builds.
pub fn save(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    match fs::remove_file(paths.meta()) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    write_atomic(&paths.postings(), &encode_bin(index.postings())?)?;
    write_atomic(&paths.docs(), &encode_json(index.documents())?)?;
    write_atomic(&paths.term_frequencies(), &encode_bin(index.term_frequencies())?)?;
    write_atomic(&paths.doc_lengths(), &encode_bin(index.doc_lengths())?)?;

    let mut stopwords: Vec<String> = index.normalizer().stopwords().iter().cloned().collect();
    stopwords.sort();
    let meta = MetaFile {
        num_docs: index.document_count() as u32,
        num_terms: index.term_count() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: FORMAT_VERSION,
        stopwords,
    };
    write_atomic(&paths.meta(), &encode_json(&meta)?)?;

    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "saved index");
    Ok(())
}

/// Read back an index saved by [`save`]. Nothing partial is ever returned.
///
/// The normalizer is rebuilt from the stopwords recorded at build time, so terms are
/// looked up exactly as the indexed text was tokenized.
pub fn load(paths: &IndexPaths) -> Result<InvertedIndex> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        return Err(Error::corrupt_index(
            paths.meta(),
            format!("unsupported format version {}", meta.version),
        ));
    }

    let postings: Postings = load_bin(&paths.postings())?;
    let docs: DocMap = load_json(&paths.docs())?;
    let term_frequencies: TermFrequencies = load_bin(&paths.term_frequencies())?;
    let doc_lengths: DocLengths = load_bin(&paths.doc_lengths())?;

    if meta.num_docs as usize != docs.len() || meta.num_terms as usize != postings.len() {
        tracing::warn!(root = %paths.root.display(), "index tables do not match their marker");
        return Err(Error::corrupt_index(
            &paths.root,
            format!(
                "marker records {} documents and {} terms, tables hold {} and {}",
                meta.num_docs,
                meta.num_terms,
                docs.len(),
                postings.len()
            ),
        ));
    }

    let normalizer = Normalizer::new(&meta.stopwords);
    let index = InvertedIndex::from_tables(normalizer, postings, term_frequencies, doc_lengths, docs)
        .map_err(|reason| {
            tracing::warn!(root = %paths.root.display(), reason = reason.as_str(), "rejected inconsistent index");
            Error::corrupt_index(&paths.root, reason)
        })?;

    tracing::info!(root = %paths.root.display(), num_docs = index.document_count(), num_terms = index.term_count(), "loaded index");
    Ok(index)
}
