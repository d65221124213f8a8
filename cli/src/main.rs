use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_core::corpus::{load_doctors, load_stopwords, load_stopwords_if_present, DOCTORS_FILE, STOPWORDS_FILE};
use search_core::persist::{load, save, IndexPaths};
use search_core::scoring::{self, DEFAULT_SEARCH_LIMIT};
use search_core::{Bm25Params, DocId, InvertedIndex, Normalizer};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "keyword_search")]
#[command(about = "Keyword search over doctor profiles with BM25", long_about = None)]
struct Cli {
    /// Directory holding doctors.json and stopwords.txt
    #[arg(long, global = true, env = "DOCTOR_SEARCH_DATA", default_value = "data")]
    data_dir: PathBuf,
    /// Directory the index is saved to and loaded from
    #[arg(long, global = true, env = "DOCTOR_SEARCH_CACHE", default_value = "cache")]
    cache_dir: PathBuf,
    /// Stopword file used by build; defaults to <data-dir>/stopwords.txt, then the built-in list
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the inverted index and save it to the cache directory
    Build,
    #[command(flatten)]
    Query(QueryCommand),
}

/// Commands answered from a previously saved index.
#[derive(Subcommand)]
enum QueryCommand {
    /// Search doctors using BM25
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Term frequency of a term in one document
    Tf { doc_id: DocId, term: String },
    /// Inverse document frequency of a term
    Idf { term: String },
    /// TF-IDF of a term in one document
    Tfidf { doc_id: DocId, term: String },
    /// BM25 inverse document frequency of a term
    Bm25idf { term: String },
    /// BM25 saturated term frequency of a term in one document
    Bm25tf {
        doc_id: DocId,
        term: String,
        #[arg(default_value_t = Bm25Params::default().k1)]
        k1: f64,
        #[arg(default_value_t = Bm25Params::default().b)]
        b: f64,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let paths = IndexPaths::new(&cli.cache_dir);

    match cli.command {
        Commands::Build => build_index(&cli.data_dir, normalizer(&cli)?, &paths),
        Commands::Query(command) => {
            if cli.stopwords.is_some() {
                tracing::warn!("--stopwords only applies to build; queries use the stopwords saved with the index");
            }
            let index = load(&paths).with_context(|| {
                format!("no usable index in {}; run `keyword_search build` first", paths.root.display())
            })?;
            run_query(&index, command)
        }
    }
}

fn run_query(index: &InvertedIndex, command: QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Search { query, limit } => {
            println!("Searching for doctor info: {query}");
            let hits = scoring::search(index, &query, limit, Bm25Params::default());
            for (rank, hit) in hits.iter().enumerate() {
                let name = index.document(hit.doc_id).map(|d| d.name.as_str()).unwrap_or("<unknown>");
                println!("{}. ({}) {} - score {:.4}", rank + 1, hit.doc_id, name, hit.score);
            }
        }
        QueryCommand::Tf { doc_id, term } => {
            let tf = index.term_frequency(doc_id, &term)?;
            println!("Term frequency of '{term}' in document '{doc_id}': {tf}");
        }
        QueryCommand::Idf { term } => {
            let idf = scoring::idf(index, &term)?;
            println!("Inverse document frequency of '{term}': {idf:.2}");
        }
        QueryCommand::Tfidf { doc_id, term } => {
            let score = scoring::tf_idf(index, doc_id, &term)?;
            println!("TF-IDF score of '{term}' in document '{doc_id}': {score:.2}");
        }
        QueryCommand::Bm25idf { term } => {
            let score = scoring::bm25_idf(index, &term)?;
            println!("BM25 IDF score of '{term}': {score:.2}");
        }
        QueryCommand::Bm25tf { doc_id, term, k1, b } => {
            let score = scoring::bm25_tf(index, doc_id, &term, Bm25Params { k1, b })?;
            println!("BM25 TF score of '{term}' in document '{doc_id}': {score:.2}");
        }
    }
    Ok(())
}

fn normalizer(cli: &Cli) -> Result<Normalizer> {
    if let Some(path) = &cli.stopwords {
        let words = load_stopwords(path).with_context(|| format!("reading stopwords from {}", path.display()))?;
        return Ok(Normalizer::new(words));
    }
    let default_path = cli.data_dir.join(STOPWORDS_FILE);
    match load_stopwords_if_present(&default_path)? {
        Some(words) => Ok(Normalizer::new(words)),
        None => {
            tracing::debug!(path = %default_path.display(), "no stopword file, using built-in list");
            Ok(Normalizer::english())
        }
    }
}

fn build_index(data_dir: &Path, normalizer: Normalizer, paths: &IndexPaths) -> Result<()> {
    println!("Building the Inverted Index");
    let doctors = load_doctors(&data_dir.join(DOCTORS_FILE))?;

    let mut index = InvertedIndex::new(normalizer);
    index.build(doctors)?;
    save(paths, &index).with_context(|| format!("saving index to {}", paths.root.display()))?;

    println!(
        "Build successful: {} documents, {} terms",
        index.document_count(),
        index.term_count()
    );
    Ok(())
}
