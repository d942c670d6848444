//! Command-line interface for fragment-matcher.
//!
//! - **search**: Score a page of fragments against the corpus and rank them
//! - **identify**: Score a single sign annotation against the corpus
//! - **corpus**: List, show, or export the chapters of a corpus
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Rank the first ten fragments of a collection
//! fragment-matcher search --fragments fragments.json --corpus chapters.json
//!
//! # Pipe an annotation in
//! echo "LUD LUD X BEL" | fragment-matcher identify -
//!
//! # JSON output for scripting
//! fragment-matcher --format json search --fragments fragments.json --skip 10 --limit 50
//!
//! # Start the API
//! fragment-matcher serve --port 8080
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::corpus::store::CorpusStore;
use crate::matching::engine::{MatchingConfig, DEFAULT_MAX_SIGNS, DEFAULT_MIN_SIGNS};

pub mod corpus;
pub mod identify;
pub mod search;

#[derive(Parser)]
#[command(name = "fragment-matcher")]
#[command(version)]
#[command(about = "Match unidentified fragments against a corpus of known chapters")]
#[command(
    long_about = "fragment-matcher finds corpus chapters whose sign text plausibly contains a fragment's signs.\n\nEach sign of the fragment is in turn treated as unknown, and the corpus is searched with a pattern that tolerates damage markers, alternate readings and surrounding text. Chapters are scored by how many of these searches found them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score and rank a collection of fragments
    Search(search::SearchArgs),

    /// Score a single sign annotation
    Identify(identify::IdentifyArgs),

    /// Inspect the corpus
    Corpus(corpus::CorpusArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Options shared by every command that runs the matching engine
#[derive(clap::Args, Clone, Debug)]
pub struct MatchArgs {
    /// Path to corpus file (defaults to the embedded sample corpus)
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Fragments with fewer signs are not scored
    #[arg(long, default_value_t = DEFAULT_MIN_SIGNS)]
    pub min_signs: usize,

    /// Fragments with more signs are not scored
    #[arg(long, default_value_t = DEFAULT_MAX_SIGNS)]
    pub max_signs: usize,

    /// Search sign positions one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,
}

impl MatchArgs {
    /// Build and validate the engine configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the sign bounds are inconsistent.
    pub fn matching_config(&self) -> anyhow::Result<MatchingConfig> {
        let config = MatchingConfig {
            min_signs: self.min_signs,
            max_signs: self.max_signs,
            parallel: !self.sequential,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configure the global rayon pool if a thread count was given
    ///
    /// # Errors
    ///
    /// Returns an error if the pool was already initialised.
    pub fn init_threads(&self) -> anyhow::Result<()> {
        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
        }
        Ok(())
    }
}

/// Load the corpus at `path`, or the embedded sample corpus
///
/// # Errors
///
/// Returns an error if the corpus cannot be read or parsed.
pub fn load_corpus(path: Option<&PathBuf>) -> anyhow::Result<CorpusStore> {
    let corpus = match path {
        Some(path) => CorpusStore::load_from_file(path)?,
        None => CorpusStore::load_embedded()?,
    };
    tracing::debug!(chapters = corpus.len(), "Corpus ready");
    Ok(corpus)
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Path to corpus file (defaults to the embedded sample corpus)
    #[arg(long)]
    pub corpus: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
