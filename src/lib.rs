//! # fragment-matcher
//!
//! A library for identifying damaged tablet fragments by matching their signs
//! against a corpus of known chapters.
//!
//! A fragment is transcribed as rows of sign tokens, with `X` marking damaged
//! or illegible signs. Transcriptions disagree on readings, fragments break
//! mid-line, and corpus texts carry their own damage and alternate readings,
//! so exact search rarely finds anything.
//!
//! `fragment-matcher` instead searches the corpus once per sign, each time
//! with that sign replaced by a wildcard, and counts how many of these
//! searches found each chapter.
//!
//! ## Example
//!
//! ```rust
//! use fragment_matcher::{CorpusStore, Fragment, MatchingEngine};
//!
//! // Load the embedded sample corpus
//! let corpus = CorpusStore::load_embedded().unwrap();
//!
//! // A fragment with one damaged sign
//! let fragment = Fragment::new("K.1234", "LUD LUD X BEL\nME QI");
//!
//! let engine = MatchingEngine::new(&corpus);
//! let result = engine.score_fragment(&fragment).unwrap();
//!
//! if let Some(scored) = result.as_scored() {
//!     for candidate in &scored.candidates {
//!         println!("{} {}: {}/{}", candidate.text_name, candidate.chapter_name,
//!             candidate.position_matches, scored.sign_count);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for fragments, chapters, and sign grids
//! - [`parsing`]: Sign annotation parser
//! - [`matching`]: Pattern compilation, aggregation, scoring, and ranking
//! - [`corpus`]: Corpus and fragment storage
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP API

pub mod cli;
pub mod core;
pub mod corpus;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use core::chapter::{Chapter, ChapterMatch, TextRecord};
pub use core::fragment::Fragment;
pub use core::grid::{GridPosition, SignGrid};
pub use core::types::*;
pub use corpus::fragments::FragmentStore;
pub use corpus::source::{CorpusError, CorpusLookup, FragmentSource, Page};
pub use corpus::store::CorpusStore;
pub use matching::aggregate::MatchCandidate;
pub use matching::engine::{
    FragmentResult, MatchError, MatchingConfig, MatchingEngine, ScoredFragment, SkippedFragment,
};
pub use matching::pattern::SignPattern;
pub use parsing::signs::parse_signs;
