//! Fragment matching engine.
//!
//! - [`MatchingEngine`](engine::MatchingEngine): filters fragments by sign
//!   count, scores them, and ranks the results
//! - [`SignPattern`](pattern::SignPattern): noise-tolerant pattern compiled from a sign grid
//! - [`MatchAggregator`](aggregate::MatchAggregator): per-position corpus searches and counting
//! - [`FragmentScore`](scoring::FragmentScore): best match ratio and longest repeat
//!
//! ## Matching Algorithm
//!
//! For a fragment with `n` signs the engine compiles `n` patterns, each with
//! exactly one sign replaced by a wildcard, and searches the corpus with
//! each. A chapter's `position_matches` is the number of patterns that found
//! it, so a chapter containing the fragment verbatim scores `n`, and a
//! chapter that differs in one sign scores 1.
//!
//! ## Scoring
//!
//! - **Best match ratio**: the highest `position_matches` over all
//!   candidates, divided by `n`
//! - **Longest repeat**: the longest run of identical consecutive signs in
//!   the fragment; among equally good matches, fragments with less
//!   repetition rank first
//!
//! ## Example
//!
//! ```rust,no_run
//! use fragment_matcher::core::fragment::Fragment;
//! use fragment_matcher::corpus::store::CorpusStore;
//! use fragment_matcher::matching::engine::{FragmentResult, MatchingEngine};
//!
//! let corpus = CorpusStore::load_embedded().unwrap();
//! let engine = MatchingEngine::new(&corpus);
//! let fragment = Fragment::new("K.1234", "LUD LUD X BEL\nME QI");
//!
//! if let FragmentResult::Scored(result) = engine.score_fragment(&fragment).unwrap() {
//!     for candidate in &result.candidates {
//!         println!("{} {}: {}", candidate.text_name, candidate.chapter_name, candidate.position_matches);
//!     }
//! }
//! ```

pub mod aggregate;
pub mod engine;
pub mod matcher;
pub mod pattern;
pub mod ranking;
pub mod scoring;
