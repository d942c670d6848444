//! Corpus access: the chapters fragments are matched against, and the
//! fragments themselves.
//!
//! The matching engine only sees the [`CorpusLookup`](source::CorpusLookup) and
//! [`FragmentSource`](source::FragmentSource) traits. This module also ships
//! JSON-backed implementations of both, plus a small embedded sample corpus.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fragment_matcher::corpus::store::CorpusStore;
//! use std::path::Path;
//!
//! let sample = CorpusStore::load_embedded().unwrap();
//! let custom = CorpusStore::load_from_file(Path::new("chapters.json")).unwrap();
//! println!("{} + {} chapters", sample.len(), custom.len());
//! ```
//!
//! ## Corpus file format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "texts": [{ "id": "I.2", "name": "Counsels of Wisdom" }],
//!   "chapters": [
//!     { "id": "I.2-OB-1", "text_id": "I.2", "stage": "Old Babylonian",
//!       "name": "I", "signs": "DIŠ KUR NA\nMEŠ GAL" }
//!   ]
//! }
//! ```

pub mod fragments;
pub mod source;
pub mod store;
