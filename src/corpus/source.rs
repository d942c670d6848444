use thiserror::Error;

use crate::core::chapter::ChapterMatch;
use crate::core::fragment::Fragment;
use crate::core::types::{ChapterId, TextId};
use crate::matching::pattern::SignPattern;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read corpus: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse corpus: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Text '{0}' is not in the corpus")]
    UnknownText(TextId),

    #[error("Duplicate chapter id '{0}'")]
    DuplicateChapter(ChapterId),

    #[error("Corpus backend unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the corpus of known chapters.
///
/// Implementations are shared across the threads that search grid positions
/// in parallel, hence `Send + Sync`.
pub trait CorpusLookup: Send + Sync {
    /// All chapters whose sign text contains a match for `pattern`, in the
    /// backend's own iteration order
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn find_by_sign_pattern(&self, pattern: &SignPattern)
        -> Result<Vec<ChapterMatch>, CorpusError>;

    /// Display name of a text.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::UnknownText` if no text has this id. Every text
    /// referenced by a chapter is expected to resolve.
    fn find_text_name(&self, text_id: &TextId) -> Result<String, CorpusError>;
}

/// A window into an ordered record source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub skip: usize,
    /// `None` means no limit
    pub limit: Option<usize>,
}

impl Page {
    #[must_use]
    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    /// Apply this window to an iterator
    pub fn apply<I: Iterator>(self, iter: I) -> impl Iterator<Item = I::Item> {
        iter.skip(self.skip).take(self.limit.unwrap_or(usize::MAX))
    }
}

/// Supplies fragments to be matched.
///
/// Implementations return only fragments with a non-empty sign annotation,
/// ordered by ascending id, windowed by `page`.
pub trait FragmentSource {
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn fragments(&self, page: Page) -> Result<Vec<Fragment>, CorpusError>;
}
