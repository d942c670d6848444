use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::fragment::Fragment;
use crate::core::types::FragmentId;
use crate::corpus::source::{CorpusError, CorpusLookup, FragmentSource, Page};
use crate::matching::aggregate::{MatchAggregator, MatchCandidate};
use crate::matching::pattern::PatternError;
use crate::matching::ranking::rank_results;
use crate::matching::scoring::FragmentScore;

/// Default lower bound on sign count for a fragment to be scored
pub const DEFAULT_MIN_SIGNS: usize = 1;

/// Default upper bound on sign count for a fragment to be scored
pub const DEFAULT_MAX_SIGNS: usize = 100;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_signs ({max}) must not be smaller than min_signs ({min})")]
    InvalidSignBounds { min: usize, max: usize },
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Fragments with fewer signs are not scored
    pub min_signs: usize,
    /// Fragments with more signs are not scored
    pub max_signs: usize,
    /// Search grid positions on the rayon pool
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_signs: DEFAULT_MIN_SIGNS,
            max_signs: DEFAULT_MAX_SIGNS,
            parallel: true,
        }
    }
}

impl MatchingConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSignBounds` if `max_signs < min_signs`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_signs < self.min_signs {
            return Err(ConfigError::InvalidSignBounds {
                min: self.min_signs,
                max: self.max_signs,
            });
        }
        Ok(())
    }

    /// Whether a fragment with `sign_count` signs is worth scoring.
    /// Fragments without signs never are.
    #[must_use]
    pub fn accepts(&self, sign_count: usize) -> bool {
        sign_count > 0 && (self.min_signs..=self.max_signs).contains(&sign_count)
    }
}

/// Result for a fragment that went through matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFragment {
    pub fragment_id: FragmentId,
    pub notes: String,
    pub candidates: Vec<MatchCandidate>,
    pub sign_count: usize,
    pub best_match_ratio: f64,
    pub longest_repeat: usize,
}

/// Result for a fragment whose sign count was outside the configured bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFragment {
    pub fragment_id: FragmentId,
    pub notes: String,
}

/// Outcome of scoring a single fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FragmentResult {
    Scored(ScoredFragment),
    Skipped(SkippedFragment),
}

impl FragmentResult {
    pub fn fragment_id(&self) -> &FragmentId {
        match self {
            Self::Scored(scored) => &scored.fragment_id,
            Self::Skipped(skipped) => &skipped.fragment_id,
        }
    }

    pub fn as_scored(&self) -> Option<&ScoredFragment> {
        match self {
            Self::Scored(scored) => Some(scored),
            Self::Skipped(_) => None,
        }
    }

    pub fn into_scored(self) -> Option<ScoredFragment> {
        match self {
            Self::Scored(scored) => Some(scored),
            Self::Skipped(_) => None,
        }
    }
}

/// The main matching engine
pub struct MatchingEngine<'a, C: CorpusLookup + ?Sized> {
    corpus: &'a C,
    config: MatchingConfig,
}

impl<'a, C: CorpusLookup + ?Sized> MatchingEngine<'a, C> {
    /// Create a new matching engine with default configuration
    pub fn new(corpus: &'a C) -> Self {
        Self {
            corpus,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(corpus: &'a C, config: MatchingConfig) -> Self {
        Self { corpus, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score one fragment against the corpus.
    ///
    /// Fragments whose sign count falls outside the configured bounds, or
    /// that have no usable signs, are returned as [`FragmentResult::Skipped`]
    /// without touching the corpus.
    ///
    /// # Errors
    ///
    /// Returns the first corpus or pattern error; the fragment is not scored.
    pub fn score_fragment(&self, fragment: &Fragment) -> Result<FragmentResult, MatchError> {
        let grid = fragment.grid();
        let sign_count = grid.sign_count();

        if !self.config.accepts(sign_count) {
            debug!(
                fragment = %fragment.id,
                signs = sign_count,
                min = self.config.min_signs,
                max = self.config.max_signs,
                "Fragment outside sign bounds, not scored"
            );
            return Ok(FragmentResult::Skipped(SkippedFragment {
                fragment_id: fragment.id.clone(),
                notes: fragment.notes.clone(),
            }));
        }

        let candidates = MatchAggregator::new(self.corpus)
            .with_parallel(self.config.parallel)
            .aggregate(&grid)?;
        let score = FragmentScore::calculate(&grid, &candidates);

        info!(
            fragment = %fragment.id,
            signs = score.sign_count,
            candidates = candidates.len(),
            best = score.best_match_ratio,
            "Scored fragment"
        );

        Ok(FragmentResult::Scored(ScoredFragment {
            fragment_id: fragment.id.clone(),
            notes: fragment.notes.clone(),
            candidates: candidates.into_candidates(),
            sign_count: score.sign_count,
            best_match_ratio: score.best_match_ratio,
            longest_repeat: score.longest_repeat,
        }))
    }

    /// Score fragments one after another.
    ///
    /// # Errors
    ///
    /// Aborts on the first error.
    pub fn score_all<'f, I>(&self, fragments: I) -> Result<Vec<FragmentResult>, MatchError>
    where
        I: IntoIterator<Item = &'f Fragment>,
    {
        fragments
            .into_iter()
            .map(|fragment| self.score_fragment(fragment))
            .collect()
    }

    /// Score a page of fragments from `source` and rank them.
    ///
    /// Fragments that were skipped or found no candidates are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment source or the corpus fails.
    pub fn search<S>(&self, source: &S, page: Page) -> Result<Vec<ScoredFragment>, MatchError>
    where
        S: FragmentSource + ?Sized,
    {
        let fragments = source.fragments(page)?;
        debug!(fragments = fragments.len(), ?page, "Fetched fragments");

        let results = self.score_all(&fragments)?;
        Ok(rank_results(results))
    }
}
