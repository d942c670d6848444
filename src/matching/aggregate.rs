use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::core::chapter::ChapterMatch;
use crate::core::grid::{GridPosition, SignGrid};
use crate::core::types::{ChapterId, TextId};
use crate::corpus::source::{CorpusError, CorpusLookup};
use crate::matching::engine::MatchError;
use crate::matching::pattern::SignPattern;

/// A corpus chapter that matched at least one wildcarded variant of a fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub chapter_id: ChapterId,
    pub text_id: TextId,
    pub text_name: String,
    pub chapter_name: String,
    pub stage: String,

    /// Number of grid positions whose wildcarded pattern found this chapter
    pub position_matches: usize,
}

/// Per-chapter match counts, keyed by chapter id
#[derive(Debug, Default)]
pub struct CandidateMap {
    candidates: BTreeMap<ChapterId, MatchCandidate>,
}

impl CandidateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more matching position for `found`.
    ///
    /// The text name is resolved through `text_name` only the first time a
    /// chapter is seen.
    ///
    /// # Errors
    ///
    /// Propagates any error from `text_name`.
    pub fn upsert<F>(&mut self, found: ChapterMatch, text_name: F) -> Result<(), CorpusError>
    where
        F: FnOnce(&TextId) -> Result<String, CorpusError>,
    {
        if let Some(candidate) = self.candidates.get_mut(&found.id) {
            candidate.position_matches += 1;
            return Ok(());
        }

        let text_name = text_name(&found.text_id)?;
        self.candidates.insert(
            found.id.clone(),
            MatchCandidate {
                chapter_id: found.id,
                text_id: found.text_id,
                text_name,
                chapter_name: found.name,
                stage: found.stage,
                position_matches: 1,
            },
        );
        Ok(())
    }

    pub fn get(&self, id: &ChapterId) -> Option<&MatchCandidate> {
        self.candidates.get(id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Highest per-chapter position count, 0 when empty
    pub fn max_position_matches(&self) -> usize {
        self.candidates
            .values()
            .map(|c| c.position_matches)
            .max()
            .unwrap_or(0)
    }

    /// Candidates ordered by chapter id
    pub fn into_candidates(self) -> Vec<MatchCandidate> {
        self.candidates.into_values().collect()
    }
}

/// Runs one corpus search per grid position and counts, per chapter, how
/// many positions found it.
///
/// Each search wildcards exactly one sign, so a chapter's count approximates
/// how many of the fragment's signs it corroborates while tolerating one
/// deviation per probe.
pub struct MatchAggregator<'a, C: CorpusLookup + ?Sized> {
    corpus: &'a C,
    parallel: bool,
}

impl<'a, C: CorpusLookup + ?Sized> MatchAggregator<'a, C> {
    pub fn new(corpus: &'a C) -> Self {
        Self {
            corpus,
            parallel: true,
        }
    }

    /// Search positions one after another instead of on the rayon pool
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Aggregate position matches for every sign in `grid`.
    ///
    /// Searches may run in parallel, but results are merged in row-major
    /// position order, so the outcome does not depend on scheduling.
    ///
    /// # Errors
    ///
    /// Returns the first corpus or pattern error encountered; no partial
    /// result is produced.
    pub fn aggregate(&self, grid: &SignGrid) -> Result<CandidateMap, MatchError> {
        let positions: Vec<GridPosition> = grid.positions().collect();

        let per_position: Vec<Vec<ChapterMatch>> = if self.parallel {
            positions
                .par_iter()
                .map(|&position| self.search_position(grid, position))
                .collect::<Result<_, _>>()?
        } else {
            positions
                .iter()
                .map(|&position| self.search_position(grid, position))
                .collect::<Result<_, _>>()?
        };

        let mut candidates = CandidateMap::new();
        for matches in per_position {
            for found in matches {
                candidates.upsert(found, |text_id| self.corpus.find_text_name(text_id))?;
            }
        }

        debug!(
            signs = positions.len(),
            candidates = candidates.len(),
            "Aggregated position matches"
        );
        Ok(candidates)
    }

    /// Chapters found with the sign at `position` wildcarded, at most once each
    fn search_position(
        &self,
        grid: &SignGrid,
        position: GridPosition,
    ) -> Result<Vec<ChapterMatch>, MatchError> {
        let pattern = SignPattern::compile(grid, position)?;
        let mut matches = self.corpus.find_by_sign_pattern(&pattern)?;

        let mut seen = HashSet::new();
        matches.retain(|m| seen.insert(m.id.clone()));

        debug!(%position, matches = matches.len(), "Searched wildcarded position");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chapter::{Chapter, TextRecord};
    use crate::corpus::store::CorpusStore;
    use crate::parsing::signs::parse_signs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn corpus(chapters: Vec<Chapter>) -> CorpusStore {
        let mut corpus = CorpusStore::new();
        corpus.add_text(TextRecord::new("t1", "Text One"));
        corpus.add_text(TextRecord::new("t2", "Text Two"));
        for chapter in chapters {
            corpus.add_chapter(chapter).unwrap();
        }
        corpus
    }

    #[test]
    fn test_every_position_matches_exact_copy() {
        let corpus = corpus(vec![Chapter::new("c1", "t1", "I", "A B\nC D")]);
        let grid = parse_signs("A B\nC");

        let candidates = MatchAggregator::new(&corpus).aggregate(&grid).unwrap();
        let c1 = candidates.get(&ChapterId::new("c1")).unwrap();
        assert_eq!(c1.position_matches, 3);
        assert_eq!(c1.text_name, "Text One");
        assert_eq!(c1.chapter_name, "I");
    }

    #[test]
    fn test_one_deviation_counts_one_position() {
        // Only wildcarding the deviating sign finds c2
        let corpus = corpus(vec![
            Chapter::new("c1", "t1", "I", "A B C"),
            Chapter::new("c2", "t2", "I", "A Z C"),
        ]);
        let grid = parse_signs("A B C");

        let candidates = MatchAggregator::new(&corpus).aggregate(&grid).unwrap();
        assert_eq!(candidates.get(&ChapterId::new("c1")).unwrap().position_matches, 3);
        assert_eq!(candidates.get(&ChapterId::new("c2")).unwrap().position_matches, 1);
        assert_eq!(candidates.max_position_matches(), 3);
    }

    #[test]
    fn test_no_shared_signs() {
        let corpus = corpus(vec![Chapter::new("c1", "t1", "I", "Q R S")]);
        let candidates = MatchAggregator::new(&corpus)
            .aggregate(&parse_signs("A B"))
            .unwrap();
        assert!(candidates.is_empty());
        assert_eq!(candidates.max_position_matches(), 0);
    }

    #[test]
    fn test_single_sign_fragment_matches_everything() {
        // The only probe is a bare wildcard
        let corpus = corpus(vec![
            Chapter::new("c1", "t1", "I", "Q"),
            Chapter::new("c2", "t2", "I", "R S"),
        ]);
        let candidates = MatchAggregator::new(&corpus)
            .aggregate(&parse_signs("A"))
            .unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let corpus = corpus(vec![
            Chapter::new("c1", "t1", "I", "A B\nC D"),
            Chapter::new("c2", "t1", "II", "A X B\nZ"),
            Chapter::new("c3", "t2", "I", "Q B\nC"),
        ]);
        let grid = parse_signs("A B\nC");

        let parallel = MatchAggregator::new(&corpus).aggregate(&grid).unwrap();
        let sequential = MatchAggregator::new(&corpus)
            .sequential()
            .aggregate(&grid)
            .unwrap();
        assert_eq!(parallel.into_candidates(), sequential.into_candidates());
    }

    #[test]
    fn test_unknown_text_fails_loudly() {
        let corpus = corpus(vec![Chapter::new("c1", "missing", "I", "A B")]);
        let result = MatchAggregator::new(&corpus).aggregate(&parse_signs("A B"));
        assert!(matches!(
            result,
            Err(MatchError::Corpus(CorpusError::UnknownText(_)))
        ));
    }

    #[test]
    fn test_candidates_ordered_by_chapter_id() {
        let corpus = corpus(vec![
            Chapter::new("c9", "t1", "I", "A B"),
            Chapter::new("c1", "t1", "II", "A B"),
        ]);
        let candidates = MatchAggregator::new(&corpus)
            .aggregate(&parse_signs("A B"))
            .unwrap()
            .into_candidates();
        let ids: Vec<_> = candidates.iter().map(|c| c.chapter_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c9"]);
    }

    /// Corpus that returns every match twice and counts name lookups
    struct StutteringCorpus {
        inner: CorpusStore,
        lookups: AtomicUsize,
    }

    impl CorpusLookup for StutteringCorpus {
        fn find_by_sign_pattern(
            &self,
            pattern: &SignPattern,
        ) -> Result<Vec<ChapterMatch>, CorpusError> {
            let once = self.inner.find_by_sign_pattern(pattern)?;
            Ok(once.iter().chain(once.iter()).cloned().collect())
        }

        fn find_text_name(&self, text_id: &TextId) -> Result<String, CorpusError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_text_name(text_id)
        }
    }

    #[test]
    fn test_count_bounded_and_name_resolved_once() {
        let backend = StutteringCorpus {
            inner: corpus(vec![Chapter::new("c1", "t1", "I", "A B C")]),
            lookups: AtomicUsize::new(0),
        };
        let grid = parse_signs("A B C");

        let candidates = MatchAggregator::new(&backend).aggregate(&grid).unwrap();
        let c1 = candidates.get(&ChapterId::new("c1")).unwrap();
        assert_eq!(c1.position_matches, grid.sign_count());
        assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
    }
}
