use std::cmp::Ordering;

use crate::matching::engine::{FragmentResult, ScoredFragment};

/// Order two scored fragments: higher best match ratio first, then fewer
/// repeated signs first, then by fragment id.
#[must_use]
pub fn compare_scored(a: &ScoredFragment, b: &ScoredFragment) -> Ordering {
    b.best_match_ratio
        .total_cmp(&a.best_match_ratio)
        .then_with(|| a.longest_repeat.cmp(&b.longest_repeat))
        .then_with(|| a.fragment_id.cmp(&b.fragment_id))
}

/// Keep fragments that found at least one candidate and rank them.
///
/// Skipped fragments and fragments without candidates are dropped.
#[must_use]
pub fn rank_results(results: Vec<FragmentResult>) -> Vec<ScoredFragment> {
    let mut ranked: Vec<ScoredFragment> = results
        .into_iter()
        .filter_map(FragmentResult::into_scored)
        .filter(|scored| !scored.candidates.is_empty())
        .collect();
    ranked.sort_by(compare_scored);
    ranked
}
