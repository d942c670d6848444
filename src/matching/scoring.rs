use serde::{Deserialize, Serialize};

use crate::core::grid::SignGrid;
use crate::matching::aggregate::CandidateMap;

/// Convert a count to f64 for ratio calculations
///
/// Sign counts are bounded far below f64's exact-integer range.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Scores derived for a fragment after aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentScore {
    /// Total number of signs in the fragment
    pub sign_count: usize,

    /// Best chapter's position count divided by `sign_count`, in `[0, 1]`
    pub best_match_ratio: f64,

    /// Longest run of identical consecutive signs in the fragment
    pub longest_repeat: usize,
}

impl FragmentScore {
    /// Score an aggregated fragment.
    ///
    /// A grid without signs scores a ratio of 0.0 and a longest repeat of 0;
    /// the engine never scores such grids.
    #[must_use]
    pub fn calculate(grid: &SignGrid, candidates: &CandidateMap) -> Self {
        let sign_count = grid.sign_count();
        Self {
            sign_count,
            best_match_ratio: best_match_ratio(candidates.max_position_matches(), sign_count),
            longest_repeat: longest_repeat(grid.tokens()),
        }
    }
}

/// `best_count / sign_count`, or 0.0 when there are no signs
#[must_use]
pub fn best_match_ratio(best_count: usize, sign_count: usize) -> f64 {
    if sign_count == 0 {
        0.0
    } else {
        count_to_f64(best_count) / count_to_f64(sign_count)
    }
}

/// Length of the longest run of identical consecutive tokens.
///
/// Returns 0 for an empty sequence, otherwise at least 1.
pub fn longest_repeat<'a, I>(tokens: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<&str> = None;

    for token in tokens {
        current = if previous == Some(token) { current + 1 } else { 1 };
        longest = longest.max(current);
        previous = Some(token);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::signs::parse_signs;

    #[test]
    fn test_longest_repeat() {
        assert_eq!(longest_repeat(["A", "B", "B", "B", "C"]), 3);
        assert_eq!(longest_repeat(["A", "B", "C"]), 1);
        assert_eq!(longest_repeat(["A"]), 1);
        assert_eq!(longest_repeat(["A", "A", "B", "A", "A", "A"]), 3);
        assert_eq!(longest_repeat(Vec::<&str>::new()), 0);
    }

    #[test]
    fn test_longest_repeat_crosses_rows() {
        let grid = parse_signs("A B\nB C");
        assert_eq!(longest_repeat(grid.tokens()), 2);
    }

    #[test]
    fn test_best_match_ratio() {
        assert!((best_match_ratio(3, 3) - 1.0).abs() < f64::EPSILON);
        assert!((best_match_ratio(1, 4) - 0.25).abs() < f64::EPSILON);
        assert!((best_match_ratio(0, 4) - 0.0).abs() < f64::EPSILON);
        assert!((best_match_ratio(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_calculate_without_candidates() {
        let grid = parse_signs("LUD LUD BEL");
        let score = FragmentScore::calculate(&grid, &CandidateMap::new());
        assert_eq!(score.sign_count, 3);
        assert!(score.best_match_ratio.abs() < f64::EPSILON);
        assert_eq!(score.longest_repeat, 2);
    }
}
