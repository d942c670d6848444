//! Normalizes raw sign annotations into a [`SignGrid`].

use crate::core::grid::SignGrid;
use crate::core::types::DAMAGE_MARKER;

/// Parse a raw sign annotation into lines of sign tokens.
///
/// Damage markers (`X`) are removed wherever they occur, horizontal
/// whitespace separates tokens, and line breaks separate rows. Rows left
/// without tokens are dropped. Never fails: an annotation without usable
/// signs yields an empty grid.
#[must_use]
pub fn parse_signs(raw: &str) -> SignGrid {
    let cleaned: String = raw.chars().filter(|&c| c != DAMAGE_MARKER).collect();
    SignGrid::from_rows(cleaned.lines().map(str::split_whitespace))
}

/// Number of sign tokens an annotation contains
#[must_use]
pub fn count_signs(raw: &str) -> usize {
    parse_signs(raw).sign_count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let grid = parse_signs("A B\nC");
        assert_eq!(grid.rows(), &[vec!["A", "B"], vec!["C"]]);
    }

    #[test]
    fn test_damage_markers_removed() {
        let grid = parse_signs("X A X B\nX X\nC X");
        assert_eq!(grid.rows(), &[vec!["A", "B"], vec!["C"]]);
        assert_eq!(grid.sign_count(), 3);
    }

    #[test]
    fn test_damage_marker_inside_token() {
        // Markers are stripped character-wise, not token-wise
        let grid = parse_signs("KUX BA");
        assert_eq!(grid.rows(), &[vec!["KU", "BA"]]);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let grid = parse_signs("  A    B \t C  \n\n   D   ");
        assert_eq!(grid.rows(), &[vec!["A", "B", "C"], vec!["D"]]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let grid = parse_signs("A B\r\nC\r\n");
        assert_eq!(grid.rows(), &[vec!["A", "B"], vec!["C"]]);
    }

    #[test]
    fn test_no_usable_signs() {
        assert!(parse_signs("").is_empty());
        assert!(parse_signs("X X\n  \nXX").is_empty());
        assert_eq!(count_signs("X\nX X"), 0);
    }

    #[test]
    fn test_non_ascii_signs() {
        let grid = parse_signs("DIŠ |U.GUD| MEŠ");
        assert_eq!(grid.rows(), &[vec!["DIŠ", "|U.GUD|", "MEŠ"]]);
    }

    #[test]
    fn test_alternate_readings_kept_whole() {
        let grid = parse_signs("KUR/ŠAD NA");
        assert_eq!(grid.rows(), &[vec!["KUR/ŠAD", "NA"]]);
    }
}
