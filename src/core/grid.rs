use serde::{Deserialize, Serialize};

use crate::core::types::WILDCARD;

/// A (line, position-within-line) coordinate in a [`SignGrid`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Signs of a fragment laid out as lines of tokens.
///
/// Every row holds at least one token. A grid with no rows is valid and
/// means the annotation had no usable signs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignGrid {
    rows: Vec<Vec<String>>,
}

impl SignGrid {
    /// Build a grid from rows of tokens, dropping empty tokens and empty rows
    pub fn from_rows<R, T>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(Into::<String>::into)
                    .filter(|token| !token.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of tokens across all rows
    #[must_use]
    pub fn sign_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// All tokens in reading order, ignoring line boundaries
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().flatten().map(String::as_str)
    }

    /// Every coordinate in the grid, row-major
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, tokens)| {
                (0..tokens.len()).map(move |col| GridPosition::new(row, col))
            })
    }

    #[must_use]
    pub fn get(&self, position: GridPosition) -> Option<&str> {
        self.rows
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .map(String::as_str)
    }

    /// Copy of this grid with the token at `position` replaced by [`WILDCARD`].
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the grid. Callers take positions from
    /// [`SignGrid::positions`].
    #[must_use]
    pub fn with_wildcard(&self, position: GridPosition) -> Self {
        let mut rows = self.rows.clone();
        rows[position.row][position.col] = WILDCARD.to_string();
        Self { rows }
    }
}

impl std::fmt::Display for SignGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SignGrid {
        SignGrid::from_rows(vec![vec!["A", "B"], vec!["C"]])
    }

    #[test]
    fn test_from_rows_drops_empty() {
        let grid = SignGrid::from_rows(vec![vec!["A", ""], vec![], vec!["", ""], vec!["B"]]);
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.sign_count(), 2);
    }

    #[test]
    fn test_sign_count() {
        assert_eq!(grid().sign_count(), 3);
        assert_eq!(SignGrid::default().sign_count(), 0);
        assert!(SignGrid::default().is_empty());
    }

    #[test]
    fn test_positions_row_major() {
        let positions: Vec<_> = grid().positions().collect();
        assert_eq!(
            positions,
            vec![
                GridPosition::new(0, 0),
                GridPosition::new(0, 1),
                GridPosition::new(1, 0)
            ]
        );
    }

    #[test]
    fn test_tokens_flatten_rows() {
        let binding = grid();
        let tokens: Vec<_> = binding.tokens().collect();
        assert_eq!(tokens, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_with_wildcard_leaves_original() {
        let original = grid();
        let wildcarded = original.with_wildcard(GridPosition::new(0, 1));

        assert_eq!(wildcarded.get(GridPosition::new(0, 1)), Some(WILDCARD));
        assert_eq!(original.get(GridPosition::new(0, 1)), Some("B"));
        assert_eq!(wildcarded.sign_count(), original.sign_count());
    }

    #[test]
    fn test_display() {
        assert_eq!(grid().to_string(), "A B\nC");
    }
}
