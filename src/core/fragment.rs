use serde::{Deserialize, Serialize};

use crate::core::grid::SignGrid;
use crate::core::types::FragmentId;
use crate::parsing::signs::parse_signs;

/// An unidentified fragment with its raw sign annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Museum number
    pub id: FragmentId,

    /// Free-form editorial notes, carried through to results
    #[serde(default)]
    pub notes: String,

    /// Raw sign annotation: tokens, layout whitespace and damage markers
    #[serde(default)]
    pub signs: String,
}

impl Fragment {
    pub fn new(id: impl Into<String>, signs: impl Into<String>) -> Self {
        Self {
            id: FragmentId::new(id),
            notes: String::new(),
            signs: signs.into(),
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Parse the annotation into a sign grid
    #[must_use]
    pub fn grid(&self) -> SignGrid {
        parse_signs(&self.signs)
    }

    /// Whether the annotation carries any text at all
    #[must_use]
    pub fn has_signs(&self) -> bool {
        !self.signs.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_grid() {
        let fragment = Fragment::new("K.1", "KUR X NA\nMEŠ");
        let grid = fragment.grid();
        assert_eq!(grid.sign_count(), 3);
        assert_eq!(grid.rows()[0], vec!["KUR", "NA"]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let fragment: Fragment = serde_json::from_str(r#"{"id": "K.2"}"#).unwrap();
        assert_eq!(fragment.id, FragmentId::new("K.2"));
        assert!(fragment.notes.is_empty());
        assert!(!fragment.has_signs());
    }

    #[test]
    fn test_with_notes() {
        let fragment = Fragment::new("K.3", "A").with_notes("joins K.4");
        assert_eq!(fragment.notes, "joins K.4");
        assert!(fragment.has_signs());
    }
}
