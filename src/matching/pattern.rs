//! Compiles sign grids into noise-tolerant search patterns.
//!
//! A concrete sign `t` compiles to
//!
//! ```text
//! (?:[X ])*(?:\S+/)*t(?:/\S+)*(?:[X ])*
//! ```
//!
//! so a transcription may surround it with damage markers or blanks, and may
//! cite alternate readings before or after it (`KUR/ŠAD`). The wildcard
//! compiles to `\S+`. Signs of one row are joined by a single space, and rows
//! are joined by a connector that allows trailing text on the current line,
//! a line break, and leading text on the following line.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::core::grid::{GridPosition, SignGrid};
use crate::core::types::WILDCARD;

/// Compiled-size ceiling for a single pattern. Fragments within the default
/// sign bounds stay far below this.
const PATTERN_SIZE_LIMIT: usize = 256 * 1024 * 1024;

const WILDCARD_PATTERN: &str = r"\S+";
const NOISE: &str = "(?:[X ])*";
const ALTERNATE_PREFIX: &str = r"(?:\S+/)*";
const ALTERNATE_SUFFIX: &str = r"(?:/\S+)*";
const ROW_CONNECTOR: &str = r"(?: .*)?\n.*";

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Sign pattern for {sign_count} signs exceeds the regex size limit: {source}")]
    TooLarge {
        sign_count: usize,
        #[source]
        source: regex::Error,
    },
}

/// A noise-tolerant matcher for one wildcarded variant of a sign grid
#[derive(Debug, Clone)]
pub struct SignPattern {
    regex: Regex,
    wildcard: Option<GridPosition>,
}

impl SignPattern {
    /// Compile `grid` with the sign at `wildcard` treated as unknown.
    ///
    /// `wildcard` must be one of `grid.positions()`.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::TooLarge` if the compiled regex exceeds the
    /// engine's size limit. Signs are always escaped, so the pattern text
    /// itself is always valid.
    pub fn compile(grid: &SignGrid, wildcard: GridPosition) -> Result<Self, PatternError> {
        let wildcarded = grid.with_wildcard(wildcard);
        let mut pattern = Self::from_grid(&wildcarded)?;
        pattern.wildcard = Some(wildcard);
        Ok(pattern)
    }

    /// Compile `grid` as-is, honouring any [`WILDCARD`] tokens it already holds.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::TooLarge` if the compiled regex exceeds the
    /// engine's size limit.
    pub fn from_grid(grid: &SignGrid) -> Result<Self, PatternError> {
        let source = grid_pattern(grid);
        let regex = RegexBuilder::new(&source)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|source| PatternError::TooLarge {
                sign_count: grid.sign_count(),
                source,
            })?;

        tracing::trace!(pattern = %regex.as_str(), "Compiled sign pattern");

        Ok(Self {
            regex,
            wildcard: None,
        })
    }

    /// Whether some substring of `signs` satisfies the pattern
    #[must_use]
    pub fn is_match(&self, signs: &str) -> bool {
        self.regex.is_match(signs)
    }

    /// Byte range of the first match in `signs`
    #[must_use]
    pub fn find(&self, signs: &str) -> Option<(usize, usize)> {
        self.regex.find(signs).map(|m| (m.start(), m.end()))
    }

    /// The wildcarded position this pattern was compiled for
    #[must_use]
    pub fn wildcard(&self) -> Option<GridPosition> {
        self.wildcard
    }

    /// The regex source text
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl std::fmt::Display for SignPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-pattern for a single sign token
#[must_use]
pub fn sign_pattern(sign: &str) -> String {
    if sign == WILDCARD {
        WILDCARD_PATTERN.to_string()
    } else {
        format!(
            "{NOISE}{ALTERNATE_PREFIX}{}{ALTERNATE_SUFFIX}{NOISE}",
            regex::escape(sign)
        )
    }
}

/// Sub-pattern for one row: signs in order, separated by single spaces
#[must_use]
pub fn row_pattern(row: &[String]) -> String {
    row.iter()
        .map(|sign| sign_pattern(sign))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pattern source for a whole grid
#[must_use]
pub fn grid_pattern(grid: &SignGrid) -> String {
    grid.rows()
        .iter()
        .map(|row| row_pattern(row))
        .collect::<Vec<_>>()
        .join(ROW_CONNECTOR)
}
