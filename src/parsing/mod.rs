//! Parsers for fragment sign annotations.
//!
//! - [`signs::parse_signs`]: raw annotation text to [`SignGrid`](crate::core::grid::SignGrid)
//!
//! ## Example
//!
//! ```rust
//! use fragment_matcher::parsing::signs::parse_signs;
//!
//! let grid = parse_signs("KUR X NA\nMEŠ");
//! assert_eq!(grid.sign_count(), 3);
//! ```

pub mod signs;
