//! Core data types for fragment matching.
//!
//! - [`Fragment`](fragment::Fragment): an unidentified fragment and its raw sign annotation
//! - [`SignGrid`](grid::SignGrid): the annotation normalized into lines of sign tokens
//! - [`Chapter`](chapter::Chapter): a corpus entry whose sign text fragments are matched against
//! - [`TextRecord`](chapter::TextRecord): the text a chapter belongs to
//! - [`FragmentId`](types::FragmentId), [`ChapterId`](types::ChapterId),
//!   [`TextId`](types::TextId): typed identifiers
//!
//! ## Sign annotations
//!
//! A fragment annotation is free text: one line per inscribed line, signs
//! separated by spaces, damaged signs written as `X`.
//!
//! | Annotation   | Grid                    |
//! |--------------|-------------------------|
//! | `KUR X NA`   | `[[KUR, NA]]`           |
//! | `A  B\nC`    | `[[A, B], [C]]`         |
//! | `X X\n\n`    | `[]` (no usable signs)  |

pub mod chapter;
pub mod fragment;
pub mod grid;
pub mod types;
