use crate::core::chapter::Chapter;
use crate::matching::pattern::SignPattern;

/// Chapters whose sign text contains a match for `pattern`, in input order.
///
/// The search is a case-sensitive substring search; line breaks in a
/// chapter's signs are row boundaries for the pattern.
pub fn match_chapters<'a, I>(
    pattern: &'a SignPattern,
    chapters: I,
) -> impl Iterator<Item = &'a Chapter>
where
    I: IntoIterator<Item = &'a Chapter>,
    I::IntoIter: 'a,
{
    chapters
        .into_iter()
        .filter(move |chapter| pattern.is_match(&chapter.signs))
}
