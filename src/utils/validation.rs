//! Limits applied to annotations and match settings arriving from outside the process.

use crate::matching::engine::DEFAULT_MAX_SIGNS;

/// Maximum size of a single sign annotation (DOS protection)
pub const MAX_ANNOTATION_BYTES: usize = 64 * 1024;

/// Largest `max_signs` a remote caller may request.
///
/// Matching work grows with the square of the sign count, so the server never
/// scores more signs than the default upper bound.
pub const MAX_REQUEST_SIGNS: usize = DEFAULT_MAX_SIGNS;

/// Annotation validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Annotation too large: {size} bytes exceeds maximum of {MAX_ANNOTATION_BYTES}")]
    AnnotationTooLarge { size: usize },
    #[error("Annotation contains control characters and does not look like sign text")]
    BinaryContent,
    #[error("max_signs {requested} exceeds the server limit of {MAX_REQUEST_SIGNS}")]
    TooManySigns { requested: usize },
}

/// Check an annotation before it is parsed and matched.
///
/// Empty annotations pass; they simply yield no signs.
///
/// # Examples
///
/// ```
/// use fragment_matcher::utils::validation::validate_annotation;
///
/// assert!(validate_annotation("LUD LUD X BEL\nME QI").is_ok());
/// assert!(validate_annotation("LUD\u{0}BEL").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::AnnotationTooLarge` above [`MAX_ANNOTATION_BYTES`],
/// or `ValidationError::BinaryContent` if any control character other than
/// layout whitespace is present.
pub fn validate_annotation(annotation: &str) -> Result<(), ValidationError> {
    if annotation.len() > MAX_ANNOTATION_BYTES {
        return Err(ValidationError::AnnotationTooLarge {
            size: annotation.len(),
        });
    }

    if annotation
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(ValidationError::BinaryContent);
    }

    Ok(())
}

/// Check a requested upper sign bound against [`MAX_REQUEST_SIGNS`].
///
/// # Errors
///
/// Returns `ValidationError::TooManySigns` if `max_signs` is above the limit.
pub fn validate_max_signs(max_signs: usize) -> Result<(), ValidationError> {
    if max_signs > MAX_REQUEST_SIGNS {
        return Err(ValidationError::TooManySigns {
            requested: max_signs,
        });
    }
    Ok(())
}
