//!
//! Annotation sub-syntax: a comma-separated, whitespace-tolerant list of
//! transform identifiers, e.g. `"trim, lower"`.
//!
//! The derive macro splits annotations at compile time with the same rules;
//! this module serves hand-written `Conform` impls and identifier checks at
//! registration time.
//!

use crate::error::IdentifierFault;

/// Separator between identifiers in an annotation.
pub const DELIMITER: char = ',';

/// Split an annotation into its ordered identifier list.
///
/// Whitespace around each identifier is trimmed and empty segments are
/// dropped, so `" trim,, lower "` yields `["trim", "lower"]`.
#[must_use]
pub fn parse(annotation: &str) -> Vec<&str> {
    annotation
        .split(DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Check that `identifier` could appear in an annotation and survive `parse`
/// unchanged.
pub fn check_identifier(identifier: &str) -> Result<(), IdentifierFault> {
    if identifier.is_empty() {
        return Err(IdentifierFault::Empty);
    }
    if identifier.contains(DELIMITER) {
        return Err(IdentifierFault::Delimiter);
    }
    if identifier.chars().any(char::is_whitespace) {
        return Err(IdentifierFault::Whitespace);
    }

    Ok(())
}
