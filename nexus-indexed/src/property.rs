//! Property expression validation.
//!
//! An accessor is registered under the expression it reads, e.g. `group` or
//! `address.city`. The closure itself is opaque, so the expression is the
//! only thing that can be checked: it must be a plain property read, a
//! non-empty dotted path of identifiers. Literals (`42`, `"a"`, `true`),
//! calls and operators are rejected.

use crate::Error;

const LITERAL_KEYWORDS: &[&str] = &["true", "false", "null", "None"];

/// Checks that `expr` is a simple property read.
///
/// # Errors
///
/// Returns [`Error::InvalidProperty`] if `expr` is not a dotted identifier
/// path.
pub(crate) fn validate(expr: &str) -> Result<(), Error> {
    if expr.is_empty() || !expr.split('.').all(is_property_segment) {
        return Err(Error::InvalidProperty {
            name: expr.to_owned(),
        });
    }
    Ok(())
}

fn is_property_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') || segment == "_" {
        return false;
    }
    if LITERAL_KEYWORDS.contains(&segment) {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
