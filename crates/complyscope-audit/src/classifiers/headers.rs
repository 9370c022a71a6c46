//! Security header presence.

use crate::error::ClassifyError;
use crate::finding::{Finding, ModuleId};
use crate::signals::ResponseHeaders;

/// Check that every required header is present, ignoring case.
///
/// Missing headers are a `Risk`, never a `Violation`.
///
/// # Errors
/// Returns [`ClassifyError::MalformedHeader`] if a received header name is
/// not a valid HTTP token.
pub fn classify(
    headers: &ResponseHeaders,
    required: &[String],
    citation: &str,
) -> Result<Finding, ClassifyError> {
    headers.validate()?;

    let (present, missing): (Vec<String>, Vec<String>) = required
        .iter()
        .cloned()
        .partition(|name| headers.contains(name));

    if missing.is_empty() {
        Ok(Finding::pass(
            ModuleId::SecurityHeaders,
            format!("{citation}: All required security headers present"),
            present,
        ))
    } else {
        Ok(Finding::risk(
            ModuleId::SecurityHeaders,
            format!("{citation}: Missing {} security headers", missing.len()),
            missing,
        ))
    }
}
