use chronoframe_core::{ChronoError, MemberFailure};

/// Check a member name against the identifier rule: a letter or underscore
/// followed by letters, digits or underscores.
///
/// # Errors
/// Returns `InvalidIdentifier` naming the rejected string.
pub fn validate_identifier(name: &str) -> Result<(), ChronoError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ChronoError::invalid_identifier(name))
    }
}

/// Collapse per-member failures into one outcome.
///
/// Rules:
/// - No failures → `Ok(())`.
/// - Otherwise → `MembersFailed` with the failures in the order given.
///
/// # Errors
/// Returns the composite error when `failures` is not empty.
pub fn collapse_failures(failures: Vec<MemberFailure>) -> Result<(), ChronoError> {
    if failures.is_empty() {
        return Ok(());
    }
    Err(ChronoError::MembersFailed(failures))
}
