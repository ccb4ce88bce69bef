//! Shared validation helpers.

/// Push an error if `value` is below `min`.
pub(crate) fn validate_min(errors: &mut Vec<String>, name: &str, value: usize, min: usize) {
    if value < min {
        errors.push(format!("{name} = {value} must be >= {min}"));
    }
}
