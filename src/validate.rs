//! Page-count input validation
//!
//! The host UI binds the page-count form field to this check before a run is
//! started. It is a plain function so it can be reused outside any UI event
//! mechanism.

use thiserror::Error;

/// Validation failure for the page-count field, carrying the user-facing
/// message as its display form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field is empty.")]
    Empty,

    #[error("Only numbers are allowed.")]
    NotNumeric,

    #[error("Enter a number higher than 0.")]
    Zero,

    #[error("Value cannot be parsed to a number.")]
    Unparseable,
}

/// Validate a raw page-count input.
///
/// Rules, in order: the value must be non-blank, consist of digits only,
/// and parse to a positive integer. Values that are all digits but overflow
/// the integer range are rejected as unparseable. There is no upper bound
/// below that.
pub fn validate_page_count(raw: &str) -> Result<u32, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric);
    }
    match raw.parse::<u32>() {
        Ok(0) => Err(ValidationError::Zero),
        Ok(n) => Ok(n),
        Err(_) => Err(ValidationError::Unparseable),
    }
}
