//! Validation for catalog items (beats, soundkits, albums, licenses).
//!
//! Handlers call these before building create/update DTOs so the
//! repositories only ever see well-formed input.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Maximum length of an item title (characters).
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length of an item description (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Maximum length of a credit line (`co_prod`, `prod_by`).
pub const MAX_CREDIT_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate a title: non-blank and at most [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_credit(field: &str, value: &str) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > MAX_CREDIT_LENGTH {
        return Err(CoreError::Validation(format!(
            "'{field}' exceeds maximum length of {MAX_CREDIT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate a price string: a non-negative decimal with at most two
/// fractional digits, e.g. `"10"`, `"19.99"`.
pub fn validate_price(price: &str) -> Result<(), CoreError> {
    let invalid = || {
        CoreError::Validation(format!(
            "Invalid price '{price}'. Expected a non-negative amount like 19.99"
        ))
    };

    let (whole, fraction) = match price.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (price, None),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if let Some(f) = fraction {
        if f.is_empty() || f.len() > 2 || !f.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
