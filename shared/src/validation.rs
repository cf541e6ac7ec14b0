//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! entity `validate()` methods before anything is sent to the backend.

use chrono::NaiveDate;
use validator::ValidateEmail;

use crate::error::{ModelError, ModelResult};

// ── Text length limits ──────────────────────────────────────────────

/// Person and entity names: nome, sobrenome, department, position, benefit
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, reasons, comments, attendance notes
pub const MAX_NOTE_LEN: usize = 1000;

/// Short identifiers: BI, phone, level codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Lowest and highest performance rating
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ModelResult<()> {
    if value.trim().is_empty() {
        return Err(ModelError::validation(field, "must not be empty"));
    }
    if value.len() > max_len {
        return Err(ModelError::validation(
            field,
            format!("is too long ({} chars, max {max_len})", value.len()),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> ModelResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(ModelError::validation(
            field,
            format!("is too long ({} chars, max {max_len})", v.len()),
        ));
    }
    Ok(())
}

/// Validate an optional email address. Blank strings count as absent.
pub fn validate_optional_email(value: &Option<String>, field: &str) -> ModelResult<()> {
    let Some(email) = value.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };
    if email.len() > MAX_EMAIL_LEN || !email.validate_email() {
        return Err(ModelError::validation(field, "malformed email address"));
    }
    Ok(())
}

/// Validate that `end` is not before `start`. An absent end is open-ended.
pub fn validate_date_range(
    start: NaiveDate,
    end: Option<NaiveDate>,
    field: &str,
) -> ModelResult<()> {
    if let Some(end) = end
        && end < start
    {
        return Err(ModelError::InvalidRange {
            field: field.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// Validate a 1..=5 performance rating.
pub fn validate_rating(value: u8, field: &str) -> ModelResult<()> {
    if !(RATING_MIN..=RATING_MAX).contains(&value) {
        return Err(ModelError::validation(
            field,
            format!("rating {value} outside {RATING_MIN}..={RATING_MAX}"),
        ));
    }
    Ok(())
}
