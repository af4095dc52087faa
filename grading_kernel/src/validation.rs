/// Grading Kernel — Input Validation
///
/// Every check returns a typed `ValidationError`; nothing here panics.
/// `Display` on the error is the exact text shown to the user.

use thiserror::Error;

use crate::domain::{MAX_ATTEMPTS, MAX_SCORE, MIN_SCORE};

/// A user-input problem. Always recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a valid name (letters only)")]
    InvalidName,

    #[error("Enter an attempt from 1-4")]
    InvalidAttemptCount,

    /// Score text at `index` (0-based) is not a non-negative integer.
    #[error("Enter a valid Score {} (0-100)", .index + 1)]
    InvalidScore { index: usize },

    /// Score at `index` (0-based) parsed but lies outside 0..=100.
    #[error("Score {} must be between 0 and 100", .index + 1)]
    InvalidScoreRange { index: usize },
}

impl ValidationError {
    /// 0-based slot index for score failures.
    pub fn score_index(&self) -> Option<usize> {
        match self {
            ValidationError::InvalidScore { index }
            | ValidationError::InvalidScoreRange { index } => Some(*index),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Trimmed name of letters and interior spaces. Returns the trimmed form.
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    if !name.chars().all(|ch| ch == ' ' || ch.is_alphabetic()) {
        return Err(ValidationError::InvalidName);
    }
    Ok(name.to_string())
}

/// Attempt count in `1..=MAX_ATTEMPTS`.
pub fn parse_attempt_count(raw: &str) -> Result<usize, ValidationError> {
    let count = parse_digits(raw.trim()).ok_or(ValidationError::InvalidAttemptCount)?;
    match count {
        Some(n) if (1..=MAX_ATTEMPTS as u64).contains(&n) => Ok(n as usize),
        _ => Err(ValidationError::InvalidAttemptCount),
    }
}

/// Score for slot `index` in `MIN_SCORE..=MAX_SCORE`.
pub fn parse_score(index: usize, raw: &str) -> Result<u8, ValidationError> {
    let value = parse_digits(raw.trim()).ok_or(ValidationError::InvalidScore { index })?;
    match value {
        Some(v) if (u64::from(MIN_SCORE)..=u64::from(MAX_SCORE)).contains(&v) => Ok(v as u8),
        _ => Err(ValidationError::InvalidScoreRange { index }),
    }
}

/// How many score fields the form should show for the given count text.
///
/// Non-numeric text hides every field without an error. A numeric count
/// outside `1..=MAX_ATTEMPTS` hides every field and reports the error.
pub fn visible_score_fields(raw: &str) -> Result<usize, ValidationError> {
    match parse_digits(raw.trim()) {
        None => Ok(0),
        Some(_) => parse_attempt_count(raw),
    }
}

// ---------------------------------------------------------------------------
// Helpers (private)
// ---------------------------------------------------------------------------

/// `None` if `s` is not a non-empty run of ASCII digits. Digits from
/// other scripts (Arabic-Indic, fullwidth) count as non-numeric.
/// `Some(None)` if it is, but overflows `u64`.
fn parse_digits(s: &str) -> Option<Option<u64>> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse::<u64>().ok())
}
