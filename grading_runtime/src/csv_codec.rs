//! CSV Codec — grading rows to and from comma-separated text.
//!
//! Pure codec layer. No file I/O.
//!
//! - Delimiter `,`, row terminator `\r\n`
//! - Minimal quoting: a field is quoted only if it holds `,` `"` `\r` or `\n`
//! - Embedded quotes are doubled
//! - `record_to_row` / `row_to_record`: strict six-column mapping

use thiserror::Error;

use grading_kernel::domain::{FinalScore, Record, ScoreSlots, HEADER, MAX_ATTEMPTS, MAX_SCORE, MIN_SCORE};

pub const DELIMITER: char = ',';
pub const QUOTE: char = '"';
pub const TERMINATOR: &str = "\r\n";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unterminated quoted field")]
    UnterminatedQuote,

    #[error("unexpected character {0:?} after closing quote")]
    TrailingAfterQuote(char),

    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column {column:?}: {reason}")]
    BadField { column: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\r', '\n'])
}

fn encode_field(field: &str, out: &mut String) {
    if needs_quoting(field) {
        out.push(QUOTE);
        for ch in field.chars() {
            if ch == QUOTE {
                out.push(QUOTE);
            }
            out.push(ch);
        }
        out.push(QUOTE);
    } else {
        out.push_str(field);
    }
}

/// Encode one row, terminator included.
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        encode_field(field.as_ref(), &mut out);
    }
    out.push_str(TERMINATOR);
    out
}

/// The header row, terminator included.
pub fn header_row() -> String {
    encode_row(&HEADER)
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Decode every row in `text`. Quoted fields may span lines.
///
/// Accepts `\r\n` or bare `\n` terminators. A trailing terminator does
/// not produce an empty final row.
pub fn decode_rows(text: &str) -> Result<Vec<Vec<String>>, CodecError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut row_started = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                    after_quote = true;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            DELIMITER => {
                row.push(std::mem::take(&mut field));
                after_quote = false;
                row_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                after_quote = false;
                row_started = false;
            }
            QUOTE if field.is_empty() && !after_quote => {
                in_quotes = true;
                row_started = true;
            }
            other => {
                if after_quote {
                    return Err(CodecError::TrailingAfterQuote(other));
                }
                field.push(other);
                row_started = true;
            }
        }
    }

    if in_quotes {
        return Err(CodecError::UnterminatedQuote);
    }
    if row_started || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Record mapping
// ---------------------------------------------------------------------------

pub fn record_to_row(record: &Record) -> String {
    encode_row(&record.fields())
}

/// Strict inverse of `record_to_row`.
pub fn row_to_record(row: &[String]) -> Result<Record, CodecError> {
    if row.len() != HEADER.len() {
        return Err(CodecError::ColumnCount {
            expected: HEADER.len(),
            found: row.len(),
        });
    }

    let mut slots = [None; MAX_ATTEMPTS];
    for (i, slot) in slots.iter_mut().enumerate() {
        let text = &row[i + 1];
        if text.is_empty() {
            continue;
        }
        let score: u8 = text.parse().map_err(|_| CodecError::BadField {
            column: HEADER[i + 1],
            reason: format!("{:?} is not a score", text),
        })?;
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(CodecError::BadField {
                column: HEADER[i + 1],
                reason: format!("{} is outside {}-{}", score, MIN_SCORE, MAX_SCORE),
            });
        }
        *slot = Some(score);
    }

    let final_score: FinalScore = row[5].parse().map_err(|e| CodecError::BadField {
        column: HEADER[5],
        reason: format!("{}", e),
    })?;

    Ok(Record {
        name: row[0].clone(),
        slots: ScoreSlots::from_array(slots),
        final_score,
    })
}
