//! Presentation boundary.
//!
//! The grader only sees a `FormView`: it pulls raw text out with
//! `get_form_values` and pushes the outcome back with `apply_result`.
//! `TerminalForm` is a line-oriented view over any reader/writer pair.

use std::io::{self, BufRead, Write};

use grading_kernel::domain::MAX_ATTEMPTS;
use grading_kernel::validation::visible_score_fields;

use crate::grader::SubmitResult;

pub const SUCCESS_MESSAGE: &str = "Submitted";

/// Raw, unvalidated form text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub attempts: String,
    pub scores: Vec<String>,
}

/// A presentation layer the grader can drive.
pub trait FormView {
    fn get_form_values(&mut self) -> FormValues;

    /// Show the outcome. On success the view resets its own fields.
    fn apply_result(&mut self, result: &SubmitResult);
}

/// User-facing status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Error(String),
}

impl Status {
    pub fn from_result(result: &SubmitResult) -> Self {
        match result {
            Ok(_) => Status::Success(SUCCESS_MESSAGE.to_string()),
            Err(e) => Status::Error(e.to_string()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Status::Success(m) | Status::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

pub fn status_message(result: &SubmitResult) -> String {
    Status::from_result(result).message().to_string()
}

// ---------------------------------------------------------------------------
// Terminal view
// ---------------------------------------------------------------------------

/// Prompts for one form per `prompt` call and prints the status line.
pub struct TerminalForm<R, W> {
    input: R,
    output: W,
    values: FormValues,
    last_status: Option<Status>,
    write_error: Option<io::Error>,
}

impl<R: BufRead, W: Write> TerminalForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            values: FormValues::default(),
            last_status: None,
            write_error: None,
        }
    }

    /// Fill the form from input. Returns `false` on end of input.
    ///
    /// Score prompts appear only for a count in `1..=MAX_ATTEMPTS`.
    pub fn prompt(&mut self) -> io::Result<bool> {
        if let Some(e) = self.write_error.take() {
            return Err(e);
        }

        let Some(name) = self.ask("Student name: ")? else {
            return Ok(false);
        };
        let Some(attempts) = self.ask("No. of attempts: ")? else {
            return Ok(false);
        };

        let shown = match visible_score_fields(&attempts) {
            Ok(n) => n,
            Err(e) => {
                writeln!(self.output, "{}", e)?;
                0
            }
        };

        let mut scores = Vec::with_capacity(MAX_ATTEMPTS);
        for i in 0..shown {
            let Some(score) = self.ask(&format!("Score {}: ", i + 1))? else {
                return Ok(false);
            };
            scores.push(score);
        }

        self.values = FormValues {
            name,
            attempts,
            scores,
        };
        Ok(true)
    }

    pub fn last_status(&self) -> Option<&Status> {
        self.last_status.as_ref()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        Ok(Some(trimmed.to_string()))
    }
}

impl<R: BufRead, W: Write> FormView for TerminalForm<R, W> {
    fn get_form_values(&mut self) -> FormValues {
        self.values.clone()
    }

    fn apply_result(&mut self, result: &SubmitResult) {
        let status = Status::from_result(result);
        if let Err(e) = writeln!(self.output, "{}", status.message()) {
            self.write_error.get_or_insert(e);
        }
        if !status.is_error() {
            self.values = FormValues::default();
        }
        self.last_status = Some(status);
    }
}
