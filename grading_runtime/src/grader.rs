//! Grader — the single submission entry point.
//!
//! Validate-before-persist order:
//!   1. Submission::parse(..)  — typed ValidationError, no side effects
//!   2. record_store.append()  — only if step 1 succeeded
//!
//! A storage failure is logged and returned as `SubmitError::Persistence`.
//! It is never reported as a successful submission.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, error};

use grading_kernel::domain::Record;
use grading_kernel::submission::Submission;
use grading_kernel::validation::ValidationError;

use crate::form::FormView;
use crate::record_store::{PersistenceError, RecordStore};

/// Why a submission did not produce a stored record.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Rejected input. The message is shown to the user verbatim.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not save record: {0}")]
    Persistence(#[from] PersistenceError),
}

impl SubmitError {
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            SubmitError::Validation(e) => Some(*e),
            SubmitError::Persistence(_) => None,
        }
    }
}

pub type SubmitResult = Result<Record, SubmitError>;

/// Validates raw form text and appends accepted records to one store.
pub struct Grader {
    store: RecordStore,
}

impl Grader {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Validate and persist one submission. Returns the stored record.
    pub fn submit<S: AsRef<str>>(
        &self,
        name: &str,
        attempt_text: &str,
        score_texts: &[S],
    ) -> SubmitResult {
        let submission = match Submission::parse(name, attempt_text, score_texts) {
            Ok(submission) => submission,
            Err(e) => {
                debug!(error = %e, "submission rejected");
                return Err(e.into());
            }
        };

        let record = submission.into_record();
        if let Err(e) = self.store.append(&record) {
            error!(
                path = %self.store.path().display(),
                error = %e,
                "failed to persist grading record"
            );
            return Err(e.into());
        }
        Ok(record)
    }

    /// Pull values from the view, submit, and hand the outcome back.
    pub fn handle(&self, view: &mut dyn FormView) -> SubmitResult {
        let values = view.get_form_values();
        let result = self.submit(&values.name, &values.attempts, &values.scores);
        view.apply_result(&result);
        result
    }
}

/// Thread-safe grader. Writes are serialized through a single lock.
pub struct SharedGrader {
    inner: Mutex<Grader>,
}

impl SharedGrader {
    pub fn new(grader: Grader) -> Self {
        Self {
            inner: Mutex::new(grader),
        }
    }

    /// Submit under lock.
    pub fn submit<S: AsRef<str>>(
        &self,
        name: &str,
        attempt_text: &str,
        score_texts: &[S],
    ) -> SubmitResult {
        // Rows are written whole; a poisoned lock guards no partial state.
        let grader = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        grader.submit(name, attempt_text, score_texts)
    }

    /// Handle a view under lock.
    pub fn handle(&self, view: &mut dyn FormView) -> SubmitResult {
        let grader = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        grader.handle(view)
    }
}
