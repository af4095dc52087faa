#![forbid(unsafe_code)]

//! Grading Kernel — pure rules for grading submissions.
//!
//! No I/O lives here. Validation, slot layout and averaging are
//! deterministic functions of the raw form text.

pub mod arithmetic;
pub mod domain;
pub mod validation;
pub mod submission;

pub use domain::{FinalScore, Record, ScoreSlots, HEADER, MAX_ATTEMPTS};
pub use submission::Submission;
pub use validation::ValidationError;
