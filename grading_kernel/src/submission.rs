/// Grading Kernel — Submission
///
/// A `Submission` exists only after every field has passed validation.
/// Validation order (first failure wins):
///   1. name
///   2. attempt count
///   3. scores `0..count`, in order

use crate::arithmetic::average;
use crate::domain::{FinalScore, Record, ScoreSlots};
use crate::validation::{parse_attempt_count, parse_score, validate_name, ValidationError};

/// A fully validated form entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    name: String,
    scores: Vec<u8>,
}

impl Submission {
    /// Validate raw form text.
    ///
    /// Score texts past the attempt count are ignored. Missing ones are
    /// treated as empty input.
    pub fn parse<S: AsRef<str>>(
        name: &str,
        attempt_text: &str,
        score_texts: &[S],
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        let count = parse_attempt_count(attempt_text)?;

        let mut scores = Vec::with_capacity(count);
        for index in 0..count {
            let text = score_texts.get(index).map(|t| t.as_ref()).unwrap_or("");
            scores.push(parse_score(index, text)?);
        }

        Ok(Self { name, scores })
    }

    /// Trimmed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attempt_count(&self) -> usize {
        self.scores.len()
    }

    pub fn scores(&self) -> &[u8] {
        &self.scores
    }

    pub fn slots(&self) -> ScoreSlots {
        ScoreSlots::from_scores(&self.scores)
    }

    /// Mean of the filled attempts only.
    pub fn final_score(&self) -> FinalScore {
        average(&self.scores)
    }

    pub fn into_record(self) -> Record {
        let slots = self.slots();
        let final_score = self.final_score();
        Record {
            name: self.name,
            slots,
            final_score,
        }
    }
}
