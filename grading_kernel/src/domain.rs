/// Grading Kernel — Core Domain Types
///
/// Pure data. No I/O.
/// Final scores are fixed-point hundredths (SCALE = 100), never float.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::arithmetic::SCALE;

/// Number of attempt slots in every record.
pub const MAX_ATTEMPTS: usize = 4;

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;

/// Fixed column layout of the persisted dataset.
pub const HEADER: [&str; 6] = ["Name", "Score 1", "Score 2", "Score 3", "Score 4", "Final"];

// ── Score slots ───────────────────────────────────────────────────

/// Fixed four-slot score layout. Unused attempts are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ScoreSlots([Option<u8>; MAX_ATTEMPTS]);

impl ScoreSlots {
    /// Fill positions `0..scores.len()` in order; the rest stay empty.
    /// Scores beyond `MAX_ATTEMPTS` are dropped.
    pub fn from_scores(scores: &[u8]) -> Self {
        let mut slots = [None; MAX_ATTEMPTS];
        for (slot, score) in slots.iter_mut().zip(scores) {
            *slot = Some(*score);
        }
        Self(slots)
    }

    pub fn from_array(slots: [Option<u8>; MAX_ATTEMPTS]) -> Self {
        Self(slots)
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied().flatten()
    }

    /// Present scores in slot order.
    pub fn filled(&self) -> Vec<u8> {
        self.0.iter().flatten().copied().collect()
    }

    pub fn filled_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_some()).count()
    }

    pub fn as_array(&self) -> &[Option<u8>; MAX_ATTEMPTS] {
        &self.0
    }
}

/// Same shape as the serialized form, but every present score must lie in
/// `MIN_SCORE..=MAX_SCORE`.
impl<'de> Deserialize<'de> for ScoreSlots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slots = <[Option<u8>; MAX_ATTEMPTS]>::deserialize(deserializer)?;
        if let Some((index, score)) = slots
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.filter(|v| !(MIN_SCORE..=MAX_SCORE).contains(v)).map(|v| (i, v)))
        {
            return Err(serde::de::Error::custom(format_args!(
                "score {} in slot {} is outside {}-{}",
                score,
                index + 1,
                MIN_SCORE,
                MAX_SCORE
            )));
        }
        Ok(Self(slots))
    }
}

// ── Final score ───────────────────────────────────────────────────

/// Average score in hundredths: `8750` is `87.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct FinalScore(i64);

impl FinalScore {
    pub const ZERO: FinalScore = FinalScore(0);

    pub fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub fn hundredths(&self) -> i64 {
        self.0
    }
}

/// Renders one or two fraction digits: `85.0`, `87.5`, `83.33`.
impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        if frac % 10 == 0 {
            write!(f, "{}{}.{}", sign, whole, frac / 10)
        } else {
            write!(f, "{}{}.{:02}", sign, whole, frac)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid final score {0:?}: expected a decimal with at most two fraction digits")]
pub struct ParseFinalScoreError(pub String);

impl FromStr for FinalScore {
    type Err = ParseFinalScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseFinalScoreError(s.to_string());
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };
        if whole.is_empty()
            || frac.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(bad());
        }
        let whole: i64 = whole.parse().map_err(|_| bad())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| bad())? * 10,
            _ => frac.parse().map_err(|_| bad())?,
        };
        let value = whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(bad)?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl Serialize for FinalScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FinalScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Record ────────────────────────────────────────────────────────

/// One persisted row. Appended once, never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub name: String,
    pub slots: ScoreSlots,
    pub final_score: FinalScore,
}

impl Record {
    /// Column values in `HEADER` order. Empty slots become `""`.
    pub fn fields(&self) -> [String; 6] {
        let slot = |i: usize| self.slots.get(i).map(|s| s.to_string()).unwrap_or_default();
        [
            self.name.clone(),
            slot(0),
            slot(1),
            slot(2),
            slot(3),
            self.final_score.to_string(),
        ]
    }
}
