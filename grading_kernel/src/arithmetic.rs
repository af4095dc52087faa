/// Grading Kernel — Arithmetic Primitives
///
/// Final scores are i64 fixed-point hundredths (SCALE = 100).
/// No float. No f64. No f32.

use crate::domain::FinalScore;

/// Fixed-point scale factor: two fraction digits.
pub const SCALE: i64 = 100;

/// Integer division rounding half away from zero.
pub fn div_round_half_away(numerator: i64, denominator: i64) -> i64 {
    assert!(denominator != 0, "Division by zero in div_round_half_away");
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if 2 * remainder.abs() >= denominator.abs() {
        if (numerator < 0) != (denominator < 0) {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    }
}

/// Arithmetic mean rounded to two fraction digits. Empty input gives `0.0`.
pub fn average(scores: &[u8]) -> FinalScore {
    if scores.is_empty() {
        return FinalScore::ZERO;
    }
    let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    FinalScore::from_hundredths(div_round_half_away(sum * SCALE, scores.len() as i64))
}

/// Mean of already-scaled final scores, rounded the same way.
pub fn mean_of(finals: &[FinalScore]) -> FinalScore {
    if finals.is_empty() {
        return FinalScore::ZERO;
    }
    let sum: i64 = finals.iter().map(FinalScore::hundredths).sum();
    FinalScore::from_hundredths(div_round_half_away(sum, finals.len() as i64))
}
