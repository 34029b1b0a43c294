//! Grading scheme configuration.
//!
//! # Responsibility
//! - Hold the score bounds and grade thresholds used by derived fields.
//! - Map a percentage onto a letter grade.
//!
//! # Invariants
//! - `max_total()` is never zero for a validated scheme.
//! - Thresholds are inclusive lower bounds, strictly descending A > B > C > D.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of coursework components per student.
pub const COMPONENT_COUNT: usize = 3;

/// Letter grade derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Inclusive lower percentage bounds per grade. Below `d` is `F`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            a: 70.0,
            b: 60.0,
            c: 50.0,
            d: 40.0,
        }
    }
}

/// Score bounds and grade thresholds.
///
/// Missing JSON fields fall back to defaults, so a partial override such as
/// `{"exam_max": 80}` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingScheme {
    /// Upper bound for each coursework component.
    pub component_max: u32,
    /// Upper bound for the exam score.
    pub exam_max: u32,
    pub thresholds: GradeThresholds,
}

impl Default for GradingScheme {
    fn default() -> Self {
        Self {
            component_max: 20,
            exam_max: 100,
            thresholds: GradeThresholds::default(),
        }
    }
}

impl GradingScheme {
    /// Maximum achievable coursework total.
    pub fn coursework_max(&self) -> u64 {
        u64::from(self.component_max) * COMPONENT_COUNT as u64
    }

    /// Maximum achievable grand total (coursework plus exam).
    pub fn max_total(&self) -> u64 {
        self.coursework_max() + u64::from(self.exam_max)
    }

    /// Converts a grand total into a percentage rounded to 2 decimals.
    pub fn percentage(&self, grand_total: u64) -> f64 {
        round2(self.raw_percentage(grand_total))
    }

    /// Unrounded percentage, used when aggregating across students.
    pub fn raw_percentage(&self, grand_total: u64) -> f64 {
        (grand_total as f64 / self.max_total() as f64) * 100.0
    }

    /// Maps a percentage onto a grade, highest threshold first.
    pub fn grade_for(&self, percentage: f64) -> Grade {
        let t = &self.thresholds;
        if percentage >= t.a {
            Grade::A
        } else if percentage >= t.b {
            Grade::B
        } else if percentage >= t.c {
            Grade::C
        } else if percentage >= t.d {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Validates scheme-level invariants.
    pub fn validate(&self) -> Result<(), SchemeError> {
        if self.max_total() == 0 {
            return Err(SchemeError::ZeroMaxTotal);
        }
        let t = &self.thresholds;
        let ordered = [t.a, t.b, t.c, t.d];
        if ordered.iter().any(|value| !value.is_finite())
            || ordered.windows(2).any(|pair| pair[0] <= pair[1])
        {
            return Err(SchemeError::ThresholdsNotDescending(*t));
        }
        Ok(())
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Grading scheme validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemeError {
    /// Component and exam maxima are all zero.
    ZeroMaxTotal,
    ThresholdsNotDescending(GradeThresholds),
}

impl Display for SchemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroMaxTotal => write!(f, "grading scheme has a zero maximum total"),
            Self::ThresholdsNotDescending(t) => write!(
                f,
                "grade thresholds must be finite and strictly descending, got A={} B={} C={} D={}",
                t.a, t.b, t.c, t.d
            ),
        }
    }
}

impl Error for SchemeError {}

#[cfg(test)]
mod tests {
    use super::{round2, Grade, GradeThresholds, GradingScheme, SchemeError};

    #[test]
    fn default_scheme_totals_160() {
        let scheme = GradingScheme::default();
        assert_eq!(scheme.coursework_max(), 60);
        assert_eq!(scheme.max_total(), 160);
        assert!(scheme.validate().is_ok());
    }

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        let scheme = GradingScheme::default();
        assert_eq!(scheme.grade_for(70.0), Grade::A);
        assert_eq!(scheme.grade_for(69.99), Grade::B);
        assert_eq!(scheme.grade_for(60.0), Grade::B);
        assert_eq!(scheme.grade_for(50.0), Grade::C);
        assert_eq!(scheme.grade_for(40.0), Grade::D);
        assert_eq!(scheme.grade_for(39.99), Grade::F);
        assert_eq!(scheme.grade_for(0.0), Grade::F);
    }

    #[test]
    fn full_marks_is_one_hundred_percent() {
        let scheme = GradingScheme::default();
        assert_eq!(scheme.percentage(160), 100.0);
        assert_eq!(scheme.percentage(0), 0.0);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(60.3125), 60.31);
        assert_eq!(round2(43.75), 43.75);
    }

    #[test]
    fn maximal_bounds_validate_without_overflow() {
        let scheme = GradingScheme {
            component_max: u32::MAX,
            exam_max: u32::MAX,
            ..GradingScheme::default()
        };
        assert!(scheme.validate().is_ok());
        assert_eq!(scheme.coursework_max(), 3 * u64::from(u32::MAX));
        assert_eq!(scheme.max_total(), 4 * u64::from(u32::MAX));
        assert_eq!(scheme.percentage(scheme.max_total()), 100.0);
    }

    #[test]
    fn validate_rejects_zero_total_and_unordered_thresholds() {
        let zero = GradingScheme {
            component_max: 0,
            exam_max: 0,
            ..GradingScheme::default()
        };
        assert_eq!(zero.validate(), Err(SchemeError::ZeroMaxTotal));

        let unordered = GradingScheme {
            thresholds: GradeThresholds {
                a: 60.0,
                b: 60.0,
                c: 50.0,
                d: 40.0,
            },
            ..GradingScheme::default()
        };
        assert!(matches!(
            unordered.validate(),
            Err(SchemeError::ThresholdsNotDescending(_))
        ));
    }

    #[test]
    fn grade_displays_as_letter() {
        assert_eq!(Grade::A.to_string(), "A");
        assert_eq!(Grade::F.to_string(), "F");
    }
}
