//! Student record domain model.
//!
//! # Responsibility
//! - Define the canonical student record and its derived score fields.
//! - Parse raw text fields into a record and validate write-path input.
//!
//! # Invariants
//! - Derived fields (`coursework_total`, `grand_total`, percentage, grade)
//!   are always computed, never stored.
//! - Names written to storage never contain the field delimiter or a line
//!   break; the marks file has no escaping.

use crate::model::grading::{Grade, GradingScheme, COMPONENT_COUNT};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Student code, unique within one live collection.
pub type StudentId = i64;

/// Field delimiter used by the marks file and by raw field input.
pub const FIELD_DELIMITER: char = ',';

/// Number of fields in one raw student record.
pub const FIELD_COUNT: usize = 2 + COMPONENT_COUNT + 1;

const FIELD_NAMES: [&str; FIELD_COUNT] = ["id", "name", "cw1", "cw2", "cw3", "exam"];

/// One student's marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Coursework component scores in entry order.
    pub coursework: [u32; COMPONENT_COUNT],
    pub exam: u32,
}

impl Student {
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        coursework: [u32; COMPONENT_COUNT],
        exam: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            coursework,
            exam,
        }
    }

    /// Parses `[id, name, cw1, cw2, cw3, exam]` text fields.
    ///
    /// Numeric fields tolerate surrounding whitespace; the name is kept as-is.
    ///
    /// # Errors
    /// - `WrongFieldCount` when `fields.len() != FIELD_COUNT`.
    /// - `InvalidNumber` naming the first field that is not an integer.
    pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, StudentValidationError> {
        if fields.len() != FIELD_COUNT {
            return Err(StudentValidationError::WrongFieldCount(fields.len()));
        }

        let id = parse_number::<StudentId>(fields[0].as_ref(), FIELD_NAMES[0])?;
        let mut coursework = [0u32; COMPONENT_COUNT];
        for (index, slot) in coursework.iter_mut().enumerate() {
            *slot = parse_number::<u32>(fields[2 + index].as_ref(), FIELD_NAMES[2 + index])?;
        }
        let exam = parse_number::<u32>(fields[FIELD_COUNT - 1].as_ref(), FIELD_NAMES[5])?;

        Ok(Self::new(id, fields[1].as_ref(), coursework, exam))
    }

    /// Sum of the coursework components.
    ///
    /// Widened to `u64` since stored scores are not bounds-checked on load.
    pub fn coursework_total(&self) -> u64 {
        self.coursework.iter().copied().map(u64::from).sum()
    }

    /// Coursework total plus exam score.
    pub fn grand_total(&self) -> u64 {
        self.coursework_total() + u64::from(self.exam)
    }

    /// Grand total as a percentage of `scheme.max_total()`, 2 decimals.
    pub fn percentage(&self, scheme: &GradingScheme) -> f64 {
        scheme.percentage(self.grand_total())
    }

    pub fn grade(&self, scheme: &GradingScheme) -> Grade {
        scheme.grade_for(self.percentage(scheme))
    }

    /// Validates write-path invariants against the grading scheme.
    pub fn validate(&self, scheme: &GradingScheme) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if self
            .name
            .contains(|c: char| c == FIELD_DELIMITER || c == '\n' || c == '\r')
        {
            return Err(StudentValidationError::NameContainsDelimiter(
                self.name.clone(),
            ));
        }
        for (index, value) in self.coursework.iter().copied().enumerate() {
            if value > scheme.component_max {
                return Err(StudentValidationError::ComponentOutOfRange {
                    index: index + 1,
                    value,
                    max: scheme.component_max,
                });
            }
        }
        if self.exam > scheme.exam_max {
            return Err(StudentValidationError::ExamOutOfRange {
                value: self.exam,
                max: scheme.exam_max,
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: &str,
    field: &'static str,
) -> Result<T, StudentValidationError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| StudentValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Student input/validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    /// Raw record did not have exactly `FIELD_COUNT` fields.
    WrongFieldCount(usize),
    /// A numeric field did not parse as an integer.
    InvalidNumber { field: &'static str, value: String },
    EmptyName,
    NameContainsDelimiter(String),
    /// `index` is 1-based.
    ComponentOutOfRange { index: usize, value: u32, max: u32 },
    ExamOutOfRange { value: u32, max: u32 },
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongFieldCount(count) => {
                write!(f, "expected {FIELD_COUNT} fields, got {count}")
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "field `{field}` must be an integer, got `{value}`")
            }
            Self::EmptyName => write!(f, "student name cannot be empty"),
            Self::NameContainsDelimiter(name) => write!(
                f,
                "student name `{}` cannot contain `{FIELD_DELIMITER}` or line breaks",
                name.escape_debug()
            ),
            Self::ComponentOutOfRange { index, value, max } => {
                write!(f, "coursework {index} score {value} exceeds maximum {max}")
            }
            Self::ExamOutOfRange { value, max } => {
                write!(f, "exam score {value} exceeds maximum {max}")
            }
        }
    }
}

impl Error for StudentValidationError {}

#[cfg(test)]
mod tests {
    use super::{Student, StudentValidationError};
    use crate::model::grading::{Grade, GradingScheme};

    #[test]
    fn derived_totals() {
        let student = Student::new(1, "Alice", [15, 18, 20], 70);
        assert_eq!(student.coursework_total(), 53);
        assert_eq!(student.grand_total(), 123);
    }

    #[test]
    fn totals_do_not_overflow_for_maximal_scores() {
        let student = Student::new(1, "Big", [u32::MAX, u32::MAX, u32::MAX], u32::MAX);
        assert_eq!(student.coursework_total(), 3 * u64::from(u32::MAX));
        assert_eq!(student.grand_total(), 4 * u64::from(u32::MAX));
        assert_eq!(student.grade(&GradingScheme::default()), Grade::A);
    }

    #[test]
    fn full_marks_is_grade_a() {
        let scheme = GradingScheme::default();
        let student = Student::new(7, "Top", [20, 20, 20], 100);
        assert_eq!(student.percentage(&scheme), 100.0);
        assert_eq!(student.grade(&scheme), Grade::A);
    }

    #[test]
    fn parse_fields_trims_numbers_but_not_name() {
        let student = Student::parse_fields(&[" 12", " Bob ", "1", " 2 ", "3", "40 "]).unwrap();
        assert_eq!(student.id, 12);
        assert_eq!(student.name, " Bob ");
        assert_eq!(student.coursework, [1, 2, 3]);
        assert_eq!(student.exam, 40);
    }

    #[test]
    fn parse_fields_reports_first_bad_number() {
        let err = Student::parse_fields(&["1", "Bob", "1", "x", "3", "y"]).unwrap_err();
        assert_eq!(
            err,
            StudentValidationError::InvalidNumber {
                field: "cw2",
                value: "x".to_string()
            }
        );

        let negative = Student::parse_fields(&["1", "Bob", "-1", "2", "3", "4"]).unwrap_err();
        assert!(matches!(
            negative,
            StudentValidationError::InvalidNumber { field: "cw1", .. }
        ));
    }

    #[test]
    fn parse_fields_rejects_wrong_count() {
        let err = Student::parse_fields(&["1", "Bob"]).unwrap_err();
        assert_eq!(err, StudentValidationError::WrongFieldCount(2));
    }

    #[test]
    fn validate_enforces_bounds_and_name_rules() {
        let scheme = GradingScheme::default();
        assert!(Student::new(1, "Ok", [20, 0, 5], 100)
            .validate(&scheme)
            .is_ok());

        let err = Student::new(1, "Ok", [20, 21, 5], 10)
            .validate(&scheme)
            .unwrap_err();
        assert_eq!(
            err,
            StudentValidationError::ComponentOutOfRange {
                index: 2,
                value: 21,
                max: 20
            }
        );

        assert!(matches!(
            Student::new(1, "Ok", [0, 0, 0], 101).validate(&scheme),
            Err(StudentValidationError::ExamOutOfRange { value: 101, .. })
        ));
        assert_eq!(
            Student::new(1, "  ", [0, 0, 0], 0).validate(&scheme),
            Err(StudentValidationError::EmptyName)
        );
        assert!(matches!(
            Student::new(1, "Smith, J", [0, 0, 0], 0).validate(&scheme),
            Err(StudentValidationError::NameContainsDelimiter(_))
        ));
    }
}
