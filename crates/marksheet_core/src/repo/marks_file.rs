//! Flat-file codec for student marks.
//!
//! # Responsibility
//! - Parse marks text into records plus per-line skip diagnostics.
//! - Render records back into canonical marks text.
//!
//! # Invariants
//! - Rendering always emits the count header followed by one line per
//!   record, each terminated by `\n`.
//! - Parsing never fails; malformed lines become `SkippedLine` entries.
//! - Canonical input renders back byte for byte.

use crate::model::student::{Student, StudentValidationError, FIELD_DELIMITER};
use once_cell::sync::Lazy;
use regex::Regex;

static COUNT_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid count header regex"));

/// One stored line that could not be turned into a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source text.
    pub line_number: usize,
    pub reason: StudentValidationError,
}

/// Result of parsing marks text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMarks {
    /// Records in file order.
    pub students: Vec<Student>,
    pub skipped: Vec<SkippedLine>,
    /// Value of the advisory count header, when one was present.
    pub declared_count: Option<usize>,
}

/// Parses marks text.
///
/// Lines are trimmed and blank lines dropped. When the first remaining line
/// is purely ASCII digits it is treated as the count header and skipped; its
/// value is reported but never enforced.
pub fn parse_marks(text: &str) -> ParsedMarks {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .peekable();

    let mut parsed = ParsedMarks::default();
    if let Some((_, first)) = lines.peek() {
        if COUNT_HEADER_RE.is_match(first) {
            parsed.declared_count = first.parse().ok();
            lines.next();
        }
    }

    for (line_number, line) in lines {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        match Student::parse_fields(fields.as_slice()) {
            Ok(student) => parsed.students.push(student),
            Err(reason) => parsed.skipped.push(SkippedLine {
                line_number,
                reason,
            }),
        }
    }

    parsed
}

/// Renders one record as a delimited line without terminator.
pub fn render_line(student: &Student) -> String {
    let [c1, c2, c3] = student.coursework;
    format!(
        "{id}{d}{name}{d}{c1}{d}{c2}{d}{c3}{d}{exam}",
        id = student.id,
        d = FIELD_DELIMITER,
        name = student.name,
        exam = student.exam,
    )
}

/// Renders the full marks file: count header, then one line per record.
pub fn render_marks(students: &[Student]) -> String {
    let mut out = students.len().to_string();
    out.push('\n');
    for student in students {
        out.push_str(&render_line(student));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{parse_marks, render_line, render_marks};
    use crate::model::student::{Student, StudentValidationError};

    #[test]
    fn parses_header_and_records() {
        let parsed = parse_marks("2\n1,Alice,15,18,20,70\n2,Bob,10,10,10,40\n");
        assert_eq!(parsed.declared_count, Some(2));
        assert_eq!(parsed.students.len(), 2);
        assert_eq!(parsed.students[0], Student::new(1, "Alice", [15, 18, 20], 70));
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn header_is_optional_and_not_enforced() {
        let without = parse_marks("1,Alice,15,18,20,70\n");
        assert_eq!(without.declared_count, None);
        assert_eq!(without.students.len(), 1);

        let wrong = parse_marks("9\n1,Alice,15,18,20,70\n");
        assert_eq!(wrong.declared_count, Some(9));
        assert_eq!(wrong.students.len(), 1);
    }

    #[test]
    fn blank_lines_and_surrounding_whitespace_are_ignored() {
        let parsed = parse_marks("\n  \n 1\n\n  3,Cy,1,2,3,4  \r\n\n");
        assert_eq!(parsed.declared_count, Some(1));
        assert_eq!(parsed.students, vec![Student::new(3, "Cy", [1, 2, 3], 4)]);
    }

    #[test]
    fn malformed_lines_are_skipped_with_line_numbers() {
        let parsed = parse_marks("3\n1,A,1,2,3,4\n2,B,1,2\n3,C,x,2,3,4\n4,D,1,2,3,4,5\n");
        assert_eq!(parsed.students.len(), 1);
        let numbers: Vec<usize> = parsed.skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
        assert_eq!(
            parsed.skipped[0].reason,
            StudentValidationError::WrongFieldCount(4)
        );
        assert!(matches!(
            parsed.skipped[1].reason,
            StudentValidationError::InvalidNumber { field: "cw1", .. }
        ));
    }

    #[test]
    fn only_the_first_line_can_be_a_header() {
        let parsed = parse_marks("1,A,1,2,3,4\n7\n");
        assert_eq!(parsed.declared_count, None);
        assert_eq!(parsed.students.len(), 1);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line_number, 2);
    }

    #[test]
    fn canonical_text_round_trips() {
        let text = "2\n1,Alice,15,18,20,70\n2,Bob,10,10,10,40\n";
        assert_eq!(render_marks(&parse_marks(text).students), text);
    }

    #[test]
    fn empty_collection_renders_zero_header() {
        assert_eq!(render_marks(&[]), "0\n");
        assert!(parse_marks("0\n").students.is_empty());
        assert!(parse_marks("").students.is_empty());
    }

    #[test]
    fn render_line_uses_field_order() {
        let student = Student::new(-4, "Dee", [1, 2, 3], 99);
        assert_eq!(render_line(&student), "-4,Dee,1,2,3,99");
    }
}
