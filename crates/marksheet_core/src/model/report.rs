//! Human-readable student report.

use crate::model::grading::GradingScheme;
use crate::model::student::Student;
use std::fmt::{Display, Formatter};

/// Multi-line report for one student, rendered against a grading scheme.
pub struct StudentReport<'a> {
    student: &'a Student,
    scheme: &'a GradingScheme,
}

impl<'a> StudentReport<'a> {
    pub fn new(student: &'a Student, scheme: &'a GradingScheme) -> Self {
        Self { student, scheme }
    }
}

impl Display for StudentReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self.student;
        let scheme = self.scheme;
        writeln!(f, "Name: {}", s.name)?;
        writeln!(f, "Code: {}", s.id)?;
        writeln!(
            f,
            "Coursework: {}/{}",
            s.coursework_total(),
            scheme.coursework_max()
        )?;
        writeln!(f, "Exam: {}/{}", s.exam, scheme.exam_max)?;
        writeln!(f, "Total: {}/{}", s.grand_total(), scheme.max_total())?;
        writeln!(f, "Percentage: {}%", s.percentage(scheme))?;
        writeln!(f, "Grade: {}", s.grade(scheme))
    }
}
