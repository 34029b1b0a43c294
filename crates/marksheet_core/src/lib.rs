//! Core domain logic for Marksheet.
//! This crate is the single source of truth for student record invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::grading::{Grade, GradeThresholds, GradingScheme, SchemeError};
pub use model::report::StudentReport;
pub use model::student::{Student, StudentId, StudentValidationError};
pub use repo::marks_file::{parse_marks, render_marks, ParsedMarks, SkippedLine};
pub use repo::student_repo::{
    FileStudentRepository, LoadReport, RepoError, RepoResult, StudentRepository,
};
pub use service::student_service::{ClassSummary, SortDirection, StudentService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
