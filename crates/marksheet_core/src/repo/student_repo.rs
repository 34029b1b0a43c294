//! Student repository contracts and flat-file implementation.
//!
//! # Responsibility
//! - Load the whole student collection from storage and rewrite it wholesale.
//! - Keep file-format details inside the persistence boundary.
//!
//! # Invariants
//! - A missing marks file is created empty on load, never treated as an error.
//! - Every save fully rewrites the file; there is no append log or atomic
//!   rename, so a crash mid-write can leave a truncated file.
//! - I/O failures are always returned, never swallowed.

use crate::model::grading::SchemeError;
use crate::model::student::{Student, StudentId, StudentValidationError};
use crate::repo::marks_file::{parse_marks, render_marks, SkippedLine};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for student persistence and store operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Scheme(SchemeError),
    NotFound(StudentId),
    DuplicateId(StudentId),
    /// Marks file could not be read, created or written.
    Io {
        path: PathBuf,
        source: io::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid student: {err}"),
            Self::Scheme(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::DuplicateId(id) => write!(f, "student code already exists: {id}"),
            Self::Io { path, source } => {
                write!(f, "marks file `{}` I/O failed: {source}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Scheme(err) => Some(err),
            Self::NotFound(_) => None,
            Self::DuplicateId(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SchemeError> for RepoError {
    fn from(value: SchemeError) -> Self {
        Self::Scheme(value)
    }
}

/// Records loaded from storage plus lines that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub students: Vec<Student>,
    pub skipped: Vec<SkippedLine>,
    /// `true` when storage did not exist and was created empty.
    pub created: bool,
}

/// Repository interface for whole-collection persistence.
pub trait StudentRepository {
    fn load_all(&self) -> RepoResult<LoadReport>;
    fn save_all(&self, students: &[Student]) -> RepoResult<()>;
}

/// Marks-file backed repository.
#[derive(Debug, Clone)]
pub struct FileStudentRepository {
    path: PathBuf,
}

impl FileStudentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StudentRepository for FileStudentRepository {
    fn load_all(&self) -> RepoResult<LoadReport> {
        let started_at = Instant::now();

        let (text, created) = match fs::read_to_string(&self.path) {
            Ok(text) => (text, false),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Err(err) = fs::write(&self.path, "") {
                    error!(
                        "event=marks_load module=repo status=error error_code=create_failed path={} error={}",
                        self.path.display(),
                        err
                    );
                    return Err(self.io_error(err));
                }
                (String::new(), true)
            }
            Err(err) => {
                error!(
                    "event=marks_load module=repo status=error error_code=read_failed path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let parsed = parse_marks(&text);
        for skipped in &parsed.skipped {
            warn!(
                "event=marks_line_skipped module=repo line={} reason={}",
                skipped.line_number, skipped.reason
            );
        }
        info!(
            "event=marks_load module=repo status=ok created={} records={} skipped={} duration_ms={}",
            created,
            parsed.students.len(),
            parsed.skipped.len(),
            started_at.elapsed().as_millis()
        );

        Ok(LoadReport {
            students: parsed.students,
            skipped: parsed.skipped,
            created,
        })
    }

    fn save_all(&self, students: &[Student]) -> RepoResult<()> {
        let started_at = Instant::now();
        match fs::write(&self.path, render_marks(students)) {
            Ok(()) => {
                info!(
                    "event=marks_save module=repo status=ok records={} duration_ms={}",
                    students.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=marks_save module=repo status=error path={} error={}",
                    self.path.display(),
                    err
                );
                Err(self.io_error(err))
            }
        }
    }
}
