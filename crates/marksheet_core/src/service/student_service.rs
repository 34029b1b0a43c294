//! Student records use-case service.
//!
//! # Responsibility
//! - Own the in-memory student collection for one session.
//! - Provide lookup, CRUD, extremum, ordering and summary operations.
//! - Flush every mutation to the repository immediately.
//!
//! # Invariants
//! - Student ids are unique across the live collection.
//! - Rejected operations (`DuplicateId`, `NotFound`, validation) leave the
//!   collection unchanged and do not touch storage.
//! - The toggled sort direction lives on the service; the first toggle
//!   sorts ascending.

use crate::model::grading::{round2, GradingScheme};
use crate::model::student::{Student, StudentId};
use crate::repo::marks_file::SkippedLine;
use crate::repo::student_repo::{RepoError, RepoResult, StudentRepository};
use log::{info, warn};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Ordering direction for grand-total sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => f.write_str("ascending"),
            Self::Descending => f.write_str("descending"),
        }
    }
}

/// Count and mean percentage across the whole collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassSummary {
    pub count: usize,
    /// Mean of unrounded percentages, rounded to 2 decimals.
    pub mean_percentage: f64,
}

/// Session-scoped student store over a repository implementation.
pub struct StudentService<R: StudentRepository> {
    repo: R,
    scheme: GradingScheme,
    students: Vec<Student>,
    skipped: Vec<SkippedLine>,
    next_sort: SortDirection,
}

impl<R: StudentRepository> StudentService<R> {
    /// Validates the scheme and loads the whole collection from `repo`.
    ///
    /// Malformed stored lines are dropped and exposed via `skipped_lines()`.
    pub fn open(repo: R, scheme: GradingScheme) -> RepoResult<Self> {
        scheme.validate()?;
        let report = repo.load_all()?;
        if !report.skipped.is_empty() {
            warn!(
                "event=store_open module=service status=degraded skipped={}",
                report.skipped.len()
            );
        }
        Ok(Self {
            repo,
            scheme,
            students: report.students,
            skipped: report.skipped,
            next_sort: SortDirection::default(),
        })
    }

    pub fn scheme(&self) -> &GradingScheme {
        &self.scheme
    }

    /// Students in current order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Lines dropped while loading, in file order.
    pub fn skipped_lines(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Direction the next `toggle_sort` call will apply.
    pub fn next_sort_direction(&self) -> SortDirection {
        self.next_sort
    }

    /// Positional access in current order.
    pub fn student_at(&self, index: usize) -> Option<&Student> {
        self.students.get(index)
    }

    /// Linear scan; returns the first student with `id`.
    pub fn find_student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    /// Like `find_student`, but reports a missing id as `NotFound`.
    pub fn get_student(&self, id: StudentId) -> RepoResult<&Student> {
        self.find_student(id).ok_or(RepoError::NotFound(id))
    }

    /// Appends a validated student and persists.
    ///
    /// # Errors
    /// - `Validation` when the record breaks name or score-bound rules.
    /// - `DuplicateId` when the id is already present.
    /// - `Io` when persisting fails; the record stays in memory.
    pub fn add_student(&mut self, student: Student) -> RepoResult<()> {
        student.validate(&self.scheme)?;
        if self.find_student(student.id).is_some() {
            info!(
                "event=student_add module=service status=rejected reason=duplicate_id id={}",
                student.id
            );
            return Err(RepoError::DuplicateId(student.id));
        }

        let id = student.id;
        self.students.push(student);
        self.persist()?;
        info!(
            "event=student_add module=service status=ok id={} records={}",
            id,
            self.students.len()
        );
        Ok(())
    }

    /// Parses raw `[id, name, cw1, cw2, cw3, exam]` input, then adds it.
    ///
    /// Invalid numbers are rejected before any mutation.
    pub fn add_from_fields<S: AsRef<str>>(&mut self, fields: &[S]) -> RepoResult<StudentId> {
        let mut student = Student::parse_fields(fields)?;
        student.name = student.name.trim().to_string();
        let id = student.id;
        self.add_student(student)?;
        Ok(id)
    }

    /// Removes the first student with `id`, persists, and returns it.
    pub fn delete_student(&mut self, id: StudentId) -> RepoResult<Student> {
        let Some(index) = self.students.iter().position(|student| student.id == id) else {
            info!(
                "event=student_delete module=service status=rejected reason=not_found id={}",
                id
            );
            return Err(RepoError::NotFound(id));
        };

        let removed = self.students.remove(index);
        self.persist()?;
        info!(
            "event=student_delete module=service status=ok id={} records={}",
            id,
            self.students.len()
        );
        Ok(removed)
    }

    /// Student with the highest grand total; ties keep the earliest.
    ///
    /// Returns `None` for an empty store.
    pub fn highest(&self) -> Option<&Student> {
        self.extremum(Ordering::Greater)
    }

    /// Student with the lowest grand total; ties keep the earliest.
    pub fn lowest(&self) -> Option<&Student> {
        self.extremum(Ordering::Less)
    }

    fn extremum(&self, wanted: Ordering) -> Option<&Student> {
        self.students.iter().reduce(|best, candidate| {
            if candidate.grand_total().cmp(&best.grand_total()) == wanted {
                candidate
            } else {
                best
            }
        })
    }

    /// Stable sort by grand total in `direction`, then persists.
    pub fn sort_by_total(&mut self, direction: SortDirection) -> RepoResult<()> {
        match direction {
            SortDirection::Ascending => self.students.sort_by_key(Student::grand_total),
            SortDirection::Descending => self
                .students
                .sort_by(|a, b| b.grand_total().cmp(&a.grand_total())),
        }
        self.persist()?;
        info!(
            "event=students_sort module=service status=ok direction={} records={}",
            direction,
            self.students.len()
        );
        Ok(())
    }

    /// Sorts in the stored direction, flips it, and returns the direction
    /// that was applied.
    ///
    /// The direction flips even when persisting fails, since the in-memory
    /// order has already changed.
    pub fn toggle_sort(&mut self) -> RepoResult<SortDirection> {
        let direction = self.next_sort;
        self.next_sort = direction.flipped();
        self.sort_by_total(direction)?;
        Ok(direction)
    }

    /// Count and mean percentage, or `None` for an empty store.
    pub fn class_summary(&self) -> Option<ClassSummary> {
        if self.students.is_empty() {
            return None;
        }
        let sum: f64 = self
            .students
            .iter()
            .map(|student| self.scheme.raw_percentage(student.grand_total()))
            .sum();
        let count = self.students.len();
        Some(ClassSummary {
            count,
            mean_percentage: round2(sum / count as f64),
        })
    }

    fn persist(&self) -> RepoResult<()> {
        self.repo.save_all(&self.students)
    }
}
