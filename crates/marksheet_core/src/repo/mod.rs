//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define whole-collection load/save contracts for student records.
//! - Isolate the marks-file format from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to I/O errors.
//! - Malformed stored lines are reported, not raised.

pub mod marks_file;
pub mod student_repo;
