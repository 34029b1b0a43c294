//! Student marks domain model.
//!
//! # Responsibility
//! - Define the student record, its derived score fields and grading rules.
//! - Keep presentation-free rendering of a single record.
//!
//! # Invariants
//! - Every student is identified by a `StudentId` unique within a store.
//! - Score bounds and grade thresholds come from `GradingScheme`, never
//!   from hard-coded constants in callers.

pub mod grading;
pub mod report;
pub mod student;
