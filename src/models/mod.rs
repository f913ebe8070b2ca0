//! Domain models for Workboard.
//!
//! # Core Concepts
//!
//! - [`Project`]: Top-level container. Owns an ordered list of tasks; deleting a
//!   project deletes its tasks.
//! - [`Task`]: Unit of work inside exactly one project, with a [`TaskStatus`].
//! - [`Employee`]: Staff member identified by an external matricule
//!   (e.g. `EMP001`) and a unique email.
//! - [`Assignment`]: Link between an employee and a task, keyed by the
//!   `(employee_id, task_id)` pair and carrying a free-text role.
//!
//! Read operations return owned snapshots. Relations are expressed as ids,
//! never as shared references between entities.

mod assignment;
mod employee;
mod project;
mod task;

pub use assignment::*;
pub use employee::*;
pub use project::*;
pub use task::*;

use chrono::NaiveDate;

/// Whether `end` is an acceptable end date for something starting on `start`.
///
/// A missing end date is always acceptable; equal dates are acceptable.
pub fn end_date_in_order(start: NaiveDate, end: Option<NaiveDate>) -> bool {
    !matches!(end, Some(end) if end < start)
}
