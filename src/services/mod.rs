//! Business operations over the repositories.
//!
//! Each public method is one unit of work: it runs inside a single
//! [`Database::transaction`](crate::db::Database::transaction), so any error
//! leaves the store as it was before the call.

mod employees;
mod projects;
mod tasks;

pub use employees::EmployeeService;
pub use projects::ProjectService;
pub use tasks::TaskService;

use chrono::NaiveDate;

use crate::db::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::models::end_date_in_order;

/// The three services sharing one database handle.
#[derive(Clone)]
pub struct Services {
    pub employees: EmployeeService,
    pub projects: ProjectService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new(db: Database) -> Self {
        Self {
            employees: EmployeeService::new(db.clone()),
            projects: ProjectService::new(db.clone()),
            tasks: TaskService::new(db),
        }
    }
}

/// Wall-clock calendar date, read at call time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn require_non_blank(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_dates_in_order(start: NaiveDate, end: Option<NaiveDate>) -> ServiceResult<()> {
    if !end_date_in_order(start, end) {
        return Err(ServiceError::validation(
            "End date cannot be before start date",
        ));
    }
    Ok(())
}

fn require_period(from: NaiveDate, to: NaiveDate) -> ServiceResult<()> {
    if from > to {
        return Err(ServiceError::validation(format!(
            "Period start {from} is after period end {to}"
        )));
    }
    Ok(())
}
