use crate::db::{AssignmentRepository, Database, EmployeeRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    is_plausible_email, Assignment, CreateEmployeeInput, Employee, UpdateEmployeeInput,
};

use super::require_non_blank;

#[derive(Clone)]
pub struct EmployeeService {
    db: Database,
}

fn validate(employee: &Employee) -> ServiceResult<()> {
    require_non_blank("Employee id", &employee.id)?;
    require_non_blank("Last name", &employee.last_name)?;
    require_non_blank("First name", &employee.first_name)?;
    require_non_blank("Email", &employee.email)?;
    if !is_plausible_email(&employee.email) {
        return Err(ServiceError::validation(format!(
            "Invalid email address: {}",
            employee.email
        )));
    }
    Ok(())
}

impl EmployeeService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn list_all(&self) -> ServiceResult<Vec<Employee>> {
        self.db
            .transaction(|tx| Ok(EmployeeRepository::find_all(tx)?))
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<Employee>> {
        self.db
            .transaction(|tx| Ok(EmployeeRepository::find_by_id(tx, id)?))
    }

    pub fn get_by_email(&self, email: &str) -> ServiceResult<Option<Employee>> {
        self.db
            .transaction(|tx| Ok(EmployeeRepository::find_by_email(tx, email)?))
    }

    /// Fails with `Conflict` when the id or the email is already taken.
    pub fn create(&self, input: CreateEmployeeInput) -> ServiceResult<Employee> {
        let employee = Employee::from(input);
        validate(&employee)?;

        self.db.transaction(|tx| {
            if EmployeeRepository::exists(tx, &employee.id)? {
                return Err(ServiceError::conflict(format!(
                    "An employee with id {} already exists",
                    employee.id
                )));
            }
            if EmployeeRepository::exists_by_email(tx, &employee.email)? {
                return Err(ServiceError::conflict(format!(
                    "An employee with email {} already exists",
                    employee.email
                )));
            }
            EmployeeRepository::insert(tx, &employee)?;
            tracing::debug!(employee_id = %employee.id, "Created employee");
            Ok(employee)
        })
    }

    /// Fails with `NotFound` for an unknown id and with `Conflict` when the new
    /// email belongs to another employee.
    pub fn update(&self, id: &str, input: UpdateEmployeeInput) -> ServiceResult<Employee> {
        self.db.transaction(|tx| {
            let existing = EmployeeRepository::find_by_id(tx, id)?
                .ok_or_else(|| ServiceError::not_found("Employee", id))?;

            let email_changed = input
                .email
                .as_ref()
                .is_some_and(|email| *email != existing.email);
            let employee = existing.apply(input);
            validate(&employee)?;

            if email_changed && EmployeeRepository::exists_by_email(tx, &employee.email)? {
                return Err(ServiceError::conflict(format!(
                    "Email {} is already used by another employee",
                    employee.email
                )));
            }

            EmployeeRepository::update(tx, &employee)?;
            tracing::debug!(employee_id = %employee.id, "Updated employee");
            Ok(employee)
        })
    }

    /// Deletes the employee's assignments, then the employee.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        self.db.transaction(|tx| {
            if !EmployeeRepository::exists(tx, id)? {
                return Err(ServiceError::not_found("Employee", id));
            }
            let removed = AssignmentRepository::delete_by_employee(tx, id)?;
            EmployeeRepository::delete(tx, id)?;
            tracing::debug!(employee_id = %id, assignments = removed, "Deleted employee");
            Ok(())
        })
    }

    /// Case-insensitive match of `term` inside the first or last name.
    pub fn search(&self, term: &str) -> ServiceResult<Vec<Employee>> {
        self.db
            .transaction(|tx| Ok(EmployeeRepository::search_by_name(tx, term)?))
    }

    pub fn search_by_last_name(&self, term: &str) -> ServiceResult<Vec<Employee>> {
        self.db
            .transaction(|tx| Ok(EmployeeRepository::search_by_last_name(tx, term)?))
    }

    pub fn search_by_first_name(&self, term: &str) -> ServiceResult<Vec<Employee>> {
        self.db
            .transaction(|tx| Ok(EmployeeRepository::search_by_first_name(tx, term)?))
    }

    pub fn list_by_task(&self, task_id: i64) -> ServiceResult<Vec<Employee>> {
        self.db
            .transaction(|tx| Ok(EmployeeRepository::find_by_task(tx, task_id)?))
    }

    /// The employee's assignments with their roles. Empty for an unknown id.
    pub fn assignments(&self, id: &str) -> ServiceResult<Vec<Assignment>> {
        self.db
            .transaction(|tx| Ok(AssignmentRepository::find_by_employee(tx, id)?))
    }

    pub fn count_tasks(&self, id: &str) -> ServiceResult<i64> {
        self.db
            .transaction(|tx| Ok(AssignmentRepository::count_by_employee(tx, id)?))
    }
}
