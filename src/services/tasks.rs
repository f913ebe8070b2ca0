use chrono::NaiveDate;

use crate::db::{
    AssignmentRepository, Database, EmployeeRepository, ProjectRepository, TaskRepository,
};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Assignment, AssignmentKey, CreateTaskInput, Task, TaskStatus, UpdateTaskInput,
};

use super::{require_dates_in_order, require_non_blank, require_period, today};

#[derive(Clone)]
pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn list_all(&self) -> ServiceResult<Vec<Task>> {
        self.db.transaction(|tx| Ok(TaskRepository::find_all(tx)?))
    }

    pub fn get(&self, id: i64) -> ServiceResult<Option<Task>> {
        self.db.transaction(|tx| Ok(TaskRepository::find_by_id(tx, id)?))
    }

    pub fn list_by_project(&self, project_id: i64) -> ServiceResult<Vec<Task>> {
        self.db
            .transaction(|tx| Ok(TaskRepository::find_by_project(tx, project_id)?))
    }

    pub fn list_by_project_and_status(
        &self,
        project_id: i64,
        status: TaskStatus,
    ) -> ServiceResult<Vec<Task>> {
        self.db.transaction(|tx| {
            Ok(TaskRepository::find_by_project_and_status(
                tx, project_id, status,
            )?)
        })
    }

    pub fn list_by_status(&self, status: TaskStatus) -> ServiceResult<Vec<Task>> {
        self.db
            .transaction(|tx| Ok(TaskRepository::find_by_status(tx, status)?))
    }

    /// Create a task under `project_id`. The task starts as `PENDING` unless a
    /// status is given.
    pub fn create(&self, project_id: i64, input: CreateTaskInput) -> ServiceResult<Task> {
        self.db.transaction(|tx| {
            if !ProjectRepository::exists(tx, project_id)? {
                return Err(ServiceError::not_found("Project", project_id));
            }
            require_non_blank("Task title", &input.title)?;
            require_dates_in_order(input.start_date, input.end_date)?;

            let task = TaskRepository::insert(
                tx,
                Task {
                    id: 0,
                    project_id,
                    title: input.title,
                    description: input.description,
                    start_date: input.start_date,
                    end_date: input.end_date,
                    status: input.status.unwrap_or_default(),
                },
            )?;
            tracing::debug!(task_id = task.id, project_id, "Created task");
            Ok(task)
        })
    }

    /// Partial update. Dates are validated after merging with the stored values.
    pub fn update(&self, id: i64, input: UpdateTaskInput) -> ServiceResult<Task> {
        self.db.transaction(|tx| {
            let task = TaskRepository::find_by_id(tx, id)?
                .ok_or_else(|| ServiceError::not_found("Task", id))?
                .apply(input);

            require_non_blank("Task title", &task.title)?;
            require_dates_in_order(task.start_date, task.end_date)?;

            TaskRepository::update(tx, &task)?;
            tracing::debug!(task_id = id, "Updated task");
            Ok(task)
        })
    }

    /// Set the status only. Dates are not revalidated.
    pub fn change_status(&self, id: i64, status: TaskStatus) -> ServiceResult<Task> {
        self.db.transaction(|tx| {
            let mut task = TaskRepository::find_by_id(tx, id)?
                .ok_or_else(|| ServiceError::not_found("Task", id))?;
            TaskRepository::set_status(tx, id, status)?;
            task.status = status;
            tracing::debug!(task_id = id, status = status.as_str(), "Changed task status");
            Ok(task)
        })
    }

    /// Deletes the task's assignments, then the task.
    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        self.db.transaction(|tx| {
            if !TaskRepository::exists(tx, id)? {
                return Err(ServiceError::not_found("Task", id));
            }
            let assignments = AssignmentRepository::delete_by_task(tx, id)?;
            TaskRepository::delete(tx, id)?;
            tracing::debug!(task_id = id, assignments, "Deleted task");
            Ok(())
        })
    }

    /// Link an employee to a task with a role.
    ///
    /// Fails with `NotFound` when either side is missing and with `Conflict`
    /// when the pair is already linked.
    pub fn assign(&self, task_id: i64, employee_id: &str, role: &str) -> ServiceResult<Assignment> {
        self.db.transaction(|tx| {
            if !TaskRepository::exists(tx, task_id)? {
                return Err(ServiceError::not_found("Task", task_id));
            }
            if !EmployeeRepository::exists(tx, employee_id)? {
                return Err(ServiceError::not_found("Employee", employee_id));
            }

            let key = AssignmentKey::new(employee_id, task_id);
            if AssignmentRepository::exists(tx, &key)? {
                return Err(ServiceError::conflict(format!(
                    "Employee {employee_id} is already assigned to task {task_id}"
                )));
            }

            let assignment = Assignment {
                employee_id: key.employee_id,
                task_id: key.task_id,
                role: role.to_string(),
            };
            AssignmentRepository::insert(tx, &assignment)?;
            tracing::debug!(task_id, employee_id, role, "Assigned employee");
            Ok(assignment)
        })
    }

    /// Fails with `NotFound` when the pair is not linked.
    pub fn unassign(&self, task_id: i64, employee_id: &str) -> ServiceResult<()> {
        let key = AssignmentKey::new(employee_id, task_id);
        self.db.transaction(|tx| {
            if !AssignmentRepository::delete(tx, &key)? {
                return Err(ServiceError::NotFound(format!(
                    "Assignment not found: employee {employee_id} on task {task_id}"
                )));
            }
            tracing::debug!(task_id, employee_id, "Unassigned employee");
            Ok(())
        })
    }

    /// Empty for an unknown task, like the other lookups by task id.
    pub fn assignments(&self, task_id: i64) -> ServiceResult<Vec<Assignment>> {
        self.db
            .transaction(|tx| Ok(AssignmentRepository::find_by_task(tx, task_id)?))
    }

    pub fn count_employees(&self, task_id: i64) -> ServiceResult<i64> {
        self.db
            .transaction(|tx| Ok(AssignmentRepository::count_by_task(tx, task_id)?))
    }

    pub fn search_by_title(&self, term: &str) -> ServiceResult<Vec<Task>> {
        self.db
            .transaction(|tx| Ok(TaskRepository::search_by_title(tx, term)?))
    }

    /// Tasks whose end date has passed and that are not `DONE`.
    pub fn overdue(&self) -> ServiceResult<Vec<Task>> {
        self.overdue_on(today())
    }

    pub fn overdue_on(&self, date: NaiveDate) -> ServiceResult<Vec<Task>> {
        self.db
            .transaction(|tx| Ok(TaskRepository::find_overdue(tx, date)?))
    }

    pub fn list_by_employee(&self, employee_id: &str) -> ServiceResult<Vec<Task>> {
        self.db
            .transaction(|tx| Ok(TaskRepository::find_by_employee(tx, employee_id)?))
    }

    /// Tasks starting within `[from, to]`, both ends inclusive.
    pub fn starting_between(&self, from: NaiveDate, to: NaiveDate) -> ServiceResult<Vec<Task>> {
        require_period(from, to)?;
        self.db
            .transaction(|tx| Ok(TaskRepository::find_starting_between(tx, from, to)?))
    }
}
