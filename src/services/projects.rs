use chrono::NaiveDate;

use crate::db::{AssignmentRepository, Database, ProjectRepository, TaskRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateProjectInput, Project, TaskStatus, UpdateProjectInput};

use super::{require_dates_in_order, require_non_blank, require_period, today};

#[derive(Clone)]
pub struct ProjectService {
    db: Database,
}

impl ProjectService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn list_all(&self) -> ServiceResult<Vec<Project>> {
        self.db.transaction(|tx| Ok(ProjectRepository::find_all(tx)?))
    }

    pub fn get(&self, id: i64) -> ServiceResult<Option<Project>> {
        self.db
            .transaction(|tx| Ok(ProjectRepository::find_by_id(tx, id)?))
    }

    /// Fails with `Validation` when the end date precedes the start date.
    pub fn create(&self, input: CreateProjectInput) -> ServiceResult<Project> {
        require_non_blank("Project name", &input.name)?;
        require_dates_in_order(input.start_date, input.end_date)?;

        self.db.transaction(|tx| {
            let project = ProjectRepository::insert(tx, &input)?;
            tracing::debug!(project_id = project.id, "Created project");
            Ok(project)
        })
    }

    /// Partial update. Dates are validated after merging with the stored values.
    pub fn update(&self, id: i64, input: UpdateProjectInput) -> ServiceResult<Project> {
        self.db.transaction(|tx| {
            let project = ProjectRepository::find_by_id(tx, id)?
                .ok_or_else(|| ServiceError::not_found("Project", id))?
                .apply(input);

            require_non_blank("Project name", &project.name)?;
            require_dates_in_order(project.start_date, project.end_date)?;

            ProjectRepository::update(tx, &project)?;
            tracing::debug!(project_id = id, "Updated project");
            Ok(project)
        })
    }

    /// Deletes assignments on the project's tasks, then the tasks, then the project.
    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        self.db.transaction(|tx| {
            if !ProjectRepository::exists(tx, id)? {
                return Err(ServiceError::not_found("Project", id));
            }
            let assignments = AssignmentRepository::delete_by_project(tx, id)?;
            let tasks = TaskRepository::delete_by_project(tx, id)?;
            ProjectRepository::delete(tx, id)?;
            tracing::debug!(project_id = id, tasks, assignments, "Deleted project");
            Ok(())
        })
    }

    pub fn search_by_name(&self, term: &str) -> ServiceResult<Vec<Project>> {
        self.db
            .transaction(|tx| Ok(ProjectRepository::search_by_name(tx, term)?))
    }

    /// Projects with no end date or an end date today or later.
    pub fn active(&self) -> ServiceResult<Vec<Project>> {
        self.active_on(today())
    }

    pub fn active_on(&self, date: NaiveDate) -> ServiceResult<Vec<Project>> {
        self.db
            .transaction(|tx| Ok(ProjectRepository::find_active(tx, date)?))
    }

    pub fn open_ended(&self) -> ServiceResult<Vec<Project>> {
        self.db
            .transaction(|tx| Ok(ProjectRepository::find_open_ended(tx)?))
    }

    /// Projects starting within `[from, to]`, both ends inclusive.
    pub fn starting_between(&self, from: NaiveDate, to: NaiveDate) -> ServiceResult<Vec<Project>> {
        require_period(from, to)?;
        self.db
            .transaction(|tx| Ok(ProjectRepository::find_starting_between(tx, from, to)?))
    }

    pub fn count_tasks(&self, id: i64) -> ServiceResult<i64> {
        self.db
            .transaction(|tx| Ok(TaskRepository::count_by_project(tx, id)?))
    }

    pub fn count_tasks_with_status(&self, id: i64, status: TaskStatus) -> ServiceResult<i64> {
        self.db.transaction(|tx| {
            Ok(TaskRepository::count_by_project_and_status(tx, id, status)?)
        })
    }
}
