use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::models::*;
use crate::services::Services;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Map a service error to a status code and message.
///
/// Domain errors are safe to expose and are returned as-is. Store failures
/// are logged server-side and the client only sees a generic message.
fn service_error(e: ServiceError) -> (StatusCode, String) {
    match e {
        ServiceError::NotFound(msg) => {
            tracing::warn!("Not found: {}", msg);
            (StatusCode::NOT_FOUND, msg)
        }
        ServiceError::Conflict(msg) | ServiceError::Validation(msg) => {
            tracing::warn!("Rejected request: {}", msg);
            (StatusCode::BAD_REQUEST, msg)
        }
        ServiceError::Store(e) => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

// ============================================================
// Query parameters
// ============================================================

#[derive(Debug, Deserialize)]
pub struct TermQuery {
    pub term: String,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

/// Inclusive calendar period, ISO-8601 dates.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: TaskStatus,
}

/// Optional status filter for project task listings and counts.
#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AssignQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UnassignQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: String,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Employees
// ============================================================

pub async fn list_employees(State(services): State<Services>) -> ApiResult<Json<Vec<Employee>>> {
    services.employees.list_all().map(Json).map_err(service_error)
}

pub async fn get_employee(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    services
        .employees
        .get(&id)
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found("Employee"))
}

pub async fn get_employee_by_email(
    State(services): State<Services>,
    Path(email): Path<String>,
) -> ApiResult<Json<Employee>> {
    services
        .employees
        .get_by_email(&email)
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found("Employee"))
}

pub async fn create_employee(
    State(services): State<Services>,
    Json(input): Json<CreateEmployeeInput>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    services
        .employees
        .create(input)
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(service_error)
}

pub async fn update_employee(
    State(services): State<Services>,
    Path(id): Path<String>,
    Json(input): Json<UpdateEmployeeInput>,
) -> ApiResult<Json<Employee>> {
    services
        .employees
        .update(&id, input)
        .map(Json)
        .map_err(service_error)
}

pub async fn delete_employee(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    services
        .employees
        .delete(&id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(service_error)
}

pub async fn search_employees(
    State(services): State<Services>,
    Query(query): Query<TermQuery>,
) -> ApiResult<Json<Vec<Employee>>> {
    services
        .employees
        .search(&query.term)
        .map(Json)
        .map_err(service_error)
}

pub async fn search_employees_by_last_name(
    State(services): State<Services>,
    Query(query): Query<TermQuery>,
) -> ApiResult<Json<Vec<Employee>>> {
    services
        .employees
        .search_by_last_name(&query.term)
        .map(Json)
        .map_err(service_error)
}

pub async fn search_employees_by_first_name(
    State(services): State<Services>,
    Query(query): Query<TermQuery>,
) -> ApiResult<Json<Vec<Employee>>> {
    services
        .employees
        .search_by_first_name(&query.term)
        .map(Json)
        .map_err(service_error)
}

pub async fn list_task_employees(
    State(services): State<Services>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Vec<Employee>>> {
    services
        .employees
        .list_by_task(task_id)
        .map(Json)
        .map_err(service_error)
}

pub async fn count_employee_tasks(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<Json<i64>> {
    services
        .employees
        .count_tasks(&id)
        .map(Json)
        .map_err(service_error)
}

pub async fn list_employee_assignments(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Assignment>>> {
    services
        .employees
        .assignments(&id)
        .map(Json)
        .map_err(service_error)
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(State(services): State<Services>) -> ApiResult<Json<Vec<Project>>> {
    services.projects.list_all().map(Json).map_err(service_error)
}

pub async fn get_project(
    State(services): State<Services>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Project>> {
    services
        .projects
        .get(id)
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found("Project"))
}

pub async fn create_project(
    State(services): State<Services>,
    Json(input): Json<CreateProjectInput>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    services
        .projects
        .create(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(service_error)
}

pub async fn update_project(
    State(services): State<Services>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateProjectInput>,
) -> ApiResult<Json<Project>> {
    services
        .projects
        .update(id, input)
        .map(Json)
        .map_err(service_error)
}

pub async fn delete_project(
    State(services): State<Services>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    services
        .projects
        .delete(id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(service_error)
}

pub async fn search_projects(
    State(services): State<Services>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    services
        .projects
        .search_by_name(&query.name)
        .map(Json)
        .map_err(service_error)
}

pub async fn list_active_projects(
    State(services): State<Services>,
) -> ApiResult<Json<Vec<Project>>> {
    services.projects.active().map(Json).map_err(service_error)
}

pub async fn list_open_ended_projects(
    State(services): State<Services>,
) -> ApiResult<Json<Vec<Project>>> {
    services.projects.open_ended().map(Json).map_err(service_error)
}

pub async fn list_projects_in_period(
    State(services): State<Services>,
    Query(period): Query<PeriodQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    services
        .projects
        .starting_between(period.start, period.end)
        .map(Json)
        .map_err(service_error)
}

pub async fn count_project_tasks(
    State(services): State<Services>,
    Path(id): Path<i64>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Json<i64>> {
    let count = match filter.status {
        Some(status) => services.projects.count_tasks_with_status(id, status),
        None => services.projects.count_tasks(id),
    };
    count.map(Json).map_err(service_error)
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(State(services): State<Services>) -> ApiResult<Json<Vec<Task>>> {
    services.tasks.list_all().map(Json).map_err(service_error)
}

pub async fn get_task(
    State(services): State<Services>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    services
        .tasks
        .get(id)
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task"))
}

pub async fn list_project_tasks(
    State(services): State<Services>,
    Path(project_id): Path<i64>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = match filter.status {
        Some(status) => services.tasks.list_by_project_and_status(project_id, status),
        None => services.tasks.list_by_project(project_id),
    };
    tasks.map(Json).map_err(service_error)
}

pub async fn create_task(
    State(services): State<Services>,
    Path(project_id): Path<i64>,
    Json(input): Json<CreateTaskInput>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    services
        .tasks
        .create(project_id, input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(service_error)
}

pub async fn update_task(
    State(services): State<Services>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTaskInput>,
) -> ApiResult<Json<Task>> {
    services
        .tasks
        .update(id, input)
        .map(Json)
        .map_err(service_error)
}

pub async fn delete_task(
    State(services): State<Services>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    services
        .tasks
        .delete(id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(service_error)
}

pub async fn search_tasks(
    State(services): State<Services>,
    Query(query): Query<TitleQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    services
        .tasks
        .search_by_title(&query.title)
        .map(Json)
        .map_err(service_error)
}

pub async fn list_employee_tasks(
    State(services): State<Services>,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    services
        .tasks
        .list_by_employee(&employee_id)
        .map(Json)
        .map_err(service_error)
}

pub async fn list_overdue_tasks(State(services): State<Services>) -> ApiResult<Json<Vec<Task>>> {
    services.tasks.overdue().map(Json).map_err(service_error)
}

pub async fn list_tasks_in_period(
    State(services): State<Services>,
    Query(period): Query<PeriodQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    services
        .tasks
        .starting_between(period.start, period.end)
        .map(Json)
        .map_err(service_error)
}

pub async fn list_tasks_by_status(
    State(services): State<Services>,
    Path(status): Path<TaskStatus>,
) -> ApiResult<Json<Vec<Task>>> {
    services
        .tasks
        .list_by_status(status)
        .map(Json)
        .map_err(service_error)
}

pub async fn change_task_status(
    State(services): State<Services>,
    Path(id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<Task>> {
    services
        .tasks
        .change_status(id, query.status)
        .map(Json)
        .map_err(service_error)
}

pub async fn assign_employee(
    State(services): State<Services>,
    Path(id): Path<i64>,
    Query(query): Query<AssignQuery>,
) -> ApiResult<(StatusCode, Json<Assignment>)> {
    services
        .tasks
        .assign(id, &query.employee_id, &query.role)
        .map(|a| (StatusCode::CREATED, Json(a)))
        .map_err(service_error)
}

pub async fn unassign_employee(
    State(services): State<Services>,
    Path(id): Path<i64>,
    Query(query): Query<UnassignQuery>,
) -> ApiResult<StatusCode> {
    services
        .tasks
        .unassign(id, &query.employee_id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(service_error)
}

pub async fn list_task_assignments(
    State(services): State<Services>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Assignment>>> {
    services
        .tasks
        .assignments(id)
        .map(Json)
        .map_err(service_error)
}

pub async fn count_task_employees(
    State(services): State<Services>,
    Path(id): Path<i64>,
) -> ApiResult<Json<i64>> {
    services
        .tasks
        .count_employees(id)
        .map(Json)
        .map_err(service_error)
}
