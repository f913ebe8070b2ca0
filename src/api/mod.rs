mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::db::Database;
use crate::services::Services;

/// Router with permissive CORS, for local use and tests.
pub fn create_router(db: Database) -> Router {
    build_router(db, CorsLayer::permissive())
}

/// Router with CORS restricted according to `config`.
pub fn create_router_with_config(db: Database, config: &ServerConfig) -> Router {
    build_router(db, config.cors_layer())
}

fn build_router(db: Database, cors: CorsLayer) -> Router {
    let api = Router::new()
        // Employees
        .route("/employees", get(handlers::list_employees))
        .route("/employees", post(handlers::create_employee))
        .route("/employees/{id}", get(handlers::get_employee))
        .route("/employees/{id}", put(handlers::update_employee))
        .route("/employees/{id}", delete(handlers::delete_employee))
        .route("/employees/email/{email}", get(handlers::get_employee_by_email))
        .route("/employees/search", get(handlers::search_employees))
        .route("/employees/search/last-name", get(handlers::search_employees_by_last_name))
        .route("/employees/search/first-name", get(handlers::search_employees_by_first_name))
        .route("/employees/task/{task_id}", get(handlers::list_task_employees))
        .route("/employees/{id}/tasks/count", get(handlers::count_employee_tasks))
        .route("/employees/{id}/assignments", get(handlers::list_employee_assignments))
        // Projects
        .route("/projects", get(handlers::list_projects))
        .route("/projects", post(handlers::create_project))
        .route("/projects/{id}", get(handlers::get_project))
        .route("/projects/{id}", put(handlers::update_project))
        .route("/projects/{id}", delete(handlers::delete_project))
        .route("/projects/search", get(handlers::search_projects))
        .route("/projects/active", get(handlers::list_active_projects))
        .route("/projects/open-ended", get(handlers::list_open_ended_projects))
        .route("/projects/period", get(handlers::list_projects_in_period))
        .route("/projects/{id}/tasks/count", get(handlers::count_project_tasks))
        // Tasks
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks/{id}", get(handlers::get_task))
        .route("/tasks/{id}", put(handlers::update_task))
        .route("/tasks/{id}", delete(handlers::delete_task))
        .route("/tasks/project/{project_id}", get(handlers::list_project_tasks))
        .route("/tasks/project/{project_id}", post(handlers::create_task))
        .route("/tasks/search", get(handlers::search_tasks))
        .route("/tasks/employee/{employee_id}", get(handlers::list_employee_tasks))
        .route("/tasks/overdue", get(handlers::list_overdue_tasks))
        .route("/tasks/period", get(handlers::list_tasks_in_period))
        .route("/tasks/status/{status}", get(handlers::list_tasks_by_status))
        .route("/tasks/{id}/status", put(handlers::change_task_status))
        .route("/tasks/{id}/assign", post(handlers::assign_employee))
        .route("/tasks/{id}/unassign", delete(handlers::unassign_employee))
        .route("/tasks/{id}/assignments", get(handlers::list_task_assignments))
        .route("/tasks/{id}/employees/count", get(handlers::count_task_employees))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(Services::new(db))
}
