use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Days, NaiveDate};
use serde_json::json;
use workboard::api::create_router;
use workboard::db::Database;
use workboard::models::*;
use workboard::services::today;

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(db);
    TestServer::new(app).expect("Failed to create test server")
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("Invalid date")
}

async fn create_project(server: &TestServer, name: &str, start: &str, end: Option<&str>) -> Project {
    server
        .post("/api/v1/projects")
        .json(&json!({ "name": name, "start_date": start, "end_date": end }))
        .await
        .json::<Project>()
}

async fn create_task(server: &TestServer, project_id: i64, title: &str) -> Task {
    server
        .post(&format!("/api/v1/tasks/project/{}", project_id))
        .json(&json!({ "title": title, "start_date": "2025-01-05", "end_date": "2025-02-01" }))
        .await
        .json::<Task>()
}

async fn create_employee(server: &TestServer, id: &str, email: &str) -> Employee {
    server
        .post("/api/v1/employees")
        .json(&CreateEmployeeInput {
            id: id.to_string(),
            last_name: "Dupont".to_string(),
            first_name: "Jean".to_string(),
            email: email.to_string(),
        })
        .await
        .json::<Employee>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod employees {
    use super::*;

    #[tokio::test]
    async fn creates_and_fetches_an_employee() {
        let server = setup();

        let response = server
            .post("/api/v1/employees")
            .json(&json!({
                "id": "EMP001",
                "last_name": "Dupont",
                "first_name": "Jean",
                "email": "a@x.com"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let found = server.get("/api/v1/employees/EMP001").await.json::<Employee>();
        assert_eq!(found.email, "a@x.com");

        let by_email = server.get("/api/v1/employees/email/a@x.com").await;
        by_email.assert_status_ok();
        assert_eq!(by_email.json::<Employee>().id, "EMP001");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_bad_request() {
        let server = setup();
        create_employee(&server, "EMP001", "a@x.com").await;

        let response = server
            .post("/api/v1/employees")
            .json(&json!({
                "id": "EMP002",
                "last_name": "Martin",
                "first_name": "Anne",
                "email": "a@x.com"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("a@x.com"));
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found() {
        let server = setup();

        server.get("/api/v1/employees/EMP404").await.assert_status_not_found();
        server
            .get("/api/v1/employees/email/nobody@x.com")
            .await
            .assert_status_not_found();
        server
            .put("/api/v1/employees/EMP404")
            .json(&json!({ "first_name": "X" }))
            .await
            .assert_status_not_found();
        server
            .delete("/api/v1/employees/EMP404")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let server = setup();
        create_employee(&server, "EMP001", "a@x.com").await;

        let response = server
            .put("/api/v1/employees/EMP001")
            .json(&json!({ "last_name": "Durand" }))
            .await;

        response.assert_status_ok();
        let employee = response.json::<Employee>();
        assert_eq!(employee.last_name, "Durand");
        assert_eq!(employee.first_name, "Jean");
        assert_eq!(employee.email, "a@x.com");
    }

    #[tokio::test]
    async fn searches_by_name() {
        let server = setup();
        create_employee(&server, "EMP001", "a@x.com").await;

        let response = server
            .get("/api/v1/employees/search")
            .add_query_param("term", "dup")
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Employee>>().len(), 1);

        let by_first = server
            .get("/api/v1/employees/search/first-name")
            .add_query_param("term", "dup")
            .await
            .json::<Vec<Employee>>();
        assert!(by_first.is_empty());

        let by_last = server
            .get("/api/v1/employees/search/last-name")
            .add_query_param("term", "DUP")
            .await
            .json::<Vec<Employee>>();
        assert_eq!(by_last.len(), 1);
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let server = setup();
        create_employee(&server, "EMP001", "a@x.com").await;

        server
            .delete("/api/v1/employees/EMP001")
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server.get("/api/v1/employees/EMP001").await.assert_status_not_found();
    }
}

mod projects {
    use super::*;

    #[tokio::test]
    async fn end_before_start_is_a_bad_request() {
        let server = setup();

        let response = server
            .post("/api/v1/projects")
            .json(&json!({ "name": "Alpha", "start_date": "2025-01-05", "end_date": "2025-01-01" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn creates_and_lists_projects() {
        let server = setup();

        let response = server
            .post("/api/v1/projects")
            .json(&CreateProjectInput {
                name: "Alpha".to_string(),
                description: Some("First project".to_string()),
                start_date: date("2025-01-01"),
                end_date: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let project = response.json::<Project>();

        let projects = server.get("/api/v1/projects").await.json::<Vec<Project>>();
        assert_eq!(projects, vec![project.clone()]);

        let found = server
            .get(&format!("/api/v1/projects/{}", project.id))
            .await
            .json::<Project>();
        assert_eq!(found.description, Some("First project".to_string()));
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;

        let response = server
            .put(&format!("/api/v1/projects/{}", project.id))
            .json(&json!({ "end_date": "2025-12-31" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Project>();
        assert_eq!(updated.name, "Alpha");
        assert_eq!(updated.end_date, Some(date("2025-12-31")));
    }

    #[tokio::test]
    async fn delete_cascades_to_tasks_and_second_delete_is_not_found() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;

        server
            .delete(&format!("/api/v1/projects/{}", project.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/v1/tasks/{}", task.id))
            .await
            .assert_status_not_found();
        server
            .delete(&format!("/api/v1/projects/{}", project.id))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn lists_active_and_open_ended_projects() {
        let server = setup();
        let now = today();
        let start = now.checked_sub_days(Days::new(10)).expect("Date out of range");
        let yesterday = now.checked_sub_days(Days::new(1)).expect("Date out of range");

        let open = create_project(&server, "Open", &start.to_string(), None).await;
        create_project(&server, "Ended", &start.to_string(), Some(&yesterday.to_string())).await;
        let ends_today =
            create_project(&server, "Ends today", &start.to_string(), Some(&now.to_string())).await;

        let active = server.get("/api/v1/projects/active").await.json::<Vec<Project>>();
        assert_eq!(active, vec![open.clone(), ends_today]);

        let open_ended = server
            .get("/api/v1/projects/open-ended")
            .await
            .json::<Vec<Project>>();
        assert_eq!(open_ended, vec![open]);
    }

    #[tokio::test]
    async fn searches_and_filters_by_period() {
        let server = setup();
        create_project(&server, "Alpha", "2025-01-01", None).await;
        create_project(&server, "Beta", "2025-03-01", None).await;

        let found = server
            .get("/api/v1/projects/search")
            .add_query_param("name", "alp")
            .await
            .json::<Vec<Project>>();
        assert_eq!(found.len(), 1);

        let response = server
            .get("/api/v1/projects/period")
            .add_query_param("start", "2025-02-01")
            .add_query_param("end", "2025-03-01")
            .await;
        response.assert_status_ok();
        let in_period = response.json::<Vec<Project>>();
        assert_eq!(in_period.len(), 1);
        assert_eq!(in_period[0].name, "Beta");
    }

    #[tokio::test]
    async fn counts_tasks() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;
        create_task(&server, project.id, "Build").await;
        server
            .put(&format!("/api/v1/tasks/{}/status", task.id))
            .add_query_param("status", "DONE")
            .await
            .assert_status_ok();

        let total = server
            .get(&format!("/api/v1/projects/{}/tasks/count", project.id))
            .await
            .json::<i64>();
        assert_eq!(total, 2);

        let done = server
            .get(&format!("/api/v1/projects/{}/tasks/count", project.id))
            .add_query_param("status", "DONE")
            .await
            .json::<i64>();
        assert_eq!(done, 1);
    }
}

mod tasks {
    use super::*;

    #[tokio::test]
    async fn task_ending_before_start_is_rejected_and_valid_one_is_pending() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;

        let rejected = server
            .post(&format!("/api/v1/tasks/project/{}", project.id))
            .json(&json!({ "title": "Design", "start_date": "2025-01-05", "end_date": "2025-01-01" }))
            .await;
        rejected.assert_status(StatusCode::BAD_REQUEST);

        let created = server
            .post(&format!("/api/v1/tasks/project/{}", project.id))
            .json(&json!({ "title": "Design", "start_date": "2025-01-05", "end_date": "2025-02-01" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let task = created.json::<Task>();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.project_id, project.id);
    }

    #[tokio::test]
    async fn creating_under_unknown_project_is_not_found() {
        let server = setup();

        let response = server
            .post("/api/v1/tasks/project/404")
            .json(&json!({ "title": "Design", "start_date": "2025-01-05" }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn assign_twice_conflicts_and_count_is_one() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;
        create_employee(&server, "EMP001", "a@x.com").await;

        let assigned = server
            .post(&format!("/api/v1/tasks/{}/assign", task.id))
            .add_query_param("employeeId", "EMP001")
            .add_query_param("role", "Dev")
            .await;
        assigned.assert_status(StatusCode::CREATED);
        let assignment = assigned.json::<Assignment>();
        assert_eq!(assignment.role, "Dev");

        server
            .post(&format!("/api/v1/tasks/{}/assign", task.id))
            .add_query_param("employeeId", "EMP001")
            .add_query_param("role", "Dev")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let count = server
            .get("/api/v1/employees/EMP001/tasks/count")
            .await
            .json::<i64>();
        assert_eq!(count, 1);

        let assignees = server
            .get(&format!("/api/v1/employees/task/{}", task.id))
            .await
            .json::<Vec<Employee>>();
        assert_eq!(assignees.len(), 1);

        let tasks = server
            .get("/api/v1/tasks/employee/EMP001")
            .await
            .json::<Vec<Task>>();
        assert_eq!(tasks, vec![task.clone()]);

        let assignments = server
            .get(&format!("/api/v1/tasks/{}/assignments", task.id))
            .await
            .json::<Vec<Assignment>>();
        assert_eq!(assignments, vec![assignment]);
    }

    #[tokio::test]
    async fn lists_employee_assignments_and_counts_task_employees() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;
        create_employee(&server, "EMP001", "a@x.com").await;
        create_employee(&server, "EMP002", "b@x.com").await;
        for (employee, role) in [("EMP001", "Dev"), ("EMP002", "Lead")] {
            server
                .post(&format!("/api/v1/tasks/{}/assign", task.id))
                .add_query_param("employeeId", employee)
                .add_query_param("role", role)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get("/api/v1/employees/EMP002/assignments").await;
        response.assert_status_ok();
        let assignments = response.json::<Vec<Assignment>>();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].role, "Lead");

        let count = server
            .get(&format!("/api/v1/tasks/{}/employees/count", task.id))
            .await
            .json::<i64>();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn lookups_by_unknown_task_are_empty() {
        let server = setup();

        let assignments = server.get("/api/v1/tasks/404/assignments").await;
        assignments.assert_status_ok();
        assert!(assignments.json::<Vec<Assignment>>().is_empty());

        let employees = server.get("/api/v1/employees/task/404").await;
        employees.assert_status_ok();
        assert!(employees.json::<Vec<Employee>>().is_empty());
    }

    #[tokio::test]
    async fn searches_accented_names() {
        let server = setup();
        server
            .post("/api/v1/employees")
            .json(&json!({
                "id": "EMP010",
                "last_name": "Écrivain",
                "first_name": "Élodie",
                "email": "elodie@x.com"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let found = server
            .get("/api/v1/employees/search")
            .add_query_param("term", "ÉLODIE")
            .await
            .json::<Vec<Employee>>();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn assigning_unknown_employee_is_not_found() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;

        server
            .post(&format!("/api/v1/tasks/{}/assign", task.id))
            .add_query_param("employeeId", "EMP404")
            .add_query_param("role", "Dev")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn unassign_then_unassign_again_is_not_found() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;
        create_employee(&server, "EMP001", "a@x.com").await;
        server
            .post(&format!("/api/v1/tasks/{}/assign", task.id))
            .add_query_param("employeeId", "EMP001")
            .add_query_param("role", "Dev")
            .await;

        server
            .delete(&format!("/api/v1/tasks/{}/unassign", task.id))
            .add_query_param("employeeId", "EMP001")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .delete(&format!("/api/v1/tasks/{}/unassign", task.id))
            .add_query_param("employeeId", "EMP001")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn changes_status_and_filters_by_status() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;
        create_task(&server, project.id, "Build").await;

        let changed = server
            .put(&format!("/api/v1/tasks/{}/status", task.id))
            .add_query_param("status", "IN_PROGRESS")
            .await;
        changed.assert_status_ok();
        assert_eq!(changed.json::<Task>().status, TaskStatus::InProgress);

        let in_progress = server
            .get("/api/v1/tasks/status/IN_PROGRESS")
            .await
            .json::<Vec<Task>>();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, task.id);

        let pending_in_project = server
            .get(&format!("/api/v1/tasks/project/{}", project.id))
            .add_query_param("status", "PENDING")
            .await
            .json::<Vec<Task>>();
        assert_eq!(pending_in_project.len(), 1);
        assert_eq!(pending_in_project[0].title, "Build");
    }

    #[tokio::test]
    async fn overdue_excludes_done_tasks() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        // Both tasks ended on 2025-02-01, which is in the past.
        let late = create_task(&server, project.id, "Late").await;
        let done = create_task(&server, project.id, "Finished").await;
        server
            .put(&format!("/api/v1/tasks/{}/status", done.id))
            .add_query_param("status", "DONE")
            .await
            .assert_status_ok();

        let overdue = server.get("/api/v1/tasks/overdue").await.json::<Vec<Task>>();
        assert_eq!(overdue, vec![late]);
    }

    #[tokio::test]
    async fn update_search_and_delete() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;

        let updated = server
            .put(&format!("/api/v1/tasks/{}", task.id))
            .json(&json!({ "title": "Design review", "status": "IN_PROGRESS" }))
            .await;
        updated.assert_status_ok();
        let updated = updated.json::<Task>();
        assert_eq!(updated.title, "Design review");
        assert_eq!(updated.end_date, task.end_date);

        let found = server
            .get("/api/v1/tasks/search")
            .add_query_param("title", "REVIEW")
            .await
            .json::<Vec<Task>>();
        assert_eq!(found.len(), 1);

        let all = server.get("/api/v1/tasks").await.json::<Vec<Task>>();
        assert_eq!(all.len(), 1);

        let in_period = server
            .get("/api/v1/tasks/period")
            .add_query_param("start", "2025-01-01")
            .add_query_param("end", "2025-01-31")
            .await
            .json::<Vec<Task>>();
        assert_eq!(in_period.len(), 1);

        server
            .delete(&format!("/api/v1/tasks/{}", task.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/api/v1/tasks/{}", task.id))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn update_with_end_before_start_is_a_bad_request() {
        let server = setup();
        let project = create_project(&server, "Alpha", "2025-01-01", None).await;
        let task = create_task(&server, project.id, "Design").await;

        server
            .put(&format!("/api/v1/tasks/{}", task.id))
            .json(&json!({ "end_date": "2025-01-01" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
