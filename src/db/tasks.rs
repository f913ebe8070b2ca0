use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::contains_pattern;
use crate::models::{Task, TaskStatus};

const COLUMNS: &str = "t.id, t.project_id, t.title, t.description, t.start_date, t.end_date, t.status";

fn task_from_row(row: &Row<'_>) -> Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        status: TaskStatus::from_str(&row.get::<_, String>(6)?).unwrap_or_default(),
    })
}

/// Queries over the `tasks` table.
pub struct TaskRepository;

impl TaskRepository {
    fn query(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(sql)?;
        let tasks = stmt
            .query_map(params, task_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(tasks)
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!("SELECT {COLUMNS} FROM tasks t ORDER BY t.id"),
            [],
        )
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Task>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM tasks t WHERE t.id = ?1"),
            [id],
            task_from_row,
        )
        .optional()
    }

    pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )
    }

    /// Insert `task`, ignoring its `id`, and return it with the id the store assigned.
    pub fn insert(conn: &Connection, task: Task) -> Result<Task> {
        conn.execute(
            "INSERT INTO tasks (project_id, title, description, start_date, end_date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.project_id,
                task.title,
                task.description,
                task.start_date,
                task.end_date,
                task.status.as_str()
            ],
        )?;

        Ok(Task {
            id: conn.last_insert_rowid(),
            ..task
        })
    }

    /// Write the mutable fields of `task`. The project is left untouched.
    pub fn update(conn: &Connection, task: &Task) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, start_date = ?3, end_date = ?4, status = ?5
             WHERE id = ?6",
            params![
                task.title,
                task.description,
                task.start_date,
                task.end_date,
                task.status.as_str(),
                task.id
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn set_status(conn: &Connection, id: i64, status: TaskStatus) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    pub fn delete_by_project(conn: &Connection, project_id: i64) -> Result<usize> {
        conn.execute("DELETE FROM tasks WHERE project_id = ?1", [project_id])
    }

    pub fn find_by_project(conn: &Connection, project_id: i64) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!("SELECT {COLUMNS} FROM tasks t WHERE t.project_id = ?1 ORDER BY t.id"),
            [project_id],
        )
    }

    pub fn find_by_project_and_status(
        conn: &Connection,
        project_id: i64,
        status: TaskStatus,
    ) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM tasks t
                 WHERE t.project_id = ?1 AND t.status = ?2 ORDER BY t.id"
            ),
            params![project_id, status.as_str()],
        )
    }

    pub fn find_by_status(conn: &Connection, status: TaskStatus) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!("SELECT {COLUMNS} FROM tasks t WHERE t.status = ?1 ORDER BY t.id"),
            [status.as_str()],
        )
    }

    /// Case-insensitive substring match on the title.
    pub fn search_by_title(conn: &Connection, term: &str) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM tasks t
                 WHERE unicode_lower(t.title) LIKE ?1 ESCAPE '\\' ORDER BY t.id"
            ),
            [contains_pattern(term)],
        )
    }

    /// Tasks whose end date is strictly before `today` and that are not done.
    pub fn find_overdue(conn: &Connection, today: NaiveDate) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM tasks t
                 WHERE t.end_date < ?1 AND t.status != ?2 ORDER BY t.end_date, t.id"
            ),
            params![today, TaskStatus::Done.as_str()],
        )
    }

    /// Tasks the employee is assigned to.
    pub fn find_by_employee(conn: &Connection, employee_id: &str) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM tasks t
                 JOIN employee_tasks a ON a.task_id = t.id
                 WHERE a.employee_id = ?1 ORDER BY t.id"
            ),
            [employee_id],
        )
    }

    /// Tasks whose start date lies in `[from, to]`.
    pub fn find_starting_between(
        conn: &Connection,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Task>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM tasks t
                 WHERE t.start_date BETWEEN ?1 AND ?2 ORDER BY t.start_date, t.id"
            ),
            params![from, to],
        )
    }

    pub fn count_by_project(conn: &Connection, project_id: i64) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE project_id = ?1",
            [project_id],
            |row| row.get(0),
        )
    }

    pub fn count_by_project_and_status(
        conn: &Connection,
        project_id: i64,
        status: TaskStatus,
    ) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE project_id = ?1 AND status = ?2",
            params![project_id, status.as_str()],
            |row| row.get(0),
        )
    }
}
