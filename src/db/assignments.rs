use rusqlite::{params, Connection, Result, Row};

use crate::models::{Assignment, AssignmentKey};

fn assignment_from_row(row: &Row<'_>) -> Result<Assignment> {
    Ok(Assignment {
        employee_id: row.get(0)?,
        task_id: row.get(1)?,
        role: row.get(2)?,
    })
}

/// Queries over the `employee_tasks` join table, keyed by `(employee_id, task_id)`.
pub struct AssignmentRepository;

impl AssignmentRepository {
    pub fn exists(conn: &Connection, key: &AssignmentKey) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employee_tasks WHERE employee_id = ?1 AND task_id = ?2)",
            params![key.employee_id, key.task_id],
            |row| row.get(0),
        )
    }

    pub fn insert(conn: &Connection, assignment: &Assignment) -> Result<()> {
        conn.execute(
            "INSERT INTO employee_tasks (employee_id, task_id, role) VALUES (?1, ?2, ?3)",
            params![assignment.employee_id, assignment.task_id, assignment.role],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, key: &AssignmentKey) -> Result<bool> {
        let rows = conn.execute(
            "DELETE FROM employee_tasks WHERE employee_id = ?1 AND task_id = ?2",
            params![key.employee_id, key.task_id],
        )?;
        Ok(rows > 0)
    }

    pub fn find_by_task(conn: &Connection, task_id: i64) -> Result<Vec<Assignment>> {
        let mut stmt = conn.prepare(
            "SELECT employee_id, task_id, role FROM employee_tasks
             WHERE task_id = ?1 ORDER BY employee_id",
        )?;
        let assignments = stmt
            .query_map([task_id], assignment_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(assignments)
    }

    pub fn find_by_employee(conn: &Connection, employee_id: &str) -> Result<Vec<Assignment>> {
        let mut stmt = conn.prepare(
            "SELECT employee_id, task_id, role FROM employee_tasks
             WHERE employee_id = ?1 ORDER BY task_id",
        )?;
        let assignments = stmt
            .query_map([employee_id], assignment_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(assignments)
    }

    pub fn count_by_task(conn: &Connection, task_id: i64) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM employee_tasks WHERE task_id = ?1",
            [task_id],
            |row| row.get(0),
        )
    }

    pub fn count_by_employee(conn: &Connection, employee_id: &str) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM employee_tasks WHERE employee_id = ?1",
            [employee_id],
            |row| row.get(0),
        )
    }

    pub fn delete_by_employee(conn: &Connection, employee_id: &str) -> Result<usize> {
        conn.execute(
            "DELETE FROM employee_tasks WHERE employee_id = ?1",
            [employee_id],
        )
    }

    pub fn delete_by_task(conn: &Connection, task_id: i64) -> Result<usize> {
        conn.execute("DELETE FROM employee_tasks WHERE task_id = ?1", [task_id])
    }

    /// Remove every assignment on any task of the project.
    pub fn delete_by_project(conn: &Connection, project_id: i64) -> Result<usize> {
        conn.execute(
            "DELETE FROM employee_tasks
             WHERE task_id IN (SELECT id FROM tasks WHERE project_id = ?1)",
            [project_id],
        )
    }
}
