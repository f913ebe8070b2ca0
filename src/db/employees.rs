use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::contains_pattern;
use crate::models::Employee;

const COLUMNS: &str = "e.id, e.last_name, e.first_name, e.email";

fn employee_from_row(row: &Row<'_>) -> Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        email: row.get(3)?,
    })
}

/// Queries over the `employees` table.
pub struct EmployeeRepository;

impl EmployeeRepository {
    fn query(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Employee>> {
        let mut stmt = conn.prepare(sql)?;
        let employees = stmt
            .query_map(params, employee_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(employees)
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Employee>> {
        Self::query(
            conn,
            &format!("SELECT {COLUMNS} FROM employees e ORDER BY e.id"),
            [],
        )
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Employee>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM employees e WHERE e.id = ?1"),
            [id],
            employee_from_row,
        )
        .optional()
    }

    pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Employee>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM employees e WHERE e.email = ?1"),
            [email],
            employee_from_row,
        )
        .optional()
    }

    pub fn exists(conn: &Connection, id: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )
    }

    pub fn exists_by_email(conn: &Connection, email: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ?1)",
            [email],
            |row| row.get(0),
        )
    }

    pub fn insert(conn: &Connection, employee: &Employee) -> Result<()> {
        conn.execute(
            "INSERT INTO employees (id, last_name, first_name, email) VALUES (?1, ?2, ?3, ?4)",
            params![
                employee.id,
                employee.last_name,
                employee.first_name,
                employee.email
            ],
        )?;
        Ok(())
    }

    pub fn update(conn: &Connection, employee: &Employee) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE employees SET last_name = ?1, first_name = ?2, email = ?3 WHERE id = ?4",
            params![
                employee.last_name,
                employee.first_name,
                employee.email,
                employee.id
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let rows = conn.execute("DELETE FROM employees WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Case-insensitive substring match on last name or first name.
    pub fn search_by_name(conn: &Connection, term: &str) -> Result<Vec<Employee>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM employees e
                 WHERE unicode_lower(e.last_name) LIKE ?1 ESCAPE '\\'
                    OR unicode_lower(e.first_name) LIKE ?1 ESCAPE '\\'
                 ORDER BY e.id"
            ),
            [contains_pattern(term)],
        )
    }

    pub fn search_by_last_name(conn: &Connection, term: &str) -> Result<Vec<Employee>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM employees e
                 WHERE unicode_lower(e.last_name) LIKE ?1 ESCAPE '\\' ORDER BY e.id"
            ),
            [contains_pattern(term)],
        )
    }

    pub fn search_by_first_name(conn: &Connection, term: &str) -> Result<Vec<Employee>> {
        Self::query(
            conn,
            &format!(
                "SELECT {COLUMNS} FROM employees e
                 WHERE unicode_lower(e.first_name) LIKE ?1 ESCAPE '\\' ORDER BY e.id"
            ),
            [contains_pattern(term)],
        )
    }

    /// Employees assigned to the task.
    pub fn find_by_task(conn: &Connection, task_id: i64) -> Result<Vec<Employee>> {
        Self::query(
            conn,
            &format!(
                "SELECT DISTINCT {COLUMNS} FROM employees e
                 JOIN employee_tasks a ON a.employee_id = e.id
                 WHERE a.task_id = ?1 ORDER BY e.id"
            ),
            [task_id],
        )
    }
}
