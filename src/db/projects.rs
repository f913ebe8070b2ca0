use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::contains_pattern;
use crate::models::{CreateProjectInput, Project};

const COLUMNS: &str = "id, name, description, start_date, end_date";

fn project_from_row(row: &Row<'_>) -> Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
    })
}

/// Queries over the `projects` table.
pub struct ProjectRepository;

impl ProjectRepository {
    pub fn find_all(conn: &Connection) -> Result<Vec<Project>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM projects ORDER BY id"))?;
        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(projects)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Project>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"),
            [id],
            project_from_row,
        )
        .optional()
    }

    pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )
    }

    pub fn insert(conn: &Connection, input: &CreateProjectInput) -> Result<Project> {
        conn.execute(
            "INSERT INTO projects (name, description, start_date, end_date) VALUES (?1, ?2, ?3, ?4)",
            params![input.name, input.description, input.start_date, input.end_date],
        )?;

        Ok(Project {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
        })
    }

    pub fn update(conn: &Connection, project: &Project) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE projects SET name = ?1, description = ?2, start_date = ?3, end_date = ?4 WHERE id = ?5",
            params![
                project.name,
                project.description,
                project.start_date,
                project.end_date,
                project.id
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows = conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Case-insensitive substring match on the name.
    pub fn search_by_name(conn: &Connection, term: &str) -> Result<Vec<Project>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM projects
             WHERE unicode_lower(name) LIKE ?1 ESCAPE '\\' ORDER BY id"
        ))?;
        let projects = stmt
            .query_map([contains_pattern(term)], project_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(projects)
    }

    /// Projects with no end date, or ending on `today` or later.
    pub fn find_active(conn: &Connection, today: NaiveDate) -> Result<Vec<Project>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM projects
             WHERE end_date IS NULL OR end_date >= ?1 ORDER BY id"
        ))?;
        let projects = stmt
            .query_map([today], project_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(projects)
    }

    pub fn find_open_ended(conn: &Connection) -> Result<Vec<Project>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM projects WHERE end_date IS NULL ORDER BY id"
        ))?;
        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(projects)
    }

    /// Projects whose start date lies in `[from, to]`.
    pub fn find_starting_between(
        conn: &Connection,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Project>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM projects
             WHERE start_date BETWEEN ?1 AND ?2 ORDER BY start_date, id"
        ))?;
        let projects = stmt
            .query_map(params![from, to], project_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(projects)
    }
}
