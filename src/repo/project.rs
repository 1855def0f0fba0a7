use rusqlite::{Connection, OptionalExtension};
use crate::models::Project;
use anyhow::{Context, Result};

/// Project repository for database operations
///
/// Projects are created by administration tooling; the data layer job only
/// reads them.
///
/// # Example
///
/// ```no_run
/// use datalayers::db::DbConnection;
/// use datalayers::repo::ProjectRepo;
///
/// let conn = DbConnection::connect_in_memory().unwrap();
/// let project = ProjectRepo::create(&conn, "Flood mapping").unwrap();
/// assert!(ProjectRepo::get_by_id(&conn, project.id.unwrap()).unwrap().is_some());
/// ```
pub struct ProjectRepo;

impl ProjectRepo {
    /// Create a new project
    pub fn create(conn: &Connection, name: &str) -> Result<Project> {
        let project = Project::new(name.to_string());

        conn.execute(
            "INSERT INTO projects (name, created_ts, modified_ts) VALUES (?1, ?2, ?3)",
            rusqlite::params![project.name, project.created_ts, project.modified_ts],
        )
        .with_context(|| format!("Failed to create project: {}", name))?;

        let id = conn.last_insert_rowid();
        Ok(Project {
            id: Some(id),
            ..project
        })
    }

    /// Get project by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Project>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, created_ts, modified_ts FROM projects WHERE id = ?1"
        )?;

        let project = stmt.query_row([id], |row| {
            Ok(Project {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                created_ts: row.get(2)?,
                modified_ts: row.get(3)?,
            })
        }).optional()?;

        Ok(project)
    }
}
