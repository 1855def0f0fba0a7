use rusqlite::{Connection, OptionalExtension, Row};
use crate::models::Dataset;
use anyhow::{Context, Result};

/// Dataset repository for database operations
///
/// Each project has at most one dataset. It is replaced in place when a new
/// version of the document is loaded, never deleted.
pub struct DatasetRepo;

fn row_to_dataset(row: &Row) -> rusqlite::Result<Dataset> {
    Ok(Dataset {
        id: Some(row.get(0)?),
        project_id: row.get(1)?,
        name: row.get(2)?,
        license_id: row.get(3)?,
        data: row.get(4)?,
        checksum: row.get(5)?,
        created_ts: row.get(6)?,
        modified_ts: row.get(7)?,
    })
}

impl DatasetRepo {
    /// Create the dataset for a project
    pub fn create(
        conn: &Connection,
        project_id: i64,
        name: &str,
        license_id: i64,
        data: &str,
        checksum: &str,
    ) -> Result<Dataset> {
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            "INSERT INTO datasets (project_id, name, license_id, data, checksum, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![project_id, name, license_id, data, checksum, now, now],
        )
        .with_context(|| format!("Failed to create dataset for project {}", project_id))?;

        Ok(Dataset {
            id: Some(conn.last_insert_rowid()),
            project_id,
            name: name.to_string(),
            license_id,
            data: data.to_string(),
            checksum: checksum.to_string(),
            created_ts: now,
            modified_ts: now,
        })
    }

    /// Get the dataset of a project
    pub fn get_by_project(conn: &Connection, project_id: i64) -> Result<Option<Dataset>> {
        let dataset = conn
            .query_row(
                "SELECT id, project_id, name, license_id, data, checksum, created_ts, modified_ts
                 FROM datasets WHERE project_id = ?1",
                [project_id],
                row_to_dataset,
            )
            .optional()?;
        Ok(dataset)
    }

    /// Replace the content and checksum of an existing dataset
    pub fn update_content(conn: &Connection, dataset: &mut Dataset, data: &str, checksum: &str) -> Result<()> {
        let id = dataset.id.context("Cannot update a dataset that was never saved")?;
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            "UPDATE datasets SET data = ?1, checksum = ?2, modified_ts = ?3 WHERE id = ?4",
            rusqlite::params![data, checksum, now, id],
        )
        .with_context(|| format!("Failed to update dataset {}", id))?;

        dataset.data = data.to_string();
        dataset.checksum = checksum.to_string();
        dataset.modified_ts = now;
        Ok(())
    }
}
