use rusqlite::{Connection, OptionalExtension, Row};
use crate::models::TaskData;
use anyhow::{Context, Result};

/// Task data repository for database operations
///
/// There is at most one row per `(project_id, task_id)`.
pub struct TaskDataRepo;

fn row_to_task_data(row: &Row) -> rusqlite::Result<TaskData> {
    Ok(TaskData {
        id: Some(row.get(0)?),
        project_id: row.get(1)?,
        task_id: row.get(2)?,
        dataset_id: row.get(3)?,
        data: row.get(4)?,
        checksum: row.get(5)?,
        created_ts: row.get(6)?,
        modified_ts: row.get(7)?,
    })
}

impl TaskDataRepo {
    /// Create the data layer of a task
    pub fn create(
        conn: &Connection,
        project_id: i64,
        task_id: i64,
        dataset_id: i64,
        data: &str,
        checksum: &str,
    ) -> Result<TaskData> {
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            "INSERT INTO task_data (project_id, task_id, dataset_id, data, checksum, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![project_id, task_id, dataset_id, data, checksum, now, now],
        )
        .with_context(|| format!("Failed to create data layer for task {}", task_id))?;

        Ok(TaskData {
            id: Some(conn.last_insert_rowid()),
            project_id,
            task_id,
            dataset_id,
            data: data.to_string(),
            checksum: checksum.to_string(),
            created_ts: now,
            modified_ts: now,
        })
    }

    /// Get the data layer of a task
    pub fn get(conn: &Connection, project_id: i64, task_id: i64) -> Result<Option<TaskData>> {
        let task_data = conn
            .query_row(
                "SELECT id, project_id, task_id, dataset_id, data, checksum, created_ts, modified_ts
                 FROM task_data WHERE project_id = ?1 AND task_id = ?2",
                [project_id, task_id],
                row_to_task_data,
            )
            .optional()?;
        Ok(task_data)
    }

    /// List all data layers of a project, ordered by task id
    pub fn list_by_project(conn: &Connection, project_id: i64) -> Result<Vec<TaskData>> {
        let mut stmt = conn.prepare(
            "SELECT id, project_id, task_id, dataset_id, data, checksum, created_ts, modified_ts
             FROM task_data WHERE project_id = ?1 ORDER BY task_id"
        )?;
        let rows = stmt.query_map([project_id], row_to_task_data)?;

        let mut layers = Vec::new();
        for row in rows {
            layers.push(row?);
        }
        Ok(layers)
    }

    /// Replace the content of an existing data layer, recording the dataset
    /// that produced it
    pub fn update_content(
        conn: &Connection,
        task_data: &mut TaskData,
        dataset_id: i64,
        data: &str,
        checksum: &str,
    ) -> Result<()> {
        let id = task_data.id.context("Cannot update a data layer that was never saved")?;
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            "UPDATE task_data SET dataset_id = ?1, data = ?2, checksum = ?3, modified_ts = ?4 WHERE id = ?5",
            rusqlite::params![dataset_id, data, checksum, now, id],
        )
        .with_context(|| format!("Failed to update data layer for task {}", task_data.task_id))?;

        task_data.dataset_id = dataset_id;
        task_data.data = data.to_string();
        task_data.checksum = checksum.to_string();
        task_data.modified_ts = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::geojson::Geometry;
    use crate::repo::{DatasetRepo, LicenseRepo, ProjectRepo, TaskRepo};

    fn setup() -> (Connection, i64, i64, i64) {
        let conn = DbConnection::connect_in_memory().unwrap();
        let project_id = ProjectRepo::create(&conn, "p").unwrap().id.unwrap();
        let license_id = LicenseRepo::create(&conn, "ODbL", None).unwrap().id.unwrap();
        let dataset_id = DatasetRepo::create(&conn, project_id, "d", license_id, "{}", "x")
            .unwrap()
            .id
            .unwrap();
        let task = TaskRepo::create(&conn, project_id, &Geometry::rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        (conn, project_id, task.id, dataset_id)
    }

    #[test]
    fn test_create_get_update() {
        let (conn, project_id, task_id, dataset_id) = setup();
        assert!(TaskDataRepo::get(&conn, project_id, task_id).unwrap().is_none());

        TaskDataRepo::create(&conn, project_id, task_id, dataset_id, "[]", "c1").unwrap();
        let mut layer = TaskDataRepo::get(&conn, project_id, task_id).unwrap().unwrap();
        assert_eq!(layer.checksum, "c1");

        TaskDataRepo::update_content(&conn, &mut layer, dataset_id, "[1]", "c2").unwrap();
        let reloaded = TaskDataRepo::get(&conn, project_id, task_id).unwrap().unwrap();
        assert_eq!(reloaded.id, layer.id);
        assert_eq!(reloaded.data, "[1]");
        assert_eq!(reloaded.checksum, "c2");
        assert_eq!(TaskDataRepo::list_by_project(&conn, project_id).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_layer_rejected() {
        let (conn, project_id, task_id, dataset_id) = setup();
        TaskDataRepo::create(&conn, project_id, task_id, dataset_id, "[]", "c1").unwrap();
        assert!(TaskDataRepo::create(&conn, project_id, task_id, dataset_id, "[]", "c1").is_err());
    }
}
