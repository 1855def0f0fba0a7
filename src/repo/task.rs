use rusqlite::{Connection, OptionalExtension, Row};
use rusqlite::types::Type;
use crate::geojson::Geometry;
use crate::models::{Task, TaskState, TaskStateKind};
use crate::spatial::{parse_wkt, to_ewkt, WGS84_SRID};
use anyhow::{Context, Result};

/// Task repository for database operations
///
/// Tasks are the grid cells of a project. Their geometry never changes after
/// creation; their workflow is an append-only list of [`TaskState`] rows.
///
/// # Example
///
/// ```no_run
/// use datalayers::db::DbConnection;
/// use datalayers::geojson::Geometry;
/// use datalayers::repo::{ProjectRepo, TaskRepo};
///
/// let conn = DbConnection::connect_in_memory().unwrap();
/// let project = ProjectRepo::create(&conn, "Schools").unwrap();
/// let cell = Geometry::rect(0.0, 0.0, 0.01, 0.01);
/// let task = TaskRepo::create(&conn, project.id.unwrap(), &cell).unwrap();
/// let hits = TaskRepo::ids_containing(&conn, project.id.unwrap(), &Geometry::point(0.005, 0.005)).unwrap();
/// assert_eq!(hits, vec![task.id]);
/// ```
pub struct TaskRepo;

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let wkt: String = row.get(2)?;
    let geometry = parse_wkt(&wkt)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(Task {
        project_id: row.get(0)?,
        id: row.get(1)?,
        geometry,
        created_ts: row.get(3)?,
    })
}

fn row_to_state(row: &Row) -> rusqlite::Result<TaskState> {
    let state: String = row.get(3)?;
    let state = TaskStateKind::from_str(&state).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown task state '{}'", state).into(),
        )
    })?;
    Ok(TaskState {
        id: Some(row.get(0)?),
        project_id: row.get(1)?,
        task_id: row.get(2)?,
        state,
        created_ts: row.get(4)?,
    })
}

impl TaskRepo {
    /// Create a task with the next free id in the project
    pub fn create(conn: &Connection, project_id: i64, geometry: &Geometry) -> Result<Task> {
        let now = chrono::Utc::now().timestamp();
        let id: i64 = conn.query_row(
            "SELECT COALESCE(MAX(id), 0) + 1 FROM tasks WHERE project_id = ?1",
            [project_id],
            |row| row.get(0),
        )?;

        let bbox = geometry.bbox();
        conn.execute(
            "INSERT INTO tasks (project_id, id, geometry, created_ts, min_x, min_y, max_x, max_y)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                project_id,
                id,
                to_ewkt(geometry, WGS84_SRID),
                now,
                bbox.map(|b| b[0]),
                bbox.map(|b| b[1]),
                bbox.map(|b| b[2]),
                bbox.map(|b| b[3]),
            ],
        )
        .with_context(|| format!("Failed to create task {} in project {}", id, project_id))?;

        Ok(Task {
            id,
            project_id,
            geometry: geometry.clone(),
            created_ts: now,
        })
    }

    /// Get task by project and ID
    pub fn get(conn: &Connection, project_id: i64, id: i64) -> Result<Option<Task>> {
        let task = conn
            .query_row(
                "SELECT project_id, id, geometry, created_ts FROM tasks
                 WHERE project_id = ?1 AND id = ?2",
                [project_id, id],
                row_to_task,
            )
            .optional()
            .with_context(|| format!("Failed to load task {} of project {}", id, project_id))?;
        Ok(task)
    }

    /// List all tasks of a project, ordered by id
    pub fn list_by_project(conn: &Connection, project_id: i64) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(
            "SELECT project_id, id, geometry, created_ts FROM tasks
             WHERE project_id = ?1 ORDER BY id"
        )?;
        let rows = stmt.query_map([project_id], row_to_task)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// IDs of the project's tasks whose geometry contains `geometry`,
    /// evaluated by the database's `ST_Contains`.
    ///
    /// GeoJSON carries no CRS; the geometry is tagged as WGS84 here so it
    /// matches the stored task geometries. Tasks whose bounding box cannot
    /// hold the geometry are skipped without evaluating `ST_Contains`; tasks
    /// without a stored box are always evaluated.
    pub fn ids_containing(conn: &Connection, project_id: i64, geometry: &Geometry) -> Result<Vec<i64>> {
        // An empty geometry is contained by nothing
        let Some([min_x, min_y, max_x, max_y]) = geometry.bbox() else {
            return Ok(Vec::new());
        };
        let ewkt = to_ewkt(geometry, WGS84_SRID);
        // CASE keeps the box test ahead of the costly predicate
        let mut stmt = conn.prepare_cached(
            "SELECT id FROM tasks
             WHERE project_id = ?1
               AND CASE
                     WHEN min_x IS NULL
                       OR (min_x <= ?3 AND min_y <= ?4 AND max_x >= ?5 AND max_y >= ?6)
                     THEN ST_Contains(geometry, ?2)
                     ELSE 0
                   END
             ORDER BY id"
        )?;
        let rows = stmt.query_map(
            rusqlite::params![project_id, ewkt, min_x, min_y, max_x, max_y],
            |row| row.get::<_, i64>(0),
        )?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.with_context(|| format!("Spatial query failed for {}", ewkt))?);
        }
        Ok(ids)
    }

    /// Append a state to a task's history
    pub fn append_state(conn: &Connection, project_id: i64, task_id: i64, state: TaskStateKind) -> Result<TaskState> {
        let entry = TaskState::new(project_id, task_id, state);

        conn.execute(
            "INSERT INTO task_states (project_id, task_id, state, created_ts) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![project_id, task_id, state.as_str(), entry.created_ts],
        )
        .with_context(|| format!("Failed to append state '{}' to task {}", state.as_str(), task_id))?;

        Ok(TaskState {
            id: Some(conn.last_insert_rowid()),
            ..entry
        })
    }

    /// Full state history of a task, oldest first
    pub fn get_states(conn: &Connection, project_id: i64, task_id: i64) -> Result<Vec<TaskState>> {
        let mut stmt = conn.prepare(
            "SELECT id, project_id, task_id, state, created_ts FROM task_states
             WHERE project_id = ?1 AND task_id = ?2
             ORDER BY created_ts, id"
        )?;
        let rows = stmt.query_map([project_id, task_id], row_to_state)?;

        let mut states = Vec::new();
        for row in rows {
            states.push(row?);
        }
        Ok(states)
    }

    /// Most recent state of a task, if it has any
    pub fn current_state(conn: &Connection, project_id: i64, task_id: i64) -> Result<Option<TaskStateKind>> {
        let state = conn
            .query_row(
                "SELECT id, project_id, task_id, state, created_ts FROM task_states
                 WHERE project_id = ?1 AND task_id = ?2
                 ORDER BY created_ts DESC, id DESC LIMIT 1",
                [project_id, task_id],
                row_to_state,
            )
            .optional()?;
        Ok(state.map(|s| s.state))
    }
}
