use rusqlite::{Connection, Result};
use std::collections::HashMap;
use crate::spatial::parse_wkt;

/// Current database schema version
const CURRENT_VERSION: u32 = 2;

/// Migration system for managing database schema versions
pub struct MigrationManager;

impl MigrationManager {
    /// Initialize the database with the current schema
    /// This creates the schema_version table and applies all migrations
    pub fn initialize(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        let current_version = Self::get_version(conn)?;

        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        Ok(())
    }

    /// Apply a specific migration by version number
    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        if let Some(migration) = migrations.get(&version) {
            let tx = conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [version],
            )?;
            tx.commit()?;
            log::debug!("Applied schema migration v{}", version);
            Ok(())
        } else {
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            ))
        }
    }

    /// Get the current schema version
    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

/// Get all migrations indexed by version
fn get_migrations() -> HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> {
    let mut migrations: HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations.insert(2, migration_v2);
    migrations
}

/// Migration v1: Initial schema
fn migration_v1(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute(
        "CREATE TABLE projects (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE licenses (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            url TEXT NULL
        )",
        [],
    )?;

    // One dataset per project; data is the raw GeoJSON text as loaded
    tx.execute(
        "CREATE TABLE datasets (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL UNIQUE REFERENCES projects(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            license_id INTEGER NOT NULL REFERENCES licenses(id),
            data TEXT NOT NULL,
            checksum TEXT NOT NULL,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL
        )",
        [],
    )?;

    // Task ids are numbered per project.
    // geometry is EWKT, always tagged SRID=4326.
    tx.execute(
        "CREATE TABLE tasks (
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            id INTEGER NOT NULL,
            geometry TEXT NOT NULL,
            created_ts INTEGER NOT NULL,
            PRIMARY KEY(project_id, id)
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE task_data (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            task_id INTEGER NOT NULL,
            dataset_id INTEGER NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
            data TEXT NOT NULL,
            checksum TEXT NOT NULL,
            created_ts INTEGER NOT NULL,
            modified_ts INTEGER NOT NULL,
            UNIQUE(project_id, task_id),
            FOREIGN KEY(project_id, task_id) REFERENCES tasks(project_id, id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Task state history (append-only)
    tx.execute(
        "CREATE TABLE task_states (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            task_id INTEGER NOT NULL,
            state TEXT NOT NULL CHECK(state IN ('ready','done','validated','invalidated')),
            created_ts INTEGER NOT NULL,
            FOREIGN KEY(project_id, task_id) REFERENCES tasks(project_id, id) ON DELETE CASCADE
        )",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_task_states_task_ts ON task_states(project_id, task_id, created_ts)",
        [],
    )?;

    Ok(())
}

/// Migration v2: Bounding box columns on tasks
///
/// Lets the containment query skip tasks whose box cannot hold the feature
/// before `ST_Contains` parses their geometry. Rows whose geometry does not
/// parse keep NULL boxes and are always tested.
fn migration_v2(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    for column in ["min_x", "min_y", "max_x", "max_y"] {
        tx.execute(&format!("ALTER TABLE tasks ADD COLUMN {} REAL NULL", column), [])?;
    }

    let rows: Vec<(i64, i64, String)> = {
        let mut stmt = tx.prepare("SELECT project_id, id, geometry FROM tasks")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        let collected = rows.collect::<Result<Vec<_>, rusqlite::Error>>()?;
        collected
    };
    for (project_id, id, geometry) in rows {
        let Some([min_x, min_y, max_x, max_y]) = parse_wkt(&geometry).ok().and_then(|g| g.bbox()) else {
            continue;
        };
        tx.execute(
            "UPDATE tasks SET min_x = ?1, min_y = ?2, max_x = ?3, max_y = ?4 WHERE project_id = ?5 AND id = ?6",
            rusqlite::params![min_x, min_y, max_x, max_y, project_id, id],
        )?;
    }

    tx.execute(
        "CREATE INDEX idx_tasks_bbox ON tasks(project_id, min_x, max_x)",
        [],
    )?;
    Ok(())
}
