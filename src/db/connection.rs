use rusqlite::Connection;
use std::path::Path;
use anyhow::{Context, Result};
use crate::config::Settings;
use crate::db::functions::register_spatial_functions;
use crate::db::migrations::MigrationManager;

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    /// Connect to the database named by the settings
    pub fn connect(settings: &Settings) -> Result<Connection> {
        Self::open(&settings.data_location)
    }

    /// Open a database file, creating it and parent directories if needed
    pub fn open(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        log::debug!("Opened database {}", db_path.display());

        Self::prepare(&conn)?;
        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        Self::prepare(&conn)?;
        Ok(conn)
    }

    fn prepare(conn: &Connection) -> Result<()> {
        // Must be set outside any transaction to take effect
        conn.execute("PRAGMA foreign_keys=ON", [])
            .context("Failed to enable foreign keys")?;

        register_spatial_functions(conn)
            .context("Failed to register spatial functions")?;

        MigrationManager::initialize(conn)
            .context("Failed to initialize database schema")?;

        Ok(())
    }
}
