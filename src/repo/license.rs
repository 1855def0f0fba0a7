use rusqlite::{Connection, OptionalExtension};
use crate::models::License;
use anyhow::{Context, Result};

/// License repository for database operations
pub struct LicenseRepo;

impl LicenseRepo {
    /// Create a new license
    pub fn create(conn: &Connection, name: &str, url: Option<&str>) -> Result<License> {
        conn.execute(
            "INSERT INTO licenses (name, url) VALUES (?1, ?2)",
            rusqlite::params![name, url],
        )
        .with_context(|| format!("Failed to create license: {}", name))?;

        Ok(License {
            id: Some(conn.last_insert_rowid()),
            name: name.to_string(),
            url: url.map(str::to_string),
        })
    }

    /// Get license by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<License>> {
        let license = conn
            .query_row(
                "SELECT id, name, url FROM licenses WHERE id = ?1",
                [id],
                |row| {
                    Ok(License {
                        id: Some(row.get(0)?),
                        name: row.get(1)?,
                        url: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(license)
    }
}
