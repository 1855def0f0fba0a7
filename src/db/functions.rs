use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Result};
use crate::spatial;

/// Register the spatial SQL functions on a connection.
///
/// `ST_Contains(a, b)` takes two (E)WKT text values and returns 1/0, or NULL
/// when either argument is NULL. Invalid geometries and mixed SRIDs raise an
/// SQL error that aborts the statement.
pub fn register_spatial_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "ST_Contains",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let container: Option<String> = ctx.get(0)?;
            let contained: Option<String> = ctx.get(1)?;
            match (container, contained) {
                (Some(a), Some(b)) => spatial::st_contains(&a, &b)
                    .map(Some)
                    .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e))),
                _ => Ok(None),
            }
        },
    )
}
