//! Planar geometry support backing the `ST_Contains` SQL function.
//!
//! Geometries travel through SQL as (E)WKT text. A feature geometry must be
//! tagged with the same SRID as the task geometry it is tested against;
//! GeoJSON input is always WGS84, so callers tag it with [`WGS84_SRID`].

pub mod predicate;
pub mod wkt;

pub use predicate::contains;
pub use wkt::{parse_ewkt, parse_wkt, to_ewkt, to_wkt, WktError, WGS84_SRID};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("Operation on mixed SRID geometries ({0} != {1})")]
    MixedSrid(i32, i32),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(#[from] WktError),
}

/// Evaluate `ST_Contains(a, b)` over two (E)WKT strings.
///
/// An untagged side adopts the other side's SRID.
pub fn st_contains(a: &str, b: &str) -> Result<bool, SpatialError> {
    let (srid_a, geom_a) = parse_ewkt(a)?;
    let (srid_b, geom_b) = parse_ewkt(b)?;
    if let (Some(sa), Some(sb)) = (srid_a, srid_b) {
        if sa != sb {
            return Err(SpatialError::MixedSrid(sa, sb));
        }
    }
    Ok(contains(&geom_a, &geom_b))
}
