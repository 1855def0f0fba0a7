// Typed GeoJSON (RFC 7946) model
// Coordinates are always WGS84; the format carries no CRS metadata.

pub mod feature;
pub mod geometry;

pub use feature::*;
pub use geometry::*;
