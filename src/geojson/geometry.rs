use serde::{Deserialize, Serialize};

/// A single coordinate position (longitude, latitude, optional altitude).
///
/// Serialized as a JSON array (`[x, y]` or `[x, y, z]`). Extra elements beyond
/// the third are rejected rather than silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y] => Ok(Position::new(*x, *y)),
            [x, y, z] => Ok(Position::with_z(*x, *y, *z)),
            other => Err(format!(
                "position must have 2 or 3 elements, found {}",
                other.len()
            )),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(p: Position) -> Self {
        match p.z {
            Some(z) => vec![p.x, p.y, z],
            None => vec![p.x, p.y],
        }
    }
}

/// GeoJSON geometry object, tagged by its `type` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    /// First ring is the exterior, the rest are holes.
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: Position::new(x, y) }
    }

    /// Build a single-ring polygon from `(x, y)` pairs. The ring is closed
    /// automatically if the last pair differs from the first.
    pub fn polygon(ring: &[(f64, f64)]) -> Self {
        let mut positions: Vec<Position> = ring.iter().map(|&(x, y)| Position::new(x, y)).collect();
        if let (Some(first), Some(last)) = (positions.first().copied(), positions.last().copied()) {
            if first != last {
                positions.push(first);
            }
        }
        Geometry::Polygon { coordinates: vec![positions] }
    }

    /// Axis-aligned rectangle polygon.
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::polygon(&[
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
        ])
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// True when the geometry has no positions at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point { .. } => false,
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.is_empty()
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().all(|line| line.is_empty())
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .all(|poly| poly.iter().all(|ring| ring.is_empty())),
            Geometry::GeometryCollection { geometries } => geometries.iter().all(|g| g.is_empty()),
        }
    }

    /// Bounding box as `[min_x, min_y, max_x, max_y]` (the GeoJSON `bbox`
    /// order), or `None` when the geometry has no positions.
    pub fn bbox(&self) -> Option<[f64; 4]> {
        let mut bounds: Option<[f64; 4]> = None;
        self.visit_positions(&mut |p| {
            bounds = Some(match bounds {
                None => [p.x, p.y, p.x, p.y],
                Some([min_x, min_y, max_x, max_y]) => {
                    [min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y)]
                }
            });
        });
        bounds
    }

    fn visit_positions(&self, f: &mut dyn FnMut(&Position)) {
        match self {
            Geometry::Point { coordinates } => f(coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                for p in coordinates {
                    f(p);
                }
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                for p in coordinates.iter().flatten() {
                    f(p);
                }
            }
            Geometry::MultiPolygon { coordinates } => {
                for p in coordinates.iter().flatten().flatten() {
                    f(p);
                }
            }
            Geometry::GeometryCollection { geometries } => {
                for g in geometries {
                    g.visit_positions(f);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_json_shape() {
        let json = serde_json::to_string(&Geometry::point(1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"type":"Point","coordinates":[1.5,-2.0]}"#);
    }

    #[test]
    fn test_position_with_altitude() {
        let g: Geometry = serde_json::from_str(r#"{"type":"Point","coordinates":[1,2,3]}"#).unwrap();
        assert_eq!(g, Geometry::Point { coordinates: Position::with_z(1.0, 2.0, 3.0) });
    }

    #[test]
    fn test_position_rejects_bad_arity() {
        assert!(serde_json::from_str::<Geometry>(r#"{"type":"Point","coordinates":[1]}"#).is_err());
        assert!(serde_json::from_str::<Geometry>(r#"{"type":"Point","coordinates":[1,2,3,4]}"#).is_err());
    }

    #[test]
    fn test_unknown_geometry_type_rejected() {
        assert!(serde_json::from_str::<Geometry>(r#"{"type":"Circle","coordinates":[1,2]}"#).is_err());
    }

    #[test]
    fn test_polygon_helper_closes_ring() {
        match Geometry::rect(0.0, 0.0, 1.0, 1.0) {
            Geometry::Polygon { coordinates } => {
                assert_eq!(coordinates[0].len(), 5);
                assert_eq!(coordinates[0][0], coordinates[0][4]);
            }
            other => panic!("expected polygon, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(!Geometry::point(0.0, 0.0).is_empty());
        assert!(Geometry::MultiPoint { coordinates: vec![] }.is_empty());
        assert!(Geometry::GeometryCollection { geometries: vec![] }.is_empty());
        assert!(!Geometry::rect(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_bbox() {
        assert_eq!(Geometry::point(1.0, -2.0).bbox(), Some([1.0, -2.0, 1.0, -2.0]));
        assert_eq!(Geometry::rect(0.5, 1.0, 2.0, 3.0).bbox(), Some([0.5, 1.0, 2.0, 3.0]));

        let mixed = Geometry::GeometryCollection {
            geometries: vec![Geometry::point(5.0, 5.0), Geometry::rect(-1.0, 0.0, 1.0, 1.0)],
        };
        assert_eq!(mixed.bbox(), Some([-1.0, 0.0, 5.0, 5.0]));
        assert_eq!(Geometry::GeometryCollection { geometries: vec![] }.bbox(), None);
    }
}
