// Well-known text encoding for GeoJSON geometries, with the PostGIS
// "SRID=<n>;" extension used to tag the coordinate reference system.

use crate::geojson::{Geometry, Position};
use thiserror::Error;

/// SRID of WGS84, the only CRS GeoJSON allows.
pub const WGS84_SRID: i32 = 4326;

#[derive(Debug, Error, PartialEq)]
pub enum WktError {
    #[error("unexpected end of WKT input")]
    UnexpectedEnd,
    #[error("unexpected token '{found}' in WKT, expected {expected}")]
    UnexpectedToken { found: String, expected: &'static str },
    #[error("unknown WKT geometry type '{0}'")]
    UnknownType(String),
    #[error("invalid SRID prefix '{0}'")]
    InvalidSrid(String),
    #[error("invalid number '{0}' in WKT")]
    InvalidNumber(String),
    #[error("empty {0} cannot be represented in GeoJSON")]
    EmptyPoint(&'static str),
}

/// Render a geometry as WKT, e.g. `POLYGON((0 0,1 0,1 1,0 0))`.
pub fn to_wkt(geometry: &Geometry) -> String {
    let mut out = String::new();
    write_geometry(&mut out, geometry);
    out
}

/// Render a geometry as EWKT tagged with `srid`, e.g. `SRID=4326;POINT(1 2)`.
pub fn to_ewkt(geometry: &Geometry, srid: i32) -> String {
    format!("SRID={};{}", srid, to_wkt(geometry))
}

fn has_z<'a>(mut positions: impl Iterator<Item = &'a Position>) -> bool {
    positions.any(|p| p.z.is_some())
}

fn dimension_suffix(z: bool) -> &'static str {
    if z { " Z" } else { "" }
}

fn write_position(out: &mut String, p: &Position, z: bool) {
    out.push_str(&format!("{} {}", p.x, p.y));
    if z {
        out.push_str(&format!(" {}", p.z.unwrap_or(0.0)));
    }
}

fn write_positions(out: &mut String, positions: &[Position], z: bool) {
    if positions.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    for (i, p) in positions.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_position(out, p, z);
    }
    out.push(')');
}

fn write_rings(out: &mut String, rings: &[Vec<Position>], z: bool) {
    if rings.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_positions(out, ring, z);
    }
    out.push(')');
}

fn write_geometry(out: &mut String, geometry: &Geometry) {
    match geometry {
        Geometry::Point { coordinates } => {
            let z = coordinates.z.is_some();
            out.push_str("POINT");
            out.push_str(dimension_suffix(z));
            out.push('(');
            write_position(out, coordinates, z);
            out.push(')');
        }
        Geometry::MultiPoint { coordinates } => {
            let z = has_z(coordinates.iter());
            out.push_str("MULTIPOINT");
            out.push_str(dimension_suffix(z));
            if coordinates.is_empty() {
                out.push_str(" EMPTY");
                return;
            }
            out.push('(');
            for (i, p) in coordinates.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('(');
                write_position(out, p, z);
                out.push(')');
            }
            out.push(')');
        }
        Geometry::LineString { coordinates } => {
            let z = has_z(coordinates.iter());
            out.push_str("LINESTRING");
            out.push_str(dimension_suffix(z));
            if coordinates.is_empty() {
                out.push(' ');
            }
            write_positions(out, coordinates, z);
        }
        Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
            let z = has_z(coordinates.iter().flatten());
            out.push_str(if matches!(geometry, Geometry::Polygon { .. }) {
                "POLYGON"
            } else {
                "MULTILINESTRING"
            });
            out.push_str(dimension_suffix(z));
            if coordinates.is_empty() {
                out.push(' ');
            }
            write_rings(out, coordinates, z);
        }
        Geometry::MultiPolygon { coordinates } => {
            let z = has_z(coordinates.iter().flatten().flatten());
            out.push_str("MULTIPOLYGON");
            out.push_str(dimension_suffix(z));
            if coordinates.is_empty() {
                out.push_str(" EMPTY");
                return;
            }
            out.push('(');
            for (i, polygon) in coordinates.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_rings(out, polygon, z);
            }
            out.push(')');
        }
        Geometry::GeometryCollection { geometries } => {
            out.push_str("GEOMETRYCOLLECTION");
            if geometries.is_empty() {
                out.push_str(" EMPTY");
                return;
            }
            out.push('(');
            for (i, g) in geometries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_geometry(out, g);
            }
            out.push(')');
        }
    }
}

/// Parse WKT or EWKT. Returns the SRID when the input carries a
/// `SRID=<n>;` prefix.
pub fn parse_ewkt(input: &str) -> Result<(Option<i32>, Geometry), WktError> {
    let trimmed = input.trim();
    let (srid, body) = match trimmed.split_once(';') {
        Some((prefix, rest)) if prefix.trim().to_ascii_uppercase().starts_with("SRID=") => {
            let value = prefix.trim()[5..].trim();
            let srid = value
                .parse::<i32>()
                .map_err(|_| WktError::InvalidSrid(prefix.to_string()))?;
            (Some(srid), rest)
        }
        _ => (None, trimmed),
    };

    let mut parser = Parser::new(body);
    let geometry = parser.geometry()?;
    if let Some(token) = parser.next() {
        return Err(WktError::UnexpectedToken { found: token, expected: "end of input" });
    }
    Ok((srid, geometry))
}

/// Parse plain WKT, ignoring any SRID prefix.
pub fn parse_wkt(input: &str) -> Result<Geometry, WktError> {
    parse_ewkt(input).map(|(_, g)| g)
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
    /// The current geometry was tagged `M`: a third ordinate is a measure
    measured: bool,
}

impl Parser {
    fn new(input: &str) -> Self {
        let mut tokens = Vec::new();
        let mut current = String::new();
        for c in input.chars() {
            match c {
                '(' | ')' | ',' => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    tokens.push(c.to_string());
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
        Self { tokens, pos: 0, measured: false }
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|t| t.as_str())
    }

    fn next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &'static str) -> Result<(), WktError> {
        match self.next() {
            Some(t) if t == expected => Ok(()),
            Some(t) => Err(WktError::UnexpectedToken { found: t, expected }),
            None => Err(WktError::UnexpectedEnd),
        }
    }

    fn peek_is(&self, token: &str) -> bool {
        self.peek().map(|t| t.eq_ignore_ascii_case(token)).unwrap_or(false)
    }

    /// Consumes an optional `Z`, `M` or `ZM` dimension marker. Returns
    /// whether the marker declares a measure without altitude, or `None`
    /// when there is no marker.
    fn dimension(&mut self) -> Option<bool> {
        if self.peek_is("M") {
            self.pos += 1;
            Some(true)
        } else if self.peek_is("Z") || self.peek_is("ZM") {
            self.pos += 1;
            Some(false)
        } else {
            None
        }
    }

    /// Returns true and consumes the token when the next token is EMPTY.
    fn empty(&mut self) -> bool {
        if self.peek_is("EMPTY") {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Result<f64, WktError> {
        let token = self.next().ok_or(WktError::UnexpectedEnd)?;
        token.parse::<f64>().map_err(|_| WktError::InvalidNumber(token))
    }

    fn position(&mut self) -> Result<Position, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        let mut extra = Vec::new();
        while let Some(t) = self.peek() {
            if t == "," || t == ")" {
                break;
            }
            extra.push(self.number()?);
        }
        // Measures have no place in GeoJSON. An untagged third ordinate
        // is an altitude.
        let z = if self.measured { None } else { extra.first().copied() };
        Ok(match z {
            Some(z) => Position::with_z(x, y, z),
            None => Position::new(x, y),
        })
    }

    fn position_list(&mut self) -> Result<Vec<Position>, WktError> {
        if self.empty() {
            return Ok(Vec::new());
        }
        self.expect("(")?;
        let mut positions = vec![self.position()?];
        while self.peek() == Some(",") {
            self.pos += 1;
            positions.push(self.position()?);
        }
        self.expect(")")?;
        Ok(positions)
    }

    fn ring_list(&mut self) -> Result<Vec<Vec<Position>>, WktError> {
        if self.empty() {
            return Ok(Vec::new());
        }
        self.expect("(")?;
        let mut rings = vec![self.position_list()?];
        while self.peek() == Some(",") {
            self.pos += 1;
            rings.push(self.position_list()?);
        }
        self.expect(")")?;
        Ok(rings)
    }

    /// MULTIPOINT accepts both `(1 2, 3 4)` and `((1 2), (3 4))`.
    fn multi_point(&mut self) -> Result<Vec<Position>, WktError> {
        if self.empty() {
            return Ok(Vec::new());
        }
        self.expect("(")?;
        let mut positions = Vec::new();
        loop {
            if self.peek() == Some("(") {
                self.pos += 1;
                positions.push(self.position()?);
                self.expect(")")?;
            } else if self.empty() {
                // EMPTY members carry no position
            } else {
                positions.push(self.position()?);
            }
            match self.next() {
                Some(t) if t == "," => continue,
                Some(t) if t == ")" => break,
                Some(t) => return Err(WktError::UnexpectedToken { found: t, expected: "',' or ')'" }),
                None => return Err(WktError::UnexpectedEnd),
            }
        }
        Ok(positions)
    }

    /// Parses one geometry. Collection members without their own marker
    /// inherit the collection's.
    fn geometry(&mut self) -> Result<Geometry, WktError> {
        let keyword = self.next().ok_or(WktError::UnexpectedEnd)?.to_ascii_uppercase();
        let outer = self.measured;
        if let Some(measured) = self.dimension() {
            self.measured = measured;
        }
        let geometry = self.geometry_body(&keyword);
        self.measured = outer;
        geometry
    }

    fn geometry_body(&mut self, keyword: &str) -> Result<Geometry, WktError> {
        match keyword {
            "POINT" => {
                if self.empty() {
                    return Err(WktError::EmptyPoint("POINT"));
                }
                self.expect("(")?;
                let p = self.position()?;
                self.expect(")")?;
                Ok(Geometry::Point { coordinates: p })
            }
            "MULTIPOINT" => Ok(Geometry::MultiPoint { coordinates: self.multi_point()? }),
            "LINESTRING" => Ok(Geometry::LineString { coordinates: self.position_list()? }),
            "MULTILINESTRING" => Ok(Geometry::MultiLineString { coordinates: self.ring_list()? }),
            "POLYGON" => Ok(Geometry::Polygon { coordinates: self.ring_list()? }),
            "MULTIPOLYGON" => {
                if self.empty() {
                    return Ok(Geometry::MultiPolygon { coordinates: Vec::new() });
                }
                self.expect("(")?;
                let mut polygons = vec![self.ring_list()?];
                while self.peek() == Some(",") {
                    self.pos += 1;
                    polygons.push(self.ring_list()?);
                }
                self.expect(")")?;
                Ok(Geometry::MultiPolygon { coordinates: polygons })
            }
            "GEOMETRYCOLLECTION" => {
                if self.empty() {
                    return Ok(Geometry::GeometryCollection { geometries: Vec::new() });
                }
                self.expect("(")?;
                let mut geometries = vec![self.geometry()?];
                while self.peek() == Some(",") {
                    self.pos += 1;
                    geometries.push(self.geometry()?);
                }
                self.expect(")")?;
                Ok(Geometry::GeometryCollection { geometries })
            }
            _ => Err(WktError::UnknownType(keyword.to_string())),
        }
    }
}
