// Containment predicate with OGC ST_Contains semantics for areal containers:
// A contains B iff no point of B lies in A's exterior and at least one point
// of B lies in A's interior. Works in planar lon/lat coordinates.

use crate::geojson::{Geometry, Position};

const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pt {
    x: f64,
    y: f64,
}

impl From<&Position> for Pt {
    fn from(p: &Position) -> Self {
        Pt { x: p.x, y: p.y }
    }
}

type Ring = Vec<Pt>;

/// A polygon as exterior ring followed by holes.
struct Area {
    rings: Vec<Ring>,
}

/// Decomposed pieces of the contained geometry.
#[derive(Default)]
struct Parts {
    points: Vec<Pt>,
    lines: Vec<Vec<Pt>>,
    polygons: Vec<Vec<Ring>>,
}

fn to_ring(positions: &[Position]) -> Ring {
    positions.iter().map(Pt::from).collect()
}

fn collect_areas(geometry: &Geometry, out: &mut Vec<Area>) {
    match geometry {
        Geometry::Polygon { coordinates } => {
            if coordinates.first().map(|r| !r.is_empty()).unwrap_or(false) {
                out.push(Area { rings: coordinates.iter().map(|r| to_ring(r)).collect() });
            }
        }
        Geometry::MultiPolygon { coordinates } => {
            for polygon in coordinates {
                if polygon.first().map(|r| !r.is_empty()).unwrap_or(false) {
                    out.push(Area { rings: polygon.iter().map(|r| to_ring(r)).collect() });
                }
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_areas(g, out);
            }
        }
        _ => {}
    }
}

fn collect_parts(geometry: &Geometry, out: &mut Parts) {
    match geometry {
        Geometry::Point { coordinates } => out.points.push(coordinates.into()),
        Geometry::MultiPoint { coordinates } => {
            out.points.extend(coordinates.iter().map(Pt::from));
        }
        Geometry::LineString { coordinates } => push_line(out, coordinates),
        Geometry::MultiLineString { coordinates } => {
            for line in coordinates {
                push_line(out, line);
            }
        }
        Geometry::Polygon { coordinates } => push_polygon(out, coordinates),
        Geometry::MultiPolygon { coordinates } => {
            for polygon in coordinates {
                push_polygon(out, polygon);
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_parts(g, out);
            }
        }
    }
}

fn push_line(out: &mut Parts, line: &[Position]) {
    match line.len() {
        0 => {}
        1 => out.points.push((&line[0]).into()),
        _ => out.lines.push(to_ring(line)),
    }
}

fn push_polygon(out: &mut Parts, rings: &[Vec<Position>]) {
    let Some(exterior) = rings.first() else {
        return;
    };
    if exterior.is_empty() {
        return;
    }
    let exterior = to_ring(exterior);
    if ring_area(&exterior).abs() <= EPSILON {
        // Degenerate polygon: treat its outline as a line
        out.lines.push(exterior);
        return;
    }
    out.polygons.push(rings.iter().map(|r| to_ring(r)).collect());
}

fn ring_area(ring: &[Pt]) -> f64 {
    let mut sum = 0.0;
    for w in ring.windows(2) {
        sum += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    sum / 2.0
}

fn cross(o: Pt, a: Pt, b: Pt) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(p: Pt, a: Pt, b: Pt) -> bool {
    if cross(a, b, p).abs() > EPSILON {
        return false;
    }
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

fn ring_edges(ring: &[Pt]) -> impl Iterator<Item = (Pt, Pt)> + '_ {
    let closing = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if first != last => Some((*last, *first)),
        _ => None,
    };
    ring.windows(2).map(|w| (w[0], w[1])).chain(closing)
}

/// Even-odd ray casting; boundary points are reported separately.
fn locate_in_ring(p: Pt, ring: &[Pt]) -> Location {
    let mut inside = false;
    for (a, b) in ring_edges(ring) {
        if on_segment(p, a, b) {
            return Location::Boundary;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_at = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_at {
                inside = !inside;
            }
        }
    }
    if inside { Location::Interior } else { Location::Exterior }
}

fn locate_in_area(p: Pt, area: &Area) -> Location {
    let Some(exterior) = area.rings.first() else {
        return Location::Exterior;
    };
    match locate_in_ring(p, exterior) {
        Location::Interior => {}
        other => return other,
    }
    for hole in &area.rings[1..] {
        match locate_in_ring(p, hole) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

fn locate(p: Pt, areas: &[Area]) -> Location {
    let mut result = Location::Exterior;
    for area in areas {
        match locate_in_area(p, area) {
            Location::Interior => return Location::Interior,
            Location::Boundary => result = Location::Boundary,
            Location::Exterior => {}
        }
    }
    result
}

/// Parameters along segment `p -> q` where it meets the edge `c -> d`.
fn intersection_params(p: Pt, q: Pt, c: Pt, d: Pt, out: &mut Vec<f64>) {
    let r = Pt { x: q.x - p.x, y: q.y - p.y };
    let s = Pt { x: d.x - c.x, y: d.y - c.y };
    let denom = r.x * s.y - r.y * s.x;
    let qp = Pt { x: c.x - p.x, y: c.y - p.y };
    let len2 = r.x * r.x + r.y * r.y;
    if len2 <= EPSILON * EPSILON {
        return;
    }
    if denom.abs() <= EPSILON {
        // Parallel; only collinear overlaps matter
        if (qp.x * r.y - qp.y * r.x).abs() > EPSILON {
            return;
        }
        for e in [c, d] {
            let t = ((e.x - p.x) * r.x + (e.y - p.y) * r.y) / len2;
            if (0.0..=1.0).contains(&t) {
                out.push(t);
            }
        }
        return;
    }
    let t = (qp.x * s.y - qp.y * s.x) / denom;
    let u = (qp.x * r.y - qp.y * r.x) / denom;
    if (-EPSILON..=1.0 + EPSILON).contains(&t) && (-EPSILON..=1.0 + EPSILON).contains(&u) {
        out.push(t.clamp(0.0, 1.0));
    }
}

/// Checks a segment against the areal container. Returns `None` if some part
/// of it is exterior, otherwise whether any part of it is interior.
fn segment_cover(p: Pt, q: Pt, areas: &[Area]) -> Option<bool> {
    let mut params = vec![0.0, 1.0];
    for area in areas {
        for ring in &area.rings {
            for (c, d) in ring_edges(ring) {
                intersection_params(p, q, c, d, &mut params);
            }
        }
    }
    params.sort_by(|a, b| a.total_cmp(b));
    params.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);

    let at = |t: f64| Pt { x: p.x + (q.x - p.x) * t, y: p.y + (q.y - p.y) * t };
    let mut interior = false;
    for t in &params {
        match locate(at(*t), areas) {
            Location::Exterior => return None,
            Location::Interior => interior = true,
            Location::Boundary => {}
        }
    }
    for w in params.windows(2) {
        match locate(at((w[0] + w[1]) / 2.0), areas) {
            Location::Exterior => return None,
            Location::Interior => interior = true,
            Location::Boundary => {}
        }
    }
    Some(interior)
}

/// Whether any part of segment `p -> q` lies in the interior of `area`.
/// The segment is split where it meets the area's rings, so an edge whose
/// endpoints both sit on the outline is still caught when it cuts across.
fn segment_enters(p: Pt, q: Pt, area: &Area) -> bool {
    let mut params = vec![0.0, 1.0];
    for ring in &area.rings {
        for (c, d) in ring_edges(ring) {
            intersection_params(p, q, c, d, &mut params);
        }
    }
    params.sort_by(|a, b| a.total_cmp(b));
    params.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);

    let at = |t: f64| Pt { x: p.x + (q.x - p.x) * t, y: p.y + (q.y - p.y) * t };
    params.iter().any(|t| locate_in_area(at(*t), area) == Location::Interior)
        || params
            .windows(2)
            .any(|w| locate_in_area(at((w[0] + w[1]) / 2.0), area) == Location::Interior)
}

fn line_cover(line: &[Pt], areas: &[Area]) -> Option<bool> {
    let mut interior = false;
    for w in line.windows(2) {
        interior |= segment_cover(w[0], w[1], areas)?;
    }
    Some(interior)
}

fn area_contains(areas: &[Area], parts: &Parts) -> bool {
    let mut interior = false;

    for p in &parts.points {
        match locate(*p, areas) {
            Location::Exterior => return false,
            Location::Interior => interior = true,
            Location::Boundary => {}
        }
    }

    for line in &parts.lines {
        match line_cover(line, areas) {
            None => return false,
            Some(hit) => interior |= hit,
        }
    }

    for rings in &parts.polygons {
        for ring in rings {
            let mut closed = ring.clone();
            if closed.first() != closed.last() {
                closed.push(closed[0]);
            }
            if line_cover(&closed, areas).is_none() {
                return false;
            }
        }
        // A's boundary must not reach into the polygon's interior, or some
        // exterior of A (a hole, a gap between parts) lies inside it.
        let inner = Area { rings: rings.clone() };
        let intrudes = areas
            .iter()
            .flat_map(|a| a.rings.iter())
            .flat_map(|ring| ring_edges(ring))
            .any(|(c, d)| segment_enters(c, d, &inner));
        if intrudes {
            return false;
        }
        // A non-degenerate polygon whose outline is covered has interior
        // points inside A.
        interior = true;
    }

    interior
}

/// Does `a` contain `b`?
///
/// Empty geometries never contain and are never contained.
pub fn contains(a: &Geometry, b: &Geometry) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let mut parts = Parts::default();
    collect_parts(b, &mut parts);
    // Polygons with an empty shell but non-empty holes contribute nothing
    if parts.points.is_empty() && parts.lines.is_empty() && parts.polygons.is_empty() {
        return false;
    }

    let mut areas = Vec::new();
    collect_areas(a, &mut areas);
    if !areas.is_empty() {
        return area_contains(&areas, &parts);
    }

    // Non-areal containers: only point sets contained in a point set
    match a {
        Geometry::Point { coordinates } => {
            let anchor = Pt::from(coordinates);
            parts.lines.is_empty() && parts.polygons.is_empty() && parts.points.iter().all(|p| *p == anchor)
        }
        Geometry::MultiPoint { coordinates } => {
            let anchors: Vec<Pt> = coordinates.iter().map(Pt::from).collect();
            parts.lines.is_empty()
                && parts.polygons.is_empty()
                && parts.points.iter().all(|p| anchors.contains(p))
        }
        _ => false,
    }
}
