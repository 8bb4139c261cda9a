//! Incremental Delaunay triangulation (Bowyer–Watson) over node positions.
//!
//! All points live in a single arena: the caller's points first, followed by
//! three synthetic super-triangle vertices. Triangles and edges hold arena
//! indices only, so two distinct points that share coordinates never compare
//! equal, and dropping the super vertices at the end is a plain index check.
//!
//! Positions are taken as planar `x = lon`, `y = lat` in raw degrees.

use gridlens_core::{GeoPoint, Positioned};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Three arena indices, in the order the cavity re-triangulation produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [usize; 3],
}

impl Triangle {
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Directed edges `(v0,v1)`, `(v1,v2)`, `(v2,v0)`.
    pub fn edges(&self) -> [ArenaEdge; 3] {
        let [a, b, c] = self.vertices;
        [ArenaEdge(a, b), ArenaEdge(b, c), ArenaEdge(c, a)]
    }

    pub fn contains_vertex(&self, index: usize) -> bool {
        self.vertices.contains(&index)
    }

    fn max_vertex(&self) -> usize {
        self.vertices.into_iter().max().unwrap_or(0)
    }
}

/// Edge between two arena indices. Direction is kept for cavity filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaEdge(pub usize, pub usize);

impl ArenaEdge {
    /// Order-free key used for counting shared edges.
    pub fn key(self) -> (usize, usize) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

/// Unordered comparison by index, never by coordinate.
pub fn edges_equal(a: ArenaEdge, b: ArenaEdge) -> bool {
    a.key() == b.key()
}

/// Tuning knobs for [`triangulate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelaunayOptions {
    /// Tolerance band for the circumcircle test; `0.0` is the exact test.
    pub in_circle_epsilon: f64,
    /// Expansion factor for the super-triangle beyond the doubled bounding box.
    ///
    /// `1.0` gives the minimal construction. Larger factors keep hull-adjacent
    /// triangles whose circumcircles would otherwise reach a super vertex.
    pub super_triangle_scale: f64,
}

impl Default for DelaunayOptions {
    fn default() -> Self {
        Self {
            in_circle_epsilon: 0.0,
            super_triangle_scale: 1000.0,
        }
    }
}

impl DelaunayOptions {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.in_circle_epsilon = epsilon;
        self
    }

    pub fn with_super_triangle_scale(mut self, scale: f64) -> Self {
        self.super_triangle_scale = scale;
        self
    }
}

/// True when `p` lies strictly inside the circumcircle of `a, b, c`.
///
/// Works for either winding of `a, b, c`. Collinear triples have no
/// circumcircle and never contain anything.
pub fn is_point_in_circumcircle(
    p: GeoPoint,
    a: GeoPoint,
    b: GeoPoint,
    c: GeoPoint,
    epsilon: f64,
) -> bool {
    let (ax, ay) = (a.lon - p.lon, a.lat - p.lat);
    let (bx, by) = (b.lon - p.lon, b.lat - p.lat);
    let (cx, cy) = (c.lon - p.lon, c.lat - p.lat);

    let det = (ax * ax + ay * ay) * (bx * cy - cx * by) - (bx * bx + by * by) * (ax * cy - cx * ay)
        + (cx * cx + cy * cy) * (ax * by - bx * ay);
    let orient = (a.lon - c.lon) * (b.lat - c.lat) - (a.lat - c.lat) * (b.lon - c.lon);

    if orient > 0.0 {
        det > epsilon
    } else if orient < 0.0 {
        det < -epsilon
    } else {
        false
    }
}

/// Result of a triangulation: the input positions and triangles over them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Triangulation {
    points: Vec<GeoPoint>,
    triangles: Vec<Triangle>,
}

impl Triangulation {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of one triangle.
    pub fn triangle_points(&self, triangle: &Triangle) -> [GeoPoint; 3] {
        triangle.vertices.map(|index| self.points[index])
    }

    /// Unique undirected edges, in first-seen order.
    pub fn edges(&self) -> Vec<ArenaEdge> {
        let mut seen = hashbrown::HashSet::new();
        let mut edges = Vec::new();
        for triangle in &self.triangles {
            for edge in triangle.edges() {
                if seen.insert(edge.key()) {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    /// Sum of unsigned triangle areas in square degrees.
    pub fn total_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|triangle| {
                let [a, b, c] = self.triangle_points(triangle);
                ((b.lon - a.lon) * (c.lat - a.lat) - (c.lon - a.lon) * (b.lat - a.lat)).abs() / 2.0
            })
            .sum()
    }
}

/// Triangulate with default options.
pub fn triangulate<P: Positioned>(points: &[P]) -> Triangulation {
    triangulate_with(points, DelaunayOptions::default())
}

/// Bowyer–Watson insertion in input order.
///
/// Fewer than three points yield an empty triangulation. Points identical to
/// an earlier point lie on every circumcircle through it and are left out of
/// all triangles.
pub fn triangulate_with<P: Positioned>(points: &[P], options: DelaunayOptions) -> Triangulation {
    let input: Vec<GeoPoint> = points.iter().map(Positioned::position).collect();
    let n = input.len();
    if n < 3 {
        return Triangulation {
            points: input,
            triangles: Vec::new(),
        };
    }

    let mut arena = input.clone();
    arena.extend(super_triangle(&input, options.super_triangle_scale));
    let mut triangles = vec![Triangle::new(n, n + 1, n + 2)];

    for index in 0..n {
        let point = arena[index];

        let bad: Vec<bool> = triangles
            .iter()
            .map(|triangle| {
                let [a, b, c] = triangle.vertices.map(|v| arena[v]);
                is_point_in_circumcircle(point, a, b, c, options.in_circle_epsilon)
            })
            .collect();

        let mut edge_counts: HashMap<(usize, usize), usize> = HashMap::new();
        for (triangle, _) in triangles.iter().zip(&bad).filter(|(_, &is_bad)| is_bad) {
            for edge in triangle.edges() {
                *edge_counts.entry(edge.key()).or_default() += 1;
            }
        }
        let boundary: Vec<ArenaEdge> = triangles
            .iter()
            .zip(&bad)
            .filter(|(_, &is_bad)| is_bad)
            .flat_map(|(triangle, _)| triangle.edges())
            .filter(|edge| edge_counts.get(&edge.key()) == Some(&1))
            .collect();

        let mut flags = bad.iter();
        triangles.retain(|_| !flags.next().copied().unwrap_or(false));
        triangles.extend(
            boundary
                .iter()
                .map(|edge| Triangle::new(edge.0, edge.1, index)),
        );
    }

    let before = triangles.len();
    triangles.retain(|triangle| triangle.max_vertex() < n);
    debug!(
        dropped = before - triangles.len(),
        "removed triangles touching the super-triangle"
    );
    info!(
        points = n,
        triangles = triangles.len(),
        "triangulation complete"
    );

    Triangulation {
        points: input,
        triangles,
    }
}

/// Super-triangle enclosing the bounding box with a wide margin.
fn super_triangle(points: &[GeoPoint], expansion: f64) -> [GeoPoint; 3] {
    let mut min = GeoPoint::new(f64::INFINITY, f64::INFINITY);
    let mut max = GeoPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.lat = min.lat.min(p.lat);
        min.lon = min.lon.min(p.lon);
        max.lat = max.lat.max(p.lat);
        max.lon = max.lon.max(p.lon);
    }

    let width = max.lon - min.lon;
    let height = max.lat - min.lat;
    let (width, height) = match (width > 0.0, height > 0.0) {
        (true, true) => (width, height),
        (true, false) => (width, width),
        (false, true) => (height, height),
        (false, false) => (1.0, 1.0),
    };
    let expansion = if expansion.is_finite() && expansion >= 1.0 {
        expansion
    } else {
        1.0
    };

    let dx = 2.0 * width * expansion;
    let dy = 2.0 * height * expansion;
    let mid = min.midpoint(max);

    [
        GeoPoint::new(mid.lat - 2.0 * dy, mid.lon - dx),
        GeoPoint::new(mid.lat - 2.0 * dy, mid.lon + dx),
        GeoPoint::new(mid.lat + 2.0 * dy, mid.lon),
    ]
}
