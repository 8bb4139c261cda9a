//! Property checks for the overlay geometry on seeded random inputs.

use gridlens_core::{Edge, GeoPoint, Kilovolts, LoadingPercent, Meters, Node, NodeId};
use gridlens_geom::{
    is_point_in_circumcircle, offset_segment, triangulate, ConflictResolver, CoordinateTransform,
    EdgeRegistry, SpatialIndex, Triangulation, VisualCenter,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(rng: &mut StdRng, count: usize, origin: GeoPoint, span: f64) -> Vec<GeoPoint> {
    (0..count)
        .map(|_| {
            GeoPoint::new(
                origin.lat + rng.gen::<f64>() * span,
                origin.lon + rng.gen::<f64>() * span,
            )
        })
        .collect()
}

fn random_nodes(rng: &mut StdRng, count: usize) -> Vec<Node> {
    random_points(rng, count, GeoPoint::new(31.0, 121.2), 0.5)
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            Node::new(
                NodeId::from_index(i as u64),
                format!("S{i}"),
                Some(p),
                Kilovolts(110.0),
            )
        })
        .collect()
}

/// Convex hull area via the monotone chain, in square degrees.
fn hull_area(points: &[GeoPoint]) -> f64 {
    let mut pts: Vec<(f64, f64)> = points.iter().map(|p| (p.lon, p.lat)).collect();
    pts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    pts.dedup();
    let cross = |o: (f64, f64), a: (f64, f64), b: (f64, f64)| {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };

    let mut lower: Vec<(f64, f64)> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<(f64, f64)> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    let hull: Vec<(f64, f64)> = lower.into_iter().chain(upper).collect();

    let mut twice = 0.0;
    for i in 0..hull.len() {
        let (a, b) = (hull[i], hull[(i + 1) % hull.len()]);
        twice += a.0 * b.1 - b.0 * a.1;
    }
    twice.abs() / 2.0
}

fn assert_empty_circumcircles(mesh: &Triangulation) {
    let points = mesh.points();
    for triangle in mesh.triangles() {
        let [a, b, c] = mesh.triangle_points(triangle);
        for (index, &p) in points.iter().enumerate() {
            if triangle.contains_vertex(index) {
                continue;
            }
            assert!(
                !is_point_in_circumcircle(p, a, b, c, 1e-12),
                "point {index} inside circumcircle of {:?}",
                triangle.vertices
            );
        }
    }
}

#[test]
fn transform_fixes_center_and_preserves_midpoints() {
    let mut rng = StdRng::seed_from_u64(1);
    let nodes = random_nodes(&mut rng, 25);
    let mut transform = CoordinateTransform::default();
    transform.recenter(&nodes);
    let center = transform.center().unwrap();

    assert_eq!(transform.apply(center.lat, center.lon), (center.lat, center.lon));

    for _ in 0..100 {
        let a = random_points(&mut rng, 1, GeoPoint::new(30.0, 120.0), 3.0)[0];
        let b = random_points(&mut rng, 1, GeoPoint::new(30.0, 120.0), 3.0)[0];
        let lhs = transform.apply_point(a.midpoint(b));
        let rhs = transform.apply_point(a).midpoint(transform.apply_point(b));
        assert!((lhs.lat - rhs.lat).abs() < 1e-9);
        assert!((lhs.lon - rhs.lon).abs() < 1e-9);
    }
}

#[test]
fn transform_contracts_toward_center() {
    let center = VisualCenter { lat: 31.2, lon: 121.4 };
    let transform = CoordinateTransform::default().with_center(Some(center));
    let far = GeoPoint::new(32.0, 122.0);
    let moved = transform.apply_point(far);
    assert!(moved.squared_distance(center.as_point()) < far.squared_distance(center.as_point()));
}

#[test]
fn nearest_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let nodes = random_nodes(&mut rng, 40);
        let index = SpatialIndex::new(&nodes);
        let query = random_points(&mut rng, 1, GeoPoint::new(30.9, 121.1), 0.7)[0];

        let mut ranked: Vec<(usize, f64)> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (i, node.location.unwrap().squared_distance(query)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let best = index.nearest1(query.lat, query.lon).unwrap();
        assert_eq!(best.id, nodes[ranked[0].0].id);

        for k in [1, 3, 7, 40, 100] {
            let got: Vec<&NodeId> = index
                .nearest_k(query.lat, query.lon, k)
                .iter()
                .map(|node| &node.id)
                .collect();
            let want: Vec<&NodeId> = ranked.iter().take(k).map(|(i, _)| &nodes[*i].id).collect();
            assert_eq!(got, want, "k = {k}");
        }
    }
}

#[test]
fn edge_existence_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(9);
    let ids: Vec<NodeId> = (0..12).map(NodeId::from_index).collect();
    let edges: Vec<Edge> = (0..20)
        .map(|_| {
            let a = ids[rng.gen_range(0..ids.len())].clone();
            let b = ids[rng.gen_range(0..ids.len())].clone();
            Edge::new(a, b, LoadingPercent(rng.gen_range(0.0..120.0)))
        })
        .collect();
    let registry = EdgeRegistry::from_edges(&edges);

    for a in &ids {
        for b in &ids {
            assert_eq!(registry.exists(a, b), registry.exists(b, a));
        }
    }
    for edge in &edges {
        assert!(registry.exists(&edge.to, &edge.from));
    }
}

#[test]
fn delaunay_random_sets_are_valid() {
    let mut rng = StdRng::seed_from_u64(2024);
    for round in 0..25 {
        let points = random_points(&mut rng, 40, GeoPoint::new(0.0, 0.0), 1.0);
        let mesh = triangulate(&points);

        assert_empty_circumcircles(&mesh);

        let mut used = vec![false; points.len()];
        for triangle in mesh.triangles() {
            for &v in &triangle.vertices {
                used[v] = true;
            }
        }
        assert!(used.iter().all(|&u| u), "round {round}: unused input point");

        let expected = hull_area(&points);
        assert!(
            (mesh.total_area() - expected).abs() < 1e-9,
            "round {round}: area {} vs hull {}",
            mesh.total_area(),
            expected
        );
    }
}

#[test]
fn delaunay_geographic_cluster_covers_hull() {
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..10 {
        let nodes = random_nodes(&mut rng, 30);
        let mesh = triangulate(&nodes.iter().map(|n| n.location.unwrap()).collect::<Vec<_>>());
        assert_empty_circumcircles(&mesh);
        assert!((mesh.total_area() - hull_area(mesh.points())).abs() < 1e-9);
    }
}

#[test]
fn unit_square_yields_two_triangles() {
    let square = [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 1.0),
        GeoPoint::new(1.0, 0.0),
        GeoPoint::new(1.0, 1.0),
    ];
    let mesh = triangulate(&square);
    assert_eq!(mesh.len(), 2);
    assert!((mesh.total_area() - 1.0).abs() < 1e-12);
}

#[test]
fn degenerate_offset_is_finite_and_moves() {
    let origin = GeoPoint::new(0.0, 0.0);
    let (a, b) = offset_segment(origin, origin, Meters(100.0));
    assert!(a.is_finite() && b.is_finite());
    assert_ne!(a, origin);
    assert_ne!(b, origin);
}

#[test]
fn offset_distance_matches_request() {
    let p1 = GeoPoint::new(23.12, 113.25);
    let p2 = GeoPoint::new(23.16, 113.30);
    let (q1, _) = offset_segment(p1, p2, Meters(140.0));
    let scale = gridlens_geom::LocalScale::between(p1, p2);
    let dx = (q1.lon - p1.lon) * scale.lon_meters_per_degree;
    let dy = (q1.lat - p1.lat) * scale.lat_meters_per_degree;
    assert!((dx.hypot(dy) - 140.0).abs() < 1e-6);
}

#[test]
fn conflict_only_for_existing_pairs() {
    let a = NodeId::new("A");
    let b = NodeId::new("B");
    let c = NodeId::new("C");
    let registry = EdgeRegistry::from_edges(&[Edge::new(a.clone(), b.clone(), LoadingPercent(30.0))]);
    let resolver = ConflictResolver::new(&registry);
    let p1 = GeoPoint::new(31.20, 121.40);
    let p2 = GeoPoint::new(31.25, 121.48);

    assert!(resolver.resolve_preview(Some(&a), Some(&b), p1, p2).offset_applied);
    assert!(!resolver.resolve_preview(Some(&a), Some(&c), p1, p2).offset_applied);
}
