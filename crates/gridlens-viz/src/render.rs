//! Turns a snapshot plus derived geometry into an [`OverlayFrame`].

use gridlens_core::{NetworkSnapshot, NodeId};
use gridlens_geom::{triangulate_with, CoordinateTransform, DelaunayOptions, Triangulation, ZoneCollection};
use serde::Serialize;
use tracing::{debug, info};

use crate::primitives::{EdgeLine, Label, NodeMarker, OverlayFrame, TriangleFace};
use crate::style::{classify_edge_color, classify_node_icon};

/// Delaunay mesh over the located stations of a snapshot.
///
/// `ids[i]` is the station behind point `i` of the mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationMesh {
    pub ids: Vec<NodeId>,
    pub mesh: Triangulation,
}

impl StationMesh {
    pub fn build(snapshot: &NetworkSnapshot, options: DelaunayOptions) -> Self {
        let (ids, points): (Vec<NodeId>, Vec<_>) = snapshot
            .nodes()
            .iter()
            .filter_map(|node| node.location.map(|location| (node.id.clone(), location)))
            .unzip();
        let mesh = triangulate_with(&points, options);
        Self { ids, mesh }
    }

    /// Faces with corners in visual coordinates.
    pub fn faces(&self, transform: &CoordinateTransform) -> Vec<TriangleFace> {
        self.mesh
            .triangles()
            .iter()
            .map(|triangle| TriangleFace {
                nodes: triangle.vertices.map(|v| self.ids[v].clone()),
                corners: self
                    .mesh
                    .triangle_points(triangle)
                    .map(|p| transform.apply_point(p)),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mesh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Optional layers for one render pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderLayers<'a> {
    /// Draw baseline stations and lines
    pub grid: bool,
    pub triangles: Option<&'a StationMesh>,
    pub zones: Option<&'a ZoneCollection>,
}

/// Build all drawable primitives for a snapshot.
///
/// Lines whose endpoints do not both resolve to located stations are skipped
/// and counted in [`OverlayFrame::skipped_edges`].
pub fn render(
    snapshot: &NetworkSnapshot,
    transform: &CoordinateTransform,
    layers: RenderLayers<'_>,
) -> OverlayFrame {
    let mut frame = OverlayFrame {
        center: transform.center(),
        densified: transform.is_active(),
        ..OverlayFrame::default()
    };

    if layers.grid {
        for node in snapshot.nodes() {
            let Some(location) = node.location else {
                continue;
            };
            frame.nodes.push(NodeMarker {
                id: node.id.clone(),
                position: transform.apply_point(location),
                true_position: location,
                icon: classify_node_icon(node.voltage_kv),
                label: Label::for_node(node),
            });
        }

        for edge in snapshot.edges() {
            let endpoints = snapshot
                .node(&edge.from)
                .and_then(|from| from.location)
                .zip(snapshot.node(&edge.to).and_then(|to| to.location));
            let Some((a, b)) = endpoints else {
                debug!(from = %edge.from, to = %edge.to, "skipping edge without two located endpoints");
                frame.skipped_edges += 1;
                continue;
            };
            let color = classify_edge_color(edge.loading_percent);
            frame.edges.push(EdgeLine {
                from: edge.from.clone(),
                to: edge.to.clone(),
                path: [transform.apply_point(a), transform.apply_point(b)],
                color,
                stroke: color.hex(),
                loading_percent: edge.loading_percent,
                label: Label::for_edge(edge),
            });
        }
    }

    if let Some(mesh) = layers.triangles {
        frame.triangles = mesh.faces(transform);
    }
    frame.zones = layers.zones.cloned();

    info!(
        nodes = frame.nodes.len(),
        edges = frame.edges.len(),
        triangles = frame.triangles.len(),
        skipped = frame.skipped_edges,
        "overlay rendered"
    );
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlens_core::{Edge, GeoPoint, Kilovolts, LoadingPercent, Node};
    use gridlens_geom::VisualCenter;

    use crate::style::EdgeColor;

    fn snapshot() -> NetworkSnapshot {
        let nodes = vec![
            Node::new(NodeId::new("a"), "A", Some(GeoPoint::new(0.0, 0.0)), Kilovolts(220.0)),
            Node::new(NodeId::new("b"), "B", Some(GeoPoint::new(0.0, 2.0)), Kilovolts(110.0)),
            Node::new(NodeId::new("c"), "C", Some(GeoPoint::new(2.0, 0.0)), Kilovolts(35.0)),
            Node::new(NodeId::new("u"), "U", None, Kilovolts(35.0)),
        ];
        let edges = vec![
            Edge::new(NodeId::new("a"), NodeId::new("b"), LoadingPercent(95.0)),
            Edge::new(NodeId::new("b"), NodeId::new("c"), LoadingPercent(20.0)),
            Edge::new(NodeId::new("a"), NodeId::new("u"), LoadingPercent(50.0)),
            Edge::new(NodeId::new("a"), NodeId::new("ghost"), LoadingPercent(50.0)),
        ];
        NetworkSnapshot::new(nodes, edges).unwrap()
    }

    fn grid_only() -> RenderLayers<'static> {
        RenderLayers {
            grid: true,
            ..RenderLayers::default()
        }
    }

    #[test]
    fn test_skips_unresolvable_edges() {
        let snap = snapshot();
        let frame = render(&snap, &CoordinateTransform::identity(), grid_only());
        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.edges.len(), 2);
        assert_eq!(frame.skipped_edges, 2);
        assert_eq!(frame.edges[0].color, EdgeColor::Red);
        assert_eq!(frame.edges[1].stroke, "#10b981");
    }

    #[test]
    fn test_positions_are_densified() {
        let snap = snapshot();
        let transform = CoordinateTransform::new(true, 0.5)
            .unwrap()
            .with_center(Some(VisualCenter { lat: 0.0, lon: 0.0 }));
        let frame = render(&snap, &transform, grid_only());
        assert!(frame.densified);
        let b = &frame.nodes[1];
        assert_eq!(b.position, GeoPoint::new(0.0, 1.0));
        assert_eq!(b.true_position, GeoPoint::new(0.0, 2.0));
        assert_eq!(frame.edges[0].path[1], GeoPoint::new(0.0, 1.0));
    }

    #[test]
    fn test_grid_layer_off_leaves_triangles() {
        let snap = snapshot();
        let mesh = StationMesh::build(&snap, DelaunayOptions::default());
        assert_eq!(mesh.len(), 1);
        let frame = render(
            &snap,
            &CoordinateTransform::identity(),
            RenderLayers {
                grid: false,
                triangles: Some(&mesh),
                zones: None,
            },
        );
        assert!(frame.nodes.is_empty());
        assert_eq!(frame.triangles.len(), 1);
        let mut ids: Vec<&str> = frame.triangles[0].nodes.iter().map(NodeId::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_snapshot_renders_empty_frame() {
        let frame = render(
            &NetworkSnapshot::default(),
            &CoordinateTransform::default(),
            grid_only(),
        );
        assert!(frame.is_empty());
        assert!(frame.center.is_none());
    }
}
