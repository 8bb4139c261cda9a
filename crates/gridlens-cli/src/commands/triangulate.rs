use std::path::{Path, PathBuf};

use anyhow::Result;
use gridlens_core::{GeoPoint, NodeId};
use serde::Serialize;

use super::util::{load_config, open_session, write_json};

#[derive(Debug, Serialize)]
struct TriangleRecord<'a> {
    vertices: [usize; 3],
    nodes: [&'a NodeId; 3],
    corners: [GeoPoint; 3],
}

#[derive(Debug, Serialize)]
struct TriangulationReport<'a> {
    points: usize,
    triangles: Vec<TriangleRecord<'a>>,
    edges: usize,
}

/// Triangulates true station positions (no densification).
pub fn handle(snapshot: &Path, output: Option<&PathBuf>, config: Option<&Path>) -> Result<()> {
    let mut session = open_session(snapshot, load_config(config)?)?;
    let mesh = session.triangulate()?;
    let triangles = mesh
        .mesh
        .triangles()
        .iter()
        .map(|triangle| TriangleRecord {
            vertices: triangle.vertices,
            nodes: triangle.vertices.map(|v| &mesh.ids[v]),
            corners: mesh.mesh.triangle_points(triangle),
        })
        .collect();
    let report = TriangulationReport {
        points: mesh.ids.len(),
        triangles,
        edges: mesh.mesh.edges().len(),
    };
    write_json(&report, output)
}
