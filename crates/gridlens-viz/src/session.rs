//! Stateful overlay session.
//!
//! Owns the current snapshot and everything derived from it: the visual
//! center (inside the transform), the edge registry, a cached station mesh,
//! and layer visibility. [`OverlaySession::load`] swaps all of it at once;
//! [`OverlaySession::clear`] drops it.

use std::path::Path;

use gridlens_core::{
    load_snapshot_file, topology_summary, Diagnostics, GeoPoint, Kilovolts, LoadStats,
    NetworkSnapshot, Node, NodeId, TopologySummary,
};
use gridlens_geom::{
    zone_grid, CoordinateTransform, EdgeRegistry, NearestStation, SpatialIndex, ZoneCollection,
};
use tracing::{info, warn};

use crate::candidate::{CandidateGeometry, CandidateRequest, PreviewContext};
use crate::config::{LayersConfig, OverlayConfig};
use crate::error::{Error, Result};
use crate::primitives::OverlayFrame;
use crate::render::{render, RenderLayers, StationMesh};

#[derive(Debug, Clone)]
pub struct OverlaySession {
    config: OverlayConfig,
    transform: CoordinateTransform,
    layers: LayersConfig,
    snapshot: Option<NetworkSnapshot>,
    registry: EdgeRegistry,
    mesh: Option<StationMesh>,
}

impl OverlaySession {
    /// Create an empty session; the configuration is validated first.
    pub fn new(config: OverlayConfig) -> Result<Self> {
        config.validate()?;
        let transform = config.transform()?;
        Ok(Self {
            layers: config.layers,
            config,
            transform,
            snapshot: None,
            registry: EdgeRegistry::new(),
            mesh: None,
        })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Replace the current snapshot and everything derived from it.
    pub fn load(&mut self, snapshot: NetworkSnapshot) {
        self.transform.recenter(snapshot.nodes());
        self.registry = EdgeRegistry::from_edges(snapshot.edges());
        self.mesh = None;
        info!(
            nodes = snapshot.nodes().len(),
            edges = snapshot.edges().len(),
            "snapshot loaded into overlay session"
        );
        self.snapshot = Some(snapshot);
    }

    /// Read a snapshot file and load it; returns the ingestion counters and issues.
    pub fn load_file(&mut self, path: &Path) -> Result<(LoadStats, Diagnostics)> {
        let report = load_snapshot_file(path).map_err(|source| Error::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        if report.diagnostics.has_issues() {
            warn!(
                path = %path.display(),
                "snapshot loaded with issues: {}",
                report.diagnostics.summary()
            );
        }
        self.load(report.snapshot);
        Ok((report.stats, report.diagnostics))
    }

    /// Drop the snapshot; the transform becomes the identity until the next load.
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.registry.clear();
        self.mesh = None;
        self.transform.clear_center();
    }

    pub fn snapshot(&self) -> Option<&NetworkSnapshot> {
        self.snapshot.as_ref()
    }

    fn require_snapshot(&self) -> Result<&NetworkSnapshot> {
        self.snapshot.as_ref().ok_or(Error::NoSnapshotLoaded)
    }

    fn nodes(&self) -> &[Node] {
        self.snapshot.as_ref().map(NetworkSnapshot::nodes).unwrap_or(&[])
    }

    pub fn coordinate_transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// True-to-visual coordinate mapping.
    pub fn transform(&self, lat: f64, lon: f64) -> (f64, f64) {
        self.transform.apply(lat, lon)
    }

    pub fn set_densify(&mut self, enabled: bool) {
        self.transform.set_enabled(enabled);
    }

    pub fn nearest1(&self, lat: f64, lon: f64) -> Option<&Node> {
        SpatialIndex::new(self.nodes()).nearest1(lat, lon)
    }

    pub fn nearest_k(&self, lat: f64, lon: f64, k: usize) -> Vec<&Node> {
        SpatialIndex::new(self.nodes()).nearest_k(lat, lon, k)
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.snapshot.as_ref().and_then(|snapshot| snapshot.node(id))
    }

    pub fn nearest_by_distance(
        &self,
        point: GeoPoint,
        voltage: Option<Kilovolts>,
    ) -> Option<NearestStation<'_>> {
        SpatialIndex::new(self.nodes()).nearest_by_distance(point, voltage)
    }

    pub fn edge_exists(&self, a: &NodeId, b: &NodeId) -> bool {
        self.registry.exists(a, b)
    }

    /// Delaunay mesh over the located stations, computed once per load.
    pub fn triangulate(&mut self) -> Result<&StationMesh> {
        let options = self.config.delaunay_options();
        let snapshot = self.snapshot.as_ref().ok_or(Error::NoSnapshotLoaded)?;
        Ok(self
            .mesh
            .get_or_insert_with(|| StationMesh::build(snapshot, options)))
    }

    pub fn zones(&self, rows: usize, cols: usize) -> Result<ZoneCollection> {
        Ok(zone_grid(self.require_snapshot()?.nodes(), rows, cols))
    }

    pub fn topology(&self) -> Result<TopologySummary> {
        Ok(topology_summary(self.require_snapshot()?))
    }

    /// Render every visible layer.
    pub fn render(&mut self) -> Result<OverlayFrame> {
        if self.layers.triangles {
            self.triangulate()?;
        }
        let snapshot = self.require_snapshot()?;
        let zones = if self.layers.zones {
            Some(zone_grid(
                snapshot.nodes(),
                self.config.zones.rows,
                self.config.zones.cols,
            ))
        } else {
            None
        };
        let layers = RenderLayers {
            grid: self.layers.grid,
            triangles: if self.layers.triangles {
                self.mesh.as_ref()
            } else {
                None
            },
            zones: zones.as_ref(),
        };
        Ok(render(snapshot, &self.transform, layers))
    }

    /// Preview a planning candidate against the current snapshot.
    pub fn preview(&self, candidate: &CandidateRequest) -> Option<CandidateGeometry> {
        let snapshot = self.snapshot.as_ref()?;
        PreviewContext {
            snapshot,
            transform: &self.transform,
            registry: &self.registry,
            offset: self.config.offset(),
        }
        .preview(candidate)
    }

    pub fn layers(&self) -> LayersConfig {
        self.layers
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.layers.grid = !self.layers.grid;
        self.layers.grid
    }

    pub fn toggle_triangles(&mut self) -> bool {
        self.layers.triangles = !self.layers.triangles;
        self.layers.triangles
    }

    pub fn toggle_zones(&mut self) -> bool {
        self.layers.zones = !self.layers.zones;
        self.layers.zones
    }
}

impl Default for OverlaySession {
    fn default() -> Self {
        let config = OverlayConfig::default();
        Self {
            layers: config.layers,
            transform: CoordinateTransform::default(),
            config,
            snapshot: None,
            registry: EdgeRegistry::new(),
            mesh: None,
        }
    }
}
