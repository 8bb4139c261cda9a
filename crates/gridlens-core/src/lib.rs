//! # gridlens-core: Network Snapshot Model
//!
//! Canonical data structures for the gridlens overlay engine: geo-located
//! network nodes (substations and buses), the lines connecting them, and the
//! snapshot that groups both for one display pass.
//!
//! ## Design Philosophy
//!
//! Snapshot producers disagree on shape. Some call the node array
//! `substations`, others `buses`; some identify buses by integer index,
//! others by string. All of that is resolved once in [`ingest`], and every
//! downstream component only ever sees the canonical [`Node`] / [`Edge`]
//! records defined here.
//!
//! A snapshot is immutable once built. Reloading replaces it wholesale.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridlens_core::*;
//!
//! let nodes = vec![
//!     Node::new(NodeId::from_index(1), "East", Some(GeoPoint::new(31.23, 121.48)), Kilovolts(220.0)),
//!     Node::new(NodeId::new("sub_2"), "West", Some(GeoPoint::new(31.20, 121.40)), Kilovolts(110.0)),
//! ];
//! let edges = vec![Edge::new(NodeId::from_index(1), NodeId::new("sub_2"), LoadingPercent(64.0))];
//! let snapshot = NetworkSnapshot::new(nodes, edges).unwrap();
//!
//! assert_eq!(snapshot.located_nodes().count(), 2);
//! assert!(snapshot.node(&NodeId::new("bus_1")).is_some());
//! ```
//!
//! ## Modules
//!
//! - [`ingest`] - JSON snapshot normalization
//! - [`diagnostics`] - Issues recorded during ingestion
//! - [`graph_utils`] - Topology summary (degrees, weak nodes, islands)
//! - [`units`] - Unit-safe quantities

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod ingest;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, LoadStats, Severity};
pub use error::{GridError, GridResult};
pub use graph_utils::{topology_summary, NodeDegree, TopologySummary};
pub use ingest::{load_snapshot_file, parse_snapshot, LoadReport};
pub use units::{
    Degrees, Kilometers, Kilovolts, LoadingPercent, MegavoltAmperes, Meters, Radians,
};

/// Canonical node identifier.
///
/// Integer bus indices are stored as `bus_<n>` so that `3` and `"bus_3"` name
/// the same node. String identifiers are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    #[inline]
    pub fn new(value: impl Into<String>) -> Self {
        NodeId(value.into())
    }

    /// Canonical id for a numeric bus index.
    #[inline]
    pub fn from_index(index: u64) -> Self {
        NodeId(format!("bus_{index}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::new(value)
    }
}

impl From<u64> for NodeId {
    fn from(index: u64) -> Self {
        NodeId::from_index(index)
    }
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn midpoint(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new((self.lat + other.lat) / 2.0, (self.lon + other.lon) / 2.0)
    }

    /// Squared Euclidean distance in raw degree space.
    #[inline]
    pub fn squared_distance(self, other: GeoPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Anything that occupies a planar position for geometric algorithms.
pub trait Positioned {
    fn position(&self) -> GeoPoint;
}

impl Positioned for GeoPoint {
    #[inline]
    fn position(&self) -> GeoPoint {
        *self
    }
}

impl<T: Positioned + ?Sized> Positioned for &T {
    #[inline]
    fn position(&self) -> GeoPoint {
        (**self).position()
    }
}

/// A substation or bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// True geographic position; `None` for stations the producer could not place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub voltage_kv: Kilovolts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_mva: Option<MegavoltAmperes>,
    /// Producer-specific station type (e.g. "transmission")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Remaining producer fields, kept for label payloads
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl Node {
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        location: Option<GeoPoint>,
        voltage_kv: Kilovolts,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            voltage_kv,
            capacity_mva: None,
            kind: None,
            attributes: Map::new(),
        }
    }

    pub fn with_capacity(mut self, capacity_mva: f64) -> Self {
        self.capacity_mva = Some(MegavoltAmperes(capacity_mva));
        self
    }

    #[inline]
    pub fn is_located(&self) -> bool {
        self.location.is_some()
    }

    /// Display name, falling back to the id when the producer gave none.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// A line between two nodes.
///
/// Existence checks treat the pair as unordered; `from`/`to` are kept as given
/// so the host can draw direction-dependent decorations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub from: NodeId,
    pub to: NodeId,
    pub loading_percent: LoadingPercent,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, loading_percent: LoadingPercent) -> Self {
        Self {
            id: None,
            name: None,
            from,
            to,
            loading_percent,
            attributes: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when this edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{} - {}", self.from, self.to),
        }
    }
}

/// One immutable network snapshot: the unit of display.
#[derive(Debug, Clone, Default)]
pub struct NetworkSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
}

impl NetworkSnapshot {
    /// Build a snapshot, rejecting duplicate node ids.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> GridResult<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(GridError::Validation(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }
        Ok(Self {
            nodes,
            edges,
            index,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    /// Nodes with a known location, in input order.
    pub fn located_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_located())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, lat: f64, lon: f64) -> Node {
        Node::new(
            NodeId::new(id),
            id.to_uppercase(),
            Some(GeoPoint::new(lat, lon)),
            Kilovolts(110.0),
        )
    }

    #[test]
    fn test_node_id_normalization() {
        assert_eq!(NodeId::from_index(3), NodeId::new("bus_3"));
        assert_eq!(NodeId::from(3u64), NodeId::from("bus_3"));
        assert_ne!(NodeId::new("3"), NodeId::from_index(3));
    }

    #[test]
    fn test_edge_connects_either_direction() {
        let edge = Edge::new(NodeId::new("a"), NodeId::new("b"), LoadingPercent(10.0));
        assert!(edge.connects(&NodeId::new("a"), &NodeId::new("b")));
        assert!(edge.connects(&NodeId::new("b"), &NodeId::new("a")));
        assert!(!edge.connects(&NodeId::new("a"), &NodeId::new("c")));
    }

    #[test]
    fn test_edge_label_fallback() {
        let edge = Edge::new(NodeId::new("a"), NodeId::new("b"), LoadingPercent(10.0));
        assert_eq!(edge.label(), "a - b");
        assert_eq!(edge.with_name("Tie 1").label(), "Tie 1");
    }

    #[test]
    fn test_snapshot_rejects_duplicate_ids() {
        let err = NetworkSnapshot::new(vec![node("a", 0.0, 0.0), node("a", 1.0, 1.0)], vec![])
            .unwrap_err();
        assert!(matches!(err, GridError::Validation(_)));
    }

    #[test]
    fn test_snapshot_lookup_and_located_filter() {
        let mut unlocated = node("c", 0.0, 0.0);
        unlocated.location = None;
        let snapshot =
            NetworkSnapshot::new(vec![node("a", 0.0, 0.0), unlocated, node("b", 1.0, 1.0)], vec![])
                .unwrap();

        assert_eq!(snapshot.node(&NodeId::new("c")).map(|n| n.label()), Some("C"));
        let located: Vec<_> = snapshot.located_nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(located, vec!["a", "b"]);
    }

    #[test]
    fn test_geo_point_helpers() {
        let p = GeoPoint::new(0.0, 0.0);
        let q = GeoPoint::new(3.0, 4.0);
        assert_eq!(p.squared_distance(q), 25.0);
        assert_eq!(p.midpoint(q), GeoPoint::new(1.5, 2.0));
    }
}
