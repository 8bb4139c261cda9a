//! Drawable primitives handed to the host map.
//!
//! All positions are in visual (possibly densified) coordinates unless a
//! field says otherwise. Hosts draw these as-is.

use gridlens_core::{Edge, GeoPoint, LoadingPercent, Node, NodeId};
use gridlens_geom::{VisualCenter, ZoneCollection};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::style::{EdgeColor, NodeIcon};

/// Popup / tooltip content attached to a primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub title: String,
    pub id: String,
    /// Numeric fields only, keyed by name
    pub values: Map<String, Value>,
}

impl Label {
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            values: Map::new(),
        }
    }

    /// Adds a field, skipping values JSON cannot represent.
    pub fn with_value(mut self, key: &str, value: f64) -> Self {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.values.insert(key.to_string(), Value::Number(number));
        }
        self
    }

    /// Copies the numeric entries of a producer attribute map.
    fn with_numeric_attributes(mut self, attributes: &Map<String, Value>) -> Self {
        for (key, value) in attributes {
            if value.is_number() && !self.values.contains_key(key) {
                self.values.insert(key.clone(), value.clone());
            }
        }
        self
    }

    pub fn for_node(node: &Node) -> Self {
        let mut label = Self::new(node.label(), node.id.as_str())
            .with_value("voltage_kv", node.voltage_kv.value());
        if let Some(capacity) = node.capacity_mva {
            label = label.with_value("capacity_mva", capacity.value());
        }
        label.with_numeric_attributes(&node.attributes)
    }

    pub fn for_edge(edge: &Edge) -> Self {
        let id = edge
            .id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", edge.from, edge.to));
        Self::new(edge.label(), id)
            .with_value("loading_percent", edge.loading_percent.value())
            .with_numeric_attributes(&edge.attributes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMarker {
    pub id: NodeId,
    pub position: GeoPoint,
    /// Undensified location, for hosts that show coordinates
    pub true_position: GeoPoint,
    pub icon: NodeIcon,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLine {
    pub from: NodeId,
    pub to: NodeId,
    pub path: [GeoPoint; 2],
    pub color: EdgeColor,
    pub stroke: &'static str,
    pub loading_percent: LoadingPercent,
    pub label: Label,
}

/// One Delaunay face over three stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriangleFace {
    pub nodes: [NodeId; 3],
    pub corners: [GeoPoint; 3],
}

/// Everything the host needs for one overlay pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub center: Option<VisualCenter>,
    pub densified: bool,
    pub nodes: Vec<NodeMarker>,
    pub edges: Vec<EdgeLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub triangles: Vec<TriangleFace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<ZoneCollection>,
    /// Edges left out because an endpoint was unknown or unlocated
    pub skipped_edges: usize,
}

impl OverlayFrame {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.triangles.is_empty()
    }
}
