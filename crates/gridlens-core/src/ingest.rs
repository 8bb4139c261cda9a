//! Snapshot ingestion: one normalization step from producer JSON to canonical records.
//!
//! Accepted document shape:
//!
//! ```json
//! {
//!   "buses": [ { "id": 1, "name": "Bus 1", "location": {"lat": 31.2, "lon": 121.4}, "voltage_kv": 138 } ],
//!   "lines": [ { "from_bus": 1, "to_bus": "sub_2", "loading_percent": 72.5 } ]
//! }
//! ```
//!
//! - the node array may be called `buses`, `substations` or `nodes` (checked in that order);
//! - the edge array may be called `lines` or `edges`;
//! - ids may be integers (normalized to `bus_<n>`) or strings (kept verbatim);
//! - positions may be nested under `location` or given as flat `lat`/`lon`;
//! - numeric fields may also arrive as numeric strings (`"23.12"`);
//! - voltage may be `voltage_kv` or `voltage_level`;
//! - edge endpoints may be `from_bus`/`to_bus`, `from_id`/`to_id` or `from`/`to`.
//!
//! Unknown fields are preserved in `attributes`. A station whose position is
//! partial or not numeric is kept unlocated and reported in the diagnostics.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::diagnostics::{Diagnostics, LoadStats};
use crate::error::{GridError, GridResult};
use crate::units::{Kilovolts, LoadingPercent, MegavoltAmperes};
use crate::{Edge, GeoPoint, NetworkSnapshot, Node, NodeId};

/// Result of loading one snapshot document.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub snapshot: NetworkSnapshot,
    pub stats: LoadStats,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    buses: Option<Vec<RawNode>>,
    #[serde(default)]
    substations: Option<Vec<RawNode>>,
    #[serde(default)]
    nodes: Option<Vec<RawNode>>,
    #[serde(default)]
    lines: Option<Vec<RawEdge>>,
    #[serde(default)]
    edges: Option<Vec<RawEdge>>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    name_zh: Option<String>,
    #[serde(default)]
    location: Option<Value>,
    #[serde(default)]
    lat: Option<Value>,
    #[serde(default)]
    lon: Option<Value>,
    #[serde(default)]
    voltage_kv: Option<Value>,
    #[serde(default)]
    voltage_level: Option<Value>,
    #[serde(default)]
    capacity_mva: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "from_id", alias = "from")]
    from_bus: Option<Value>,
    #[serde(default, alias = "to_id", alias = "to")]
    to_bus: Option<Value>,
    #[serde(default)]
    loading_percent: Option<Value>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

/// Normalize a producer identifier.
///
/// Non-negative integers (including integral floats such as `3.0`) become
/// `bus_<n>`; strings are kept verbatim. Anything else has no canonical form.
pub fn normalize_id(value: &Value) -> Option<NodeId> {
    match value {
        Value::String(s) if !s.is_empty() => Some(NodeId::new(s.as_str())),
        Value::Number(n) => {
            if let Some(index) = n.as_u64() {
                return Some(NodeId::from_index(index));
            }
            let f = n.as_f64()?;
            if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
                Some(NodeId::from_index(f as u64))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a JSON number or a numeric string.
fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn optional_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(number_like).filter(|v| v.is_finite())
}

/// Where a raw node ended up on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    Located(GeoPoint),
    /// No position given at all
    Missing,
    /// A position was given but is partial, non-numeric or non-finite
    Malformed,
}

impl Placement {
    fn point(self) -> Option<GeoPoint> {
        match self {
            Placement::Located(point) => Some(point),
            Placement::Missing | Placement::Malformed => None,
        }
    }
}

fn placement(lat: Option<&Value>, lon: Option<&Value>) -> Placement {
    let lat = lat.filter(|v| !v.is_null());
    let lon = lon.filter(|v| !v.is_null());
    if lat.is_none() && lon.is_none() {
        return Placement::Missing;
    }
    match (optional_number(lat), optional_number(lon)) {
        (Some(lat), Some(lon)) => Placement::Located(GeoPoint::new(lat, lon)),
        _ => Placement::Malformed,
    }
}

impl RawNode {
    fn place(&self) -> Placement {
        match &self.location {
            None | Some(Value::Null) => placement(self.lat.as_ref(), self.lon.as_ref()),
            Some(Value::Object(fields)) => match placement(fields.get("lat"), fields.get("lon")) {
                Placement::Missing => Placement::Malformed,
                other => other,
            },
            Some(_) => Placement::Malformed,
        }
    }

    fn into_node(self) -> GridResult<(Node, Placement)> {
        let id = normalize_id(&self.id).ok_or_else(|| {
            GridError::Validation(format!("node id {} is not an integer or string", self.id))
        })?;

        let position = self.place();

        // A zero voltage_kv falls through to voltage_level.
        let voltage = optional_number(self.voltage_kv.as_ref())
            .filter(|kv| *kv != 0.0)
            .or_else(|| optional_number(self.voltage_level.as_ref()))
            .unwrap_or(0.0);

        let node = Node {
            id,
            name: self.name.or(self.name_zh).unwrap_or_default(),
            location: position.point(),
            voltage_kv: Kilovolts(voltage),
            capacity_mva: optional_number(self.capacity_mva.as_ref()).map(MegavoltAmperes),
            kind: self.kind,
            attributes: self.attributes,
        };
        Ok((node, position))
    }
}

/// Parse a snapshot document from a JSON string.
pub fn parse_snapshot(json: &str) -> GridResult<LoadReport> {
    let raw: RawSnapshot = serde_json::from_str(json)?;
    normalize(raw)
}

/// Parse a snapshot from an already-decoded JSON value.
pub fn snapshot_from_value(value: Value) -> GridResult<LoadReport> {
    let raw: RawSnapshot = serde_json::from_value(value)?;
    normalize(raw)
}

/// Read and parse a snapshot file.
pub fn load_snapshot_file(path: impl AsRef<Path>) -> GridResult<LoadReport> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let report = parse_snapshot(&contents)?;
    info!(
        path = %path.display(),
        nodes = report.stats.nodes,
        edges = report.stats.edges,
        "loaded network snapshot ({})",
        report.diagnostics.summary()
    );
    Ok(report)
}

fn normalize(raw: RawSnapshot) -> GridResult<LoadReport> {
    let raw_nodes = raw
        .buses
        .or(raw.substations)
        .or(raw.nodes)
        .ok_or_else(|| {
            GridError::Parse("snapshot has no 'buses', 'substations' or 'nodes' array".into())
        })?;
    let raw_edges = raw.lines.or(raw.edges).unwrap_or_default();

    let mut diagnostics = Diagnostics::new();
    let mut stats = LoadStats::default();

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for raw_node in raw_nodes {
        let (node, placement) = raw_node.into_node()?;
        match placement {
            Placement::Located(_) => stats.located_nodes += 1,
            Placement::Missing => {
                debug!(node = %node.id, "node has no location");
                diagnostics.add_warning_with_entity(
                    "location",
                    "node has no location and will not be drawn",
                    node.id.as_str(),
                );
            }
            Placement::Malformed => {
                debug!(node = %node.id, "node location is not usable");
                diagnostics.add_warning_with_entity(
                    "location",
                    "node location is incomplete or not numeric and will not be drawn",
                    node.id.as_str(),
                );
            }
        }
        nodes.push(node);
    }

    let mut edges = Vec::with_capacity(raw_edges.len());
    for raw_edge in raw_edges {
        let entity = raw_edge
            .id
            .as_ref()
            .and_then(id_to_string)
            .or_else(|| raw_edge.name.clone())
            .unwrap_or_else(|| "<unnamed line>".to_string());

        let (Some(from), Some(to)) = (
            raw_edge.from_bus.as_ref().and_then(normalize_id),
            raw_edge.to_bus.as_ref().and_then(normalize_id),
        ) else {
            diagnostics.add_error_with_entity(
                "reference",
                "line endpoint missing or not an id; line skipped",
                &entity,
            );
            continue;
        };

        let loading = match raw_edge.loading_percent.as_ref().filter(|v| !v.is_null()) {
            None => 0.0,
            Some(raw) => match number_like(raw) {
                Some(value) if value.is_finite() && value >= 0.0 => value,
                _ => {
                    stats.clamped_loadings += 1;
                    diagnostics.add_warning_with_entity(
                        "loading",
                        &format!("loading {raw} is outside [0, inf) and was clamped to 0"),
                        &entity,
                    );
                    0.0
                }
            },
        };

        if from == to {
            diagnostics.add_warning_with_entity("reference", "line is a self-loop", &entity);
        }

        edges.push(Edge {
            id: raw_edge.id.as_ref().and_then(id_to_string),
            name: raw_edge.name,
            from,
            to,
            loading_percent: LoadingPercent(loading),
            attributes: raw_edge.attributes,
        });
    }

    let snapshot = NetworkSnapshot::new(nodes, edges)?;

    for edge in snapshot.edges() {
        if snapshot.node(&edge.from).is_none() || snapshot.node(&edge.to).is_none() {
            stats.dangling_edges += 1;
            diagnostics.add_warning_with_entity(
                "reference",
                "line references a node that is not in the snapshot",
                &edge.label(),
            );
        }
    }

    stats.nodes = snapshot.nodes().len();
    stats.edges = snapshot.edges().len();

    if diagnostics.has_issues() {
        warn!("snapshot normalized with {}", diagnostics.summary());
    }

    Ok(LoadReport {
        snapshot,
        stats,
        diagnostics,
    })
}
