//! Preview geometry for planning candidates.
//!
//! A candidate comes from an external planner as loosely-typed JSON. Preview
//! snaps it onto the current snapshot and produces one transient shape; it is
//! never added to the snapshot.

use gridlens_core::ingest::normalize_id;
use gridlens_core::{GeoPoint, Meters, NetworkSnapshot, NodeId};
use gridlens_geom::{ConflictResolver, CoordinateTransform, EdgeRegistry, SpatialIndex};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::primitives::Label;
use crate::style::{
    PREVIEW_EXPANSION_COLOR, PREVIEW_EXPANSION_FILL, PREVIEW_LINE_COLOR, PREVIEW_SUBSTATION_COLOR,
    PREVIEW_SUBSTATION_FILL,
};

/// Voltage assumed when a candidate does not name one.
pub const DEFAULT_CANDIDATE_KV: f64 = 110.0;
pub const SUBSTATION_MARKER_RADIUS_PX: u32 = 8;
pub const EXPANSION_RADIUS_METERS: f64 = 400.0;
/// How many stations near the target are considered for a line's far end.
const DESTINATION_CANDIDATES: usize = 3;

/// A position whose coordinates may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateLocation {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl CandidateLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    pub fn point(&self) -> Option<GeoPoint> {
        let point = GeoPoint::new(self.lat?, self.lon?);
        point.is_finite().then_some(point)
    }
}

fn optional_node_id<'de, D>(deserializer: D) -> Result<Option<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(normalize_id))
}

/// Planner suggestion, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CandidateRequest {
    NewLine {
        #[serde(default)]
        from_location: Option<CandidateLocation>,
        #[serde(default)]
        to_location: Option<CandidateLocation>,
        #[serde(default, deserialize_with = "optional_node_id")]
        from_substation_id: Option<NodeId>,
        #[serde(default, deserialize_with = "optional_node_id")]
        to_substation_id: Option<NodeId>,
        #[serde(default)]
        voltage_level: Option<f64>,
        #[serde(default)]
        capacity_mva: Option<f64>,
    },
    NewSubstation {
        #[serde(default)]
        location: Option<CandidateLocation>,
        #[serde(default)]
        voltage_level: Option<f64>,
        #[serde(default)]
        capacity_mva: Option<f64>,
    },
    SubstationExpansion {
        #[serde(default, deserialize_with = "optional_node_id")]
        substation_id: Option<NodeId>,
        #[serde(default)]
        additional_capacity: Option<f64>,
    },
}

/// Transient preview shape, in visual coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateGeometry {
    Line {
        path: [GeoPoint; 2],
        #[serde(skip_serializing_if = "Option::is_none")]
        from_station: Option<NodeId>,
        to_station: NodeId,
        /// Shifted sideways because the pair is already connected
        offset_applied: bool,
        color: &'static str,
        label: Label,
    },
    Marker {
        position: GeoPoint,
        radius_px: u32,
        color: &'static str,
        fill: &'static str,
        label: Label,
    },
    Highlight {
        station: NodeId,
        center: GeoPoint,
        radius_meters: f64,
        color: &'static str,
        fill: &'static str,
        label: Label,
    },
}

/// Everything a preview needs from the current session.
#[derive(Debug, Clone, Copy)]
pub struct PreviewContext<'a> {
    pub snapshot: &'a NetworkSnapshot,
    pub transform: &'a CoordinateTransform,
    pub registry: &'a EdgeRegistry,
    pub offset: Meters,
}

impl<'a> PreviewContext<'a> {
    /// Resolve a candidate to a drawable shape, or `None` when it cannot be
    /// placed on the current snapshot.
    pub fn preview(&self, candidate: &CandidateRequest) -> Option<CandidateGeometry> {
        match candidate {
            CandidateRequest::NewLine {
                from_location,
                to_location,
                from_substation_id,
                to_substation_id,
                voltage_level,
                capacity_mva,
            } => self.preview_line(
                from_location.as_ref()?.point()?,
                to_location.as_ref()?.point()?,
                from_substation_id.as_ref(),
                to_substation_id.as_ref(),
                *voltage_level,
                *capacity_mva,
            ),
            CandidateRequest::NewSubstation {
                location,
                voltage_level,
                capacity_mva,
            } => {
                let point = location.as_ref()?.point()?;
                let label = Label::new("New substation", "")
                    .with_value("capacity_mva", capacity_mva.unwrap_or(0.0))
                    .with_value("voltage_kv", voltage_level.unwrap_or(DEFAULT_CANDIDATE_KV));
                Some(CandidateGeometry::Marker {
                    position: self.transform.apply_point(point),
                    radius_px: SUBSTATION_MARKER_RADIUS_PX,
                    color: PREVIEW_SUBSTATION_COLOR,
                    fill: PREVIEW_SUBSTATION_FILL,
                    label,
                })
            }
            CandidateRequest::SubstationExpansion {
                substation_id,
                additional_capacity,
            } => {
                let station = self.snapshot.node(substation_id.as_ref()?)?;
                let location = station.location?;
                let label = Label::new(
                    format!("Substation expansion: {}", station.label()),
                    station.id.as_str(),
                )
                .with_value("additional_capacity_mva", additional_capacity.unwrap_or(0.0));
                Some(CandidateGeometry::Highlight {
                    station: station.id.clone(),
                    center: self.transform.apply_point(location),
                    radius_meters: EXPANSION_RADIUS_METERS,
                    color: PREVIEW_EXPANSION_COLOR,
                    fill: PREVIEW_EXPANSION_FILL,
                    label,
                })
            }
        }
    }

    fn preview_line(
        &self,
        from_point: GeoPoint,
        to_point: GeoPoint,
        from_id: Option<&NodeId>,
        to_id: Option<&NodeId>,
        voltage_level: Option<f64>,
        capacity_mva: Option<f64>,
    ) -> Option<CandidateGeometry> {
        let index = SpatialIndex::new(self.snapshot.nodes());

        let origin = match from_id {
            Some(id) => index.find_by_id(id),
            None => index.nearest1(from_point.lat, from_point.lon),
        };
        let start = origin.and_then(|node| node.location).unwrap_or(from_point);

        let destination = to_id.and_then(|id| index.find_by_id(id)).or_else(|| {
            let near = index.nearest_k(to_point.lat, to_point.lon, DESTINATION_CANDIDATES);
            near.iter()
                .copied()
                .find(|node| origin.map_or(true, |o| o.id != node.id))
                .or_else(|| near.first().copied())
        });
        let Some(destination) = destination else {
            debug!("no destination station for line preview");
            return None;
        };
        let end = destination.location?;

        let resolver = ConflictResolver::new(self.registry).with_offset(self.offset);
        let segment = resolver.resolve_preview(
            origin.map(|node| &node.id),
            Some(&destination.id),
            self.transform.apply_point(start),
            self.transform.apply_point(end),
        );

        let mut label = Label::new(
            format!("New line to {}", destination.label()),
            destination.id.as_str(),
        )
        .with_value("voltage_kv", voltage_level.unwrap_or(DEFAULT_CANDIDATE_KV));
        if let Some(capacity) = capacity_mva {
            label = label.with_value("capacity_mva", capacity);
        }

        Some(CandidateGeometry::Line {
            path: [segment.from, segment.to],
            from_station: origin.map(|node| node.id.clone()),
            to_station: destination.id.clone(),
            offset_applied: segment.offset_applied,
            color: PREVIEW_LINE_COLOR,
            label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlens_core::{Edge, Kilovolts, LoadingPercent, Node};
    use gridlens_geom::PREVIEW_OFFSET_METERS;
    use serde_json::json;

    fn snapshot() -> NetworkSnapshot {
        let nodes = vec![
            Node::new(NodeId::from_index(1), "North", Some(GeoPoint::new(23.16, 113.26)), Kilovolts(220.0)),
            Node::new(NodeId::from_index(2), "South", Some(GeoPoint::new(23.11, 113.27)), Kilovolts(110.0)),
            Node::new(NodeId::from_index(3), "East", Some(GeoPoint::new(23.13, 113.30)), Kilovolts(110.0)),
            Node::new(NodeId::from_index(4), "Unplaced", None, Kilovolts(110.0)),
        ];
        let edges = vec![Edge::new(NodeId::from_index(1), NodeId::from_index(2), LoadingPercent(60.0))];
        NetworkSnapshot::new(nodes, edges).unwrap()
    }

    fn context<'a>(
        snapshot: &'a NetworkSnapshot,
        transform: &'a CoordinateTransform,
        registry: &'a EdgeRegistry,
    ) -> PreviewContext<'a> {
        PreviewContext {
            snapshot,
            transform,
            registry,
            offset: Meters(PREVIEW_OFFSET_METERS),
        }
    }

    fn request(value: serde_json::Value) -> CandidateRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parses_numeric_station_ids() {
        let candidate = request(json!({
            "type": "substation_expansion",
            "substation_id": 3,
            "additional_capacity": 120
        }));
        assert_eq!(
            candidate,
            CandidateRequest::SubstationExpansion {
                substation_id: Some(NodeId::new("bus_3")),
                additional_capacity: Some(120.0),
            }
        );
    }

    #[test]
    fn test_line_snaps_to_stations_and_offsets_duplicate() {
        let snap = snapshot();
        let transform = CoordinateTransform::identity();
        let registry = EdgeRegistry::from_edges(snap.edges());
        let ctx = context(&snap, &transform, &registry);

        let geometry = ctx
            .preview(&request(json!({
                "type": "new_line",
                "from_location": {"lat": 23.161, "lon": 113.259},
                "to_location": {"lat": 23.112, "lon": 113.271}
            })))
            .unwrap();

        let CandidateGeometry::Line { path, from_station, to_station, offset_applied, .. } = geometry else {
            panic!("expected a line");
        };
        assert_eq!(from_station, Some(NodeId::new("bus_1")));
        assert_eq!(to_station, NodeId::new("bus_2"));
        assert!(offset_applied);
        assert_ne!(path[0], GeoPoint::new(23.16, 113.26));
    }

    #[test]
    fn test_line_between_unconnected_stations_is_not_offset() {
        let snap = snapshot();
        let transform = CoordinateTransform::identity();
        let registry = EdgeRegistry::from_edges(snap.edges());
        let ctx = context(&snap, &transform, &registry);

        let geometry = ctx
            .preview(&request(json!({
                "type": "new_line",
                "from_location": {"lat": 23.16, "lon": 113.26},
                "to_location": {"lat": 23.13, "lon": 113.30}
            })))
            .unwrap();
        let CandidateGeometry::Line { path, offset_applied, .. } = geometry else {
            panic!("expected a line");
        };
        assert!(!offset_applied);
        assert_eq!(path, [GeoPoint::new(23.16, 113.26), GeoPoint::new(23.13, 113.30)]);
    }

    #[test]
    fn test_destination_differs_from_origin() {
        let snap = snapshot();
        let transform = CoordinateTransform::identity();
        let registry = EdgeRegistry::new();
        let ctx = context(&snap, &transform, &registry);

        // both ends nearest to North; the far end falls to the next closest
        let geometry = ctx
            .preview(&request(json!({
                "type": "new_line",
                "from_location": {"lat": 23.16, "lon": 113.26},
                "to_location": {"lat": 23.159, "lon": 113.261}
            })))
            .unwrap();
        let CandidateGeometry::Line { to_station, .. } = geometry else {
            panic!("expected a line");
        };
        assert_ne!(to_station, NodeId::new("bus_1"));
    }

    #[test]
    fn test_explicit_ids_win_over_locations() {
        let snap = snapshot();
        let transform = CoordinateTransform::identity();
        let registry = EdgeRegistry::new();
        let ctx = context(&snap, &transform, &registry);

        let geometry = ctx
            .preview(&request(json!({
                "type": "new_line",
                "from_location": {"lat": 0.0, "lon": 0.0},
                "to_location": {"lat": 0.0, "lon": 0.0},
                "from_substation_id": "bus_2",
                "to_substation_id": 3
            })))
            .unwrap();
        let CandidateGeometry::Line { path, from_station, to_station, .. } = geometry else {
            panic!("expected a line");
        };
        assert_eq!(from_station, Some(NodeId::new("bus_2")));
        assert_eq!(to_station, NodeId::new("bus_3"));
        assert_eq!(path[0], GeoPoint::new(23.11, 113.27));
    }

    #[test]
    fn test_line_without_stations_or_locations_is_none() {
        let empty = NetworkSnapshot::default();
        let transform = CoordinateTransform::identity();
        let registry = EdgeRegistry::new();
        let ctx = context(&empty, &transform, &registry);
        let line = request(json!({
            "type": "new_line",
            "from_location": {"lat": 23.1, "lon": 113.2},
            "to_location": {"lat": 23.2, "lon": 113.3}
        }));
        assert!(ctx.preview(&line).is_none());

        let snap = snapshot();
        let ctx = context(&snap, &transform, &registry);
        let missing_to = request(json!({
            "type": "new_line",
            "from_location": {"lat": 23.1, "lon": 113.2}
        }));
        assert!(ctx.preview(&missing_to).is_none());

        // named destination without a location
        let unplaced = request(json!({
            "type": "new_line",
            "from_location": {"lat": 23.1, "lon": 113.2},
            "to_location": {"lat": 23.2, "lon": 113.3},
            "to_substation_id": 4
        }));
        assert!(ctx.preview(&unplaced).is_none());
    }

    #[test]
    fn test_substation_marker_is_densified() {
        let snap = snapshot();
        let transform = CoordinateTransform::new(true, 0.5)
            .unwrap()
            .with_center(Some(gridlens_geom::VisualCenter { lat: 23.0, lon: 113.0 }));
        let registry = EdgeRegistry::new();
        let ctx = context(&snap, &transform, &registry);

        let geometry = ctx
            .preview(&request(json!({
                "type": "new_substation",
                "location": {"lat": 24.0, "lon": 114.0},
                "capacity_mva": 240
            })))
            .unwrap();
        let CandidateGeometry::Marker { position, radius_px, label, .. } = geometry else {
            panic!("expected a marker");
        };
        assert_eq!(position, GeoPoint::new(23.5, 113.5));
        assert_eq!(radius_px, 8);
        assert_eq!(label.values["voltage_kv"], json!(110.0));
    }

    #[test]
    fn test_expansion_needs_located_station() {
        let snap = snapshot();
        let transform = CoordinateTransform::identity();
        let registry = EdgeRegistry::new();
        let ctx = context(&snap, &transform, &registry);

        let hit = ctx.preview(&request(json!({"type": "substation_expansion", "substation_id": "bus_3"})));
        assert!(matches!(
            hit,
            Some(CandidateGeometry::Highlight { radius_meters, .. }) if radius_meters == 400.0
        ));
        let unplaced = ctx.preview(&request(json!({"type": "substation_expansion", "substation_id": 4})));
        assert!(unplaced.is_none());
        let unknown = ctx.preview(&request(json!({"type": "substation_expansion", "substation_id": "x"})));
        assert!(unknown.is_none());
    }
}
