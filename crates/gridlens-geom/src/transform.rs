//! Visual densification: a presentation-only similarity transform about the
//! snapshot centroid.
//!
//! Sparse regional networks look empty on a map. Pulling every drawn
//! coordinate toward the centroid by a fixed factor makes the overlay read as
//! a network without touching any electrical or topological value.

use gridlens_core::{GeoPoint, GridError, GridResult, Node};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default compression factor; smaller is denser.
pub const DEFAULT_DENSIFY_SCALE: f64 = 0.35;

/// Centroid of all located nodes in the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualCenter {
    pub lat: f64,
    pub lon: f64,
}

impl VisualCenter {
    /// Arithmetic mean of the given true coordinates, `None` for an empty input.
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let (mut lat_sum, mut lon_sum, mut count) = (0.0, 0.0, 0usize);
        for point in points {
            lat_sum += point.lat;
            lon_sum += point.lon;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            lat: lat_sum / count as f64,
            lon: lon_sum / count as f64,
        })
    }

    /// Centroid of the located nodes; unlocated nodes are ignored.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Option<Self> {
        Self::from_points(nodes.into_iter().filter_map(|node| node.location))
    }

    pub fn as_point(self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Coordinate compression toward [`VisualCenter`].
///
/// Identity while disabled or before a center is known. Otherwise
/// `p' = c + (p - c) * scale` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    enabled: bool,
    scale: f64,
    center: Option<VisualCenter>,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: DEFAULT_DENSIFY_SCALE,
            center: None,
        }
    }
}

impl CoordinateTransform {
    /// Build a transform; `scale` must lie in the open interval (0, 1).
    pub fn new(enabled: bool, scale: f64) -> GridResult<Self> {
        if !scale.is_finite() || scale <= 0.0 || scale >= 1.0 {
            return Err(GridError::Config(format!(
                "densify scale must be in (0, 1), got {scale}"
            )));
        }
        Ok(Self {
            enabled,
            scale,
            center: None,
        })
    }

    /// A transform that never moves anything.
    pub fn identity() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_center(mut self, center: Option<VisualCenter>) -> Self {
        self.center = center;
        self
    }

    /// Recompute the center from a freshly loaded node set.
    pub fn recenter<'a>(&mut self, nodes: impl IntoIterator<Item = &'a Node>) {
        self.center = VisualCenter::from_nodes(nodes);
        debug!(center = ?self.center, "visual center recomputed");
    }

    pub fn clear_center(&mut self) {
        self.center = None;
    }

    pub fn center(&self) -> Option<VisualCenter> {
        self.center
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True when [`apply`](Self::apply) actually moves points.
    pub fn is_active(&self) -> bool {
        self.enabled && self.center.is_some()
    }

    pub fn apply(&self, lat: f64, lon: f64) -> (f64, f64) {
        match self.center {
            Some(center) if self.enabled => (
                center.lat + (lat - center.lat) * self.scale,
                center.lon + (lon - center.lon) * self.scale,
            ),
            _ => (lat, lon),
        }
    }

    pub fn apply_point(&self, point: GeoPoint) -> GeoPoint {
        let (lat, lon) = self.apply(point.lat, point.lon);
        GeoPoint::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlens_core::{Kilovolts, NodeId};

    fn located(id: &str, lat: f64, lon: f64) -> Node {
        Node::new(NodeId::new(id), id, Some(GeoPoint::new(lat, lon)), Kilovolts(110.0))
    }

    #[test]
    fn test_center_is_mean_of_located_nodes() {
        let nodes = vec![
            located("a", 30.0, 120.0),
            located("b", 32.0, 122.0),
            Node::new(NodeId::new("c"), "c", None, Kilovolts(35.0)),
        ];
        let center = VisualCenter::from_nodes(&nodes).unwrap();
        assert_eq!(center, VisualCenter { lat: 31.0, lon: 121.0 });
    }

    #[test]
    fn test_center_absent_without_located_nodes() {
        let nodes = vec![Node::new(NodeId::new("c"), "c", None, Kilovolts(35.0))];
        assert!(VisualCenter::from_nodes(&nodes).is_none());
    }

    #[test]
    fn test_identity_without_center() {
        let t = CoordinateTransform::default();
        assert!(!t.is_active());
        assert_eq!(t.apply(31.5, 121.7), (31.5, 121.7));
    }

    #[test]
    fn test_identity_when_disabled() {
        let center = VisualCenter { lat: 0.0, lon: 0.0 };
        let t = CoordinateTransform::new(false, 0.5)
            .unwrap()
            .with_center(Some(center));
        assert_eq!(t.apply(10.0, -10.0), (10.0, -10.0));
    }

    #[test]
    fn test_scales_displacement() {
        let t = CoordinateTransform::new(true, 0.5)
            .unwrap()
            .with_center(Some(VisualCenter { lat: 30.0, lon: 120.0 }));
        assert_eq!(t.apply(32.0, 118.0), (31.0, 119.0));
    }

    #[test]
    fn test_rejects_scale_outside_unit_interval() {
        for scale in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(CoordinateTransform::new(true, scale).is_err(), "{scale}");
        }
    }

    #[test]
    fn test_recenter_replaces_previous_center() {
        let mut t = CoordinateTransform::default();
        t.recenter(&[located("a", 10.0, 10.0)]);
        assert_eq!(t.center(), Some(VisualCenter { lat: 10.0, lon: 10.0 }));
        t.recenter(&[located("b", 20.0, 40.0), located("c", 22.0, 42.0)]);
        assert_eq!(t.center(), Some(VisualCenter { lat: 21.0, lon: 41.0 }));
        t.clear_center();
        assert!(!t.is_active());
    }
}
