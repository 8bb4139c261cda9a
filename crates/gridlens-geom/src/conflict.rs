//! Existing-edge registry and visual offsetting of overlapping previews.
//!
//! A candidate line drawn between two stations that are already connected
//! would sit exactly on top of the baseline line. The resolver shifts such a
//! preview sideways by a fixed ground distance so both remain visible.

use gridlens_core::{Edge, GeoPoint, Meters, NodeId};
use hashbrown::HashSet;
use serde::Serialize;
use tracing::debug;

use crate::distance::LocalScale;

/// Default sideways displacement for [`offset_segment`] callers without a preference.
pub const DEFAULT_OFFSET_METERS: f64 = 120.0;

/// Displacement applied to candidate previews that duplicate an existing line.
pub const PREVIEW_OFFSET_METERS: f64 = 140.0;

/// Unordered node pair, stored smallest id first.
type PairKey = (NodeId, NodeId);

fn pair_key(a: &NodeId, b: &NodeId) -> PairKey {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Set of node pairs joined by at least one baseline edge.
#[derive(Debug, Clone, Default)]
pub struct EdgeRegistry {
    pairs: HashSet<PairKey>,
}

impl EdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every edge of a snapshot, including ones whose endpoints are unknown.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut registry = Self::new();
        for edge in edges {
            registry.insert(&edge.from, &edge.to);
        }
        debug!(pairs = registry.len(), "edge registry built");
        registry
    }

    /// Returns true when the pair was not registered before.
    pub fn insert(&mut self, a: &NodeId, b: &NodeId) -> bool {
        self.pairs.insert(pair_key(a, b))
    }

    pub fn exists(&self, a: &NodeId, b: &NodeId) -> bool {
        self.pairs.contains(&pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}

/// Shift a segment sideways by `meters` using a flat-earth approximation
/// around its mean latitude.
///
/// The shift is to the left of the `p1 -> p2` direction. A zero-length
/// segment has no direction and is shifted north instead.
pub fn offset_segment(p1: GeoPoint, p2: GeoPoint, meters: Meters) -> (GeoPoint, GeoPoint) {
    let scale = LocalScale::between(p1, p2);
    let vx = (p2.lon - p1.lon) * scale.lon_meters_per_degree;
    let vy = (p2.lat - p1.lat) * scale.lat_meters_per_degree;
    let length = vx.hypot(vy);

    let (px, py) = if length > 0.0 && length.is_finite() {
        (-vy / length, vx / length)
    } else {
        (0.0, 1.0)
    };

    // cos(90°) leaves no east-west extent to convert into
    let dlon = if scale.lon_meters_per_degree.abs() > f64::EPSILON {
        px * meters.value() / scale.lon_meters_per_degree
    } else {
        0.0
    };
    let dlat = py * meters.value() / scale.lat_meters_per_degree;

    (
        GeoPoint::new(p1.lat + dlat, p1.lon + dlon),
        GeoPoint::new(p2.lat + dlat, p2.lon + dlon),
    )
}

/// Endpoints of a preview line after conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviewSegment {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub offset_applied: bool,
}

/// Applies [`offset_segment`] to previews that would overlap a baseline edge.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver<'a> {
    registry: &'a EdgeRegistry,
    offset: Meters,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(registry: &'a EdgeRegistry) -> Self {
        Self {
            registry,
            offset: Meters(PREVIEW_OFFSET_METERS),
        }
    }

    pub fn with_offset(mut self, offset: Meters) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(&self) -> Meters {
        self.offset
    }

    /// Offset `p1 -> p2` when both ids are known and already connected.
    pub fn resolve_preview(
        &self,
        a: Option<&NodeId>,
        b: Option<&NodeId>,
        p1: GeoPoint,
        p2: GeoPoint,
    ) -> PreviewSegment {
        let conflict = match (a, b) {
            (Some(a), Some(b)) => self.registry.exists(a, b),
            _ => false,
        };
        if !conflict {
            return PreviewSegment {
                from: p1,
                to: p2,
                offset_applied: false,
            };
        }
        let (from, to) = offset_segment(p1, p2, self.offset);
        debug!(offset = %self.offset, "preview overlaps an existing edge, offsetting");
        PreviewSegment {
            from,
            to,
            offset_applied: true,
        }
    }
}
