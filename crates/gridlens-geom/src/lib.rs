//! # gridlens-geom: Geometry for Grid Overlays
//!
//! Pure geometric building blocks used to turn a [`NetworkSnapshot`] into a
//! readable map overlay. Nothing here owns state beyond its own value; the
//! stateful session lives in `gridlens-viz`.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`transform`] | Visual densification about the snapshot centroid |
//! | [`spatial`] | Nearest-station snapping and id lookup |
//! | [`distance`] | Haversine and local flat-earth scales |
//! | [`conflict`] | Existing-edge registry and sideways preview offsets |
//! | [`delaunay`] | Bowyer–Watson triangulation over node positions |
//! | [`zones`] | Rectangular planning-zone grid as GeoJSON |
//!
//! ## Example
//!
//! ```rust
//! use gridlens_core::GeoPoint;
//! use gridlens_geom::triangulate;
//!
//! let points = [
//!     GeoPoint::new(0.0, 0.0),
//!     GeoPoint::new(0.0, 1.0),
//!     GeoPoint::new(1.0, 0.0),
//!     GeoPoint::new(1.0, 1.0),
//! ];
//! let mesh = triangulate(&points);
//! assert_eq!(mesh.len(), 2);
//! ```
//!
//! [`NetworkSnapshot`]: gridlens_core::NetworkSnapshot

pub mod conflict;
pub mod delaunay;
pub mod distance;
pub mod spatial;
pub mod transform;
pub mod zones;

pub use conflict::{
    offset_segment, ConflictResolver, EdgeRegistry, PreviewSegment, DEFAULT_OFFSET_METERS,
    PREVIEW_OFFSET_METERS,
};
pub use delaunay::{
    edges_equal, is_point_in_circumcircle, triangulate, triangulate_with, ArenaEdge,
    DelaunayOptions, Triangle, Triangulation,
};
pub use distance::{haversine_km, LocalScale, EARTH_RADIUS_KM, METERS_PER_DEGREE};
pub use spatial::{NearestStation, SpatialIndex};
pub use transform::{CoordinateTransform, VisualCenter, DEFAULT_DENSIFY_SCALE};
pub use zones::{zone_grid, ZoneCollection, ZoneFeature, DEFAULT_ZONE_COLS, DEFAULT_ZONE_ROWS};
