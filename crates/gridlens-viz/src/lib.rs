//! # gridlens-viz: Overlay Rendering
//!
//! The drawable side of gridlens. Given a [`NetworkSnapshot`] this crate
//! produces JSON-serializable primitives (station markers, colored lines,
//! Delaunay faces, zone polygons, candidate previews) in visual coordinates.
//! Actual drawing belongs to the host map.
//!
//! Most callers go through [`OverlaySession`], which owns the snapshot and
//! its derived state:
//!
//! ```rust
//! use gridlens_core::parse_snapshot;
//! use gridlens_viz::OverlaySession;
//!
//! let report = parse_snapshot(r#"{
//!     "substations": [
//!         {"id": "a", "location": {"lat": 31.20, "lon": 121.40}, "voltage_kv": 220},
//!         {"id": "b", "location": {"lat": 31.25, "lon": 121.48}, "voltage_kv": 110}
//!     ],
//!     "lines": [{"from_bus": "a", "to_bus": "b", "loading_percent": 93.0}]
//! }"#).unwrap();
//!
//! let mut session = OverlaySession::default();
//! session.load(report.snapshot);
//! let frame = session.render().unwrap();
//! assert_eq!(frame.edges[0].stroke, "#ef4444");
//! ```
//!
//! [`NetworkSnapshot`]: gridlens_core::NetworkSnapshot

pub mod candidate;
pub mod config;
pub mod error;
pub mod primitives;
pub mod render;
pub mod session;
pub mod style;

pub use candidate::{CandidateGeometry, CandidateLocation, CandidateRequest, PreviewContext};
pub use config::OverlayConfig;
pub use error::{Error, Result};
pub use primitives::{EdgeLine, Label, NodeMarker, OverlayFrame, TriangleFace};
pub use render::{render, RenderLayers, StationMesh};
pub use session::OverlaySession;
pub use style::{classify_edge_color, classify_node_icon, EdgeColor, IconSize, NodeIcon};
