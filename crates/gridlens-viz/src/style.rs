//! Color and size classification for stations and lines.
//!
//! Thresholds are strict: a 200 kV station is medium and a line at exactly
//! 90 % loading is orange.

use gridlens_core::{Kilovolts, LoadingPercent};
use serde::Serialize;

/// Marker size tier for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconSize {
    Small,
    Medium,
    Large,
}

/// Marker appearance derived from nominal voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeIcon {
    pub size: IconSize,
    /// Marker diameter in pixels
    pub pixels: u32,
    pub color: &'static str,
}

/// Line loading band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeColor {
    Green,
    Orange,
    Red,
}

impl EdgeColor {
    pub const fn hex(self) -> &'static str {
        match self {
            EdgeColor::Green => "#10b981",
            EdgeColor::Orange => "#f59e0b",
            EdgeColor::Red => "#ef4444",
        }
    }
}

pub const HIGH_VOLTAGE_KV: f64 = 200.0;
pub const MEDIUM_VOLTAGE_KV: f64 = 100.0;
pub const OVERLOAD_PERCENT: f64 = 90.0;
pub const HEAVY_LOAD_PERCENT: f64 = 70.0;

/// Candidate preview palette.
pub const PREVIEW_LINE_COLOR: &str = "#22d3ee";
pub const PREVIEW_SUBSTATION_COLOR: &str = "#ef4444";
pub const PREVIEW_SUBSTATION_FILL: &str = "#fca5a5";
pub const PREVIEW_EXPANSION_COLOR: &str = "#f59e0b";
pub const PREVIEW_EXPANSION_FILL: &str = "#fde68a";

pub fn classify_node_icon(voltage: Kilovolts) -> NodeIcon {
    let kv = voltage.value();
    if kv > HIGH_VOLTAGE_KV {
        NodeIcon {
            size: IconSize::Large,
            pixels: 20,
            color: "#dc2626",
        }
    } else if kv > MEDIUM_VOLTAGE_KV {
        NodeIcon {
            size: IconSize::Medium,
            pixels: 16,
            color: "#f59e0b",
        }
    } else {
        NodeIcon {
            size: IconSize::Small,
            pixels: 12,
            color: "#3b82f6",
        }
    }
}

pub fn classify_edge_color(loading: LoadingPercent) -> EdgeColor {
    let percent = loading.value();
    if percent > OVERLOAD_PERCENT {
        EdgeColor::Red
    } else if percent > HEAVY_LOAD_PERCENT {
        EdgeColor::Orange
    } else {
        EdgeColor::Green
    }
}
