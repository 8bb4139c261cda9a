//! Rectangular planning-zone grid over the network extent, as GeoJSON.

use gridlens_core::{GeoPoint, Node};
use serde::Serialize;

pub const DEFAULT_ZONE_ROWS: usize = 6;
pub const DEFAULT_ZONE_COLS: usize = 10;

/// Fraction of each span added on both sides of the extent.
const PADDING_FRACTION: f64 = 0.15;
/// Padding in degrees for an axis whose span is zero.
const MIN_PADDING_DEG: f64 = 0.02;

/// Extent used when no node has a location.
const FALLBACK_EXTENT: [GeoPoint; 2] = [GeoPoint::new(23.10, 113.23), GeoPoint::new(23.17, 113.31)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<ZoneFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneFeature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: ZoneProperties,
    pub geometry: ZonePolygon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneProperties {
    pub zone_id: String,
    pub name: String,
    /// 1-based
    pub row: usize,
    /// 1-based
    pub col: usize,
    /// Filled in by the planner; always `null` for a fresh grid
    pub baseline_load_mw: Option<f64>,
    pub status: String,
}

/// GeoJSON polygon with a single closed `[lon, lat]` ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZonePolygon {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl ZoneCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl ZoneFeature {
    /// The closed outer ring.
    pub fn ring(&self) -> &[[f64; 2]] {
        self.geometry
            .coordinates
            .first()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Padded bounding box `(south_west, north_east)` of the located nodes.
pub fn padded_extent<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> (GeoPoint, GeoPoint) {
    let mut located = nodes.into_iter().filter_map(|node| node.location).peekable();
    let points: Vec<GeoPoint> = if located.peek().is_some() {
        located.collect()
    } else {
        FALLBACK_EXTENT.to_vec()
    };

    let mut min = GeoPoint::new(f64::INFINITY, f64::INFINITY);
    let mut max = GeoPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in &points {
        min.lat = min.lat.min(p.lat);
        min.lon = min.lon.min(p.lon);
        max.lat = max.lat.max(p.lat);
        max.lon = max.lon.max(p.lon);
    }

    let pad = |span: f64| {
        let padding = span * PADDING_FRACTION;
        if padding == 0.0 {
            MIN_PADDING_DEG
        } else {
            padding
        }
    };
    let dlat = pad(max.lat - min.lat);
    let dlon = pad(max.lon - min.lon);

    (
        GeoPoint::new(min.lat - dlat, min.lon - dlon),
        GeoPoint::new(max.lat + dlat, max.lon + dlon),
    )
}

/// Split the padded extent into `rows x cols` equal cells, numbered row-major
/// from the south-west corner. Zero rows or columns are treated as one.
pub fn zone_grid<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    rows: usize,
    cols: usize,
) -> ZoneCollection {
    let rows = rows.max(1);
    let cols = cols.max(1);
    let (sw, ne) = padded_extent(nodes);
    let lat_span = ne.lat - sw.lat;
    let lon_span = ne.lon - sw.lon;

    let mut features = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        let lat0 = sw.lat + lat_span * i as f64 / rows as f64;
        let lat1 = sw.lat + lat_span * (i + 1) as f64 / rows as f64;
        for j in 0..cols {
            let lon0 = sw.lon + lon_span * j as f64 / cols as f64;
            let lon1 = sw.lon + lon_span * (j + 1) as f64 / cols as f64;
            let ring = vec![
                [lon0, lat0],
                [lon1, lat0],
                [lon1, lat1],
                [lon0, lat1],
                [lon0, lat0],
            ];
            features.push(ZoneFeature {
                kind: "Feature",
                properties: ZoneProperties {
                    zone_id: format!("zone_{}", features.len() + 1),
                    name: format!("Zone {}-{}", i + 1, j + 1),
                    row: i + 1,
                    col: j + 1,
                    baseline_load_mw: None,
                    status: "unset".to_string(),
                },
                geometry: ZonePolygon {
                    kind: "Polygon",
                    coordinates: vec![ring],
                },
            });
        }
    }

    ZoneCollection {
        kind: "FeatureCollection",
        features,
    }
}
