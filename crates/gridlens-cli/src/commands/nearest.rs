use std::path::Path;

use anyhow::Result;
use gridlens_core::{GeoPoint, Kilometers, Kilovolts, NodeId};
use serde::Serialize;

use super::util::{load_config, open_session, write_json};
use gridlens_geom::haversine_km;

#[derive(Debug, Serialize)]
struct NearestEntry<'a> {
    id: &'a NodeId,
    name: &'a str,
    location: GeoPoint,
    voltage_kv: Kilovolts,
    distance_km: Kilometers,
}

pub struct NearestArgs<'a> {
    pub snapshot: &'a Path,
    pub lat: f64,
    pub lon: f64,
    pub k: usize,
    pub voltage: Option<f64>,
}

/// With `--voltage`, the single closest station at that level by great-circle
/// distance; otherwise the `k` closest stations in degree space.
pub fn handle(args: NearestArgs<'_>, config: Option<&Path>) -> Result<()> {
    let session = open_session(args.snapshot, load_config(config)?)?;
    let query = GeoPoint::new(args.lat, args.lon);

    let entries: Vec<NearestEntry<'_>> = match args.voltage {
        Some(kv) => session
            .nearest_by_distance(query, Some(Kilovolts(kv)))
            .into_iter()
            .filter_map(|hit| {
                Some(NearestEntry {
                    id: &hit.node.id,
                    name: hit.node.label(),
                    location: hit.node.location?,
                    voltage_kv: hit.node.voltage_kv,
                    distance_km: hit.distance_km,
                })
            })
            .collect(),
        None => session
            .nearest_k(args.lat, args.lon, args.k)
            .into_iter()
            .filter_map(|node| {
                let location = node.location?;
                Some(NearestEntry {
                    id: &node.id,
                    name: node.label(),
                    location,
                    voltage_kv: node.voltage_kv,
                    distance_km: haversine_km(query, location),
                })
            })
            .collect(),
    };
    write_json(&entries, None)
}
