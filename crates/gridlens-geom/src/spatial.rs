//! Nearest-station resolution over a snapshot's node list.
//!
//! Node counts are tens to low hundreds, so every query is a linear scan over
//! the located nodes in input order. Distances for snapping are squared
//! Euclidean in raw degree space; ties keep whichever node came first.

use std::collections::HashMap;

use gridlens_core::{GeoPoint, Kilometers, Kilovolts, Node, NodeId};
use serde::Serialize;

use crate::distance::haversine_km;

/// A node together with its great-circle distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestStation<'a> {
    pub node: &'a Node,
    pub distance_km: Kilometers,
}

/// Read-only lookup structure borrowed from a node slice.
#[derive(Debug, Clone)]
pub struct SpatialIndex<'a> {
    nodes: &'a [Node],
    by_id: HashMap<&'a NodeId, usize>,
}

impl<'a> SpatialIndex<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            by_id.entry(&node.id).or_insert(position);
        }
        Self { nodes, by_id }
    }

    fn located(&self) -> impl Iterator<Item = (&'a Node, GeoPoint)> + 'a {
        self.nodes
            .iter()
            .filter_map(|node| node.location.map(|location| (node, location)))
    }

    /// Closest located node, or `None` when there is none (or the query is not finite).
    pub fn nearest1(&self, lat: f64, lon: f64) -> Option<&'a Node> {
        let query = GeoPoint::new(lat, lon);
        if !query.is_finite() {
            return None;
        }
        let mut best: Option<(&'a Node, f64)> = None;
        for (node, location) in self.located() {
            let d = location.squared_distance(query);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((node, d)),
            }
        }
        best.map(|(node, _)| node)
    }

    /// Up to `k` located nodes, closest first.
    pub fn nearest_k(&self, lat: f64, lon: f64, k: usize) -> Vec<&'a Node> {
        let query = GeoPoint::new(lat, lon);
        if k == 0 || !query.is_finite() {
            return Vec::new();
        }
        let mut ranked: Vec<(&'a Node, f64)> = self
            .located()
            .map(|(node, location)| (node, location.squared_distance(query)))
            .collect();
        // stable: equal distances keep input order
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(k);
        ranked.into_iter().map(|(node, _)| node).collect()
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&'a Node> {
        self.by_id.get(id).map(|&position| &self.nodes[position])
    }

    /// Closest located node by great-circle distance, optionally restricted
    /// to one voltage level.
    pub fn nearest_by_distance(
        &self,
        point: GeoPoint,
        voltage: Option<Kilovolts>,
    ) -> Option<NearestStation<'a>> {
        if !point.is_finite() {
            return None;
        }
        let mut best: Option<NearestStation<'a>> = None;
        for (node, location) in self.located() {
            if voltage.is_some_and(|level| node.voltage_kv != level) {
                continue;
            }
            let distance_km = haversine_km(point, location);
            match best {
                Some(current) if distance_km >= current.distance_km => {}
                _ => {
                    best = Some(NearestStation { node, distance_km });
                }
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
