//! SVG distribution map rendering and its bounded image cache.
//!
//! Grounded on `DistributionMap`/`DistMapCache`/`_path_string`/
//! `_coord_string` in
//! `original_source/bauble/plugins/plants/geography.py`. The original
//! rasterises an SVG string into a `GdkPixbuf` for a desktop widget;
//! this crate stops at the SVG string (spec.md §6 "distribution_map(set
//! of geography ids) → SVG string") and leaves rendering to the caller.

use crate::types::geography::Geography;
use std::collections::VecDeque;

const WORLD_VIEWBOX: &str = r#"viewBox="-180 90 360 180""#;

fn coord_string(lon: f64, lat: f64) -> String {
    format!("{:.3} {:.3}", round3(lon), round3(lat))
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// One closed ring of WGS84 `[lon, lat]` pairs into an SVG `<path>`
/// element, mirroring `_path_string`.
fn path_string(ring: &[(f64, f64)], fill: &str) -> String {
    if ring.is_empty() {
        return String::new();
    }
    let start = coord_string(ring[0].0, ring[0].1);
    let middle: Vec<String> = ring[1..ring.len().saturating_sub(1)]
        .iter()
        .map(|&(lon, lat)| format!("L {}", coord_string(lon, lat)))
        .collect();
    let d = format!("M {start} {} Z", middle.join(" "));
    format!(r#"<path stroke="black" stroke-width="0.1" fill="{fill}" d="{d}"/>"#)
}

fn rings_of(geojson: &serde_json::Value) -> Vec<Vec<(f64, f64)>> {
    fn ring_from(value: &serde_json::Value) -> Option<Vec<(f64, f64)>> {
        let coords = value.as_array()?;
        coords
            .iter()
            .map(|p| {
                let pair = p.as_array()?;
                Some((pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
            })
            .collect()
    }

    let geom_type = geojson.get("type").and_then(|t| t.as_str()).unwrap_or("");
    let coordinates = geojson.get("coordinates");
    let mut rings = Vec::new();
    match geom_type {
        "Polygon" => {
            if let Some(rings_json) = coordinates.and_then(|c| c.as_array()) {
                if let Some(outer) = rings_json.first().and_then(ring_from) {
                    rings.push(outer);
                }
            }
        }
        "MultiPolygon" => {
            if let Some(polys) = coordinates.and_then(|c| c.as_array()) {
                for poly in polys {
                    if let Some(rings_json) = poly.as_array() {
                        if let Some(outer) = rings_json.first().and_then(ring_from) {
                            rings.push(outer);
                        }
                    }
                }
            }
        }
        _ => {}
    }
    rings
}

/// Render the world outline plus one highlighted path per geography
/// with mapped geometry in `selected`, as a self-contained SVG document
/// (spec.md §6 "distribution_map(set of geography ids) → SVG string").
pub fn distribution_map_svg(selected: &[Geography], fill: &str) -> String {
    let mut paths = String::new();
    for geo in selected {
        if let Some(geojson) = &geo.geojson {
            for ring in rings_of(geojson) {
                paths.push_str(&path_string(&ring, fill));
            }
        }
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" {WORLD_VIEWBOX} transform="scale(1, -1)">{paths}</svg>"#
    )
}

/// Least-recently-*accessed* bounded cache of rendered maps, keyed by
/// the geography id set they were built for. Mirrors `DistMapCache`:
/// insertion evicts the least-recently-accessed entry once the cache
/// exceeds capacity, and every successful `get` promotes its entry to
/// most-recently-used.
pub struct DistMapCache {
    capacity: usize,
    order: VecDeque<Vec<i64>>,
    entries: std::collections::HashMap<Vec<i64>, String>,
}

impl DistMapCache {
    pub fn new(capacity: usize) -> Self {
        DistMapCache { capacity, order: VecDeque::new(), entries: std::collections::HashMap::new() }
    }

    pub fn get(&mut self, key: &[i64]) -> Option<&str> {
        if self.entries.contains_key(key) {
            self.order.retain(|k| k != key);
            self.order.push_back(key.to_vec());
            self.entries.get(key).map(|s| s.as_str())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: Vec<i64>, svg: String) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.retain(|k| k != &key);
        self.order.push_back(key.clone());
        self.entries.insert(key, svg);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DistMapCache {
    fn default() -> Self {
        // Matches the original's hardcoded `> 120` eviction threshold.
        DistMapCache::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square_geo(id: i64) -> Geography {
        Geography {
            id,
            name: format!("square-{id}"),
            parent_id: None,
            code: None,
            geojson: Some(json!({
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]]
            })),
            approx_area: None,
        }
    }

    #[test]
    fn svg_contains_viewbox_and_one_path_per_selected_geometry() {
        let svg = distribution_map_svg(&[square_geo(1), square_geo(2)], "red");
        assert!(svg.contains(r#"viewBox="-180 90 360 180""#));
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn geography_without_geometry_contributes_no_path() {
        let mut geo = square_geo(1);
        geo.geojson = None;
        let svg = distribution_map_svg(&[geo], "red");
        assert_eq!(svg.matches("<path").count(), 0);
    }

    #[test]
    fn cache_evicts_least_recently_accessed_entry() {
        let mut cache = DistMapCache::new(2);
        cache.insert(vec![1], "a".to_string());
        cache.insert(vec![2], "b".to_string());
        // touch [1] so [2] becomes the least-recently-accessed entry
        cache.get(&[1]);
        cache.insert(vec![3], "c".to_string());
        assert!(cache.get(&[1]).is_some());
        assert!(cache.get(&[2]).is_none());
        assert!(cache.get(&[3]).is_some());
    }
}
