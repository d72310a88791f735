//! Synonymy-forest and distribution-graph operations (C3).
//!
//! Grounded on `Geography.get_parent_ids`/`get_children_ids` (recursive
//! CTE walks) and `consolidate_geographies`/`ConsolidateByPercentArea` in
//! `original_source/bauble/plugins/plants/geography.py`. The original
//! walks a SQLAlchemy-mapped tree via recursive CTEs; here the same
//! walks run in memory over a borrowed slice, since the relations
//! involved (`parent_id` chains) are small enough to load wholesale and
//! the persistence layer (`queries::geography`) is responsible for
//! fetching that slice.

use crate::types::geography::{Geography, GeographyId, SpeciesDistribution};
use crate::types::species::SpeciesId;
use geo::algorithm::geodesic_area::GeodesicArea;
use geo::{Coord, LineString, MultiPolygon, Polygon};
use std::collections::HashSet;

/// All ancestor ids of `id`, walking `parent_id` to the root.
pub fn parent_ids(geographies: &[Geography], id: GeographyId) -> HashSet<GeographyId> {
    let mut ids = HashSet::new();
    let mut current = id;
    while let Some(geo) = geographies.iter().find(|g| g.id == current) {
        match geo.parent_id {
            Some(parent_id) => {
                ids.insert(parent_id);
                current = parent_id;
            }
            None => break,
        }
    }
    ids
}

/// All descendant ids of `id`.
pub fn children_ids(geographies: &[Geography], id: GeographyId) -> HashSet<GeographyId> {
    let mut ids = HashSet::new();
    let mut frontier = vec![id];
    while let Some(current) = frontier.pop() {
        for geo in geographies.iter().filter(|g| g.parent_id == Some(current)) {
            if ids.insert(geo.id) {
                frontier.push(geo.id);
            }
        }
    }
    ids
}

/// Nodes from root to `id`, inclusive, root first.
pub fn path_from_root(geographies: &[Geography], id: GeographyId) -> Vec<GeographyId> {
    let mut path = vec![id];
    let mut current = id;
    while let Some(geo) = geographies.iter().find(|g| g.id == current) {
        match geo.parent_id {
            Some(parent_id) => {
                path.insert(0, parent_id);
                current = parent_id;
            }
            None => break,
        }
    }
    path
}

/// Species occurring in `id` or any of its descendants.
pub fn species_in_geography(
    geographies: &[Geography],
    distributions: &[SpeciesDistribution],
    id: GeographyId,
) -> HashSet<SpeciesId> {
    let mut ids = children_ids(geographies, id);
    ids.insert(id);
    distributions
        .iter()
        .filter(|d| ids.contains(&d.geography_id))
        .map(|d| d.species_id)
        .collect()
}

/// WGS84-sphere area in square kilometres, per
/// `Geography.get_approx_area`. Returns 0.0 when there's no geometry.
pub fn approx_area_km2(geojson: &serde_json::Value) -> f64 {
    let multi = match parse_multi_polygon(geojson) {
        Some(m) => m,
        None => return 0.0,
    };
    multi.geodesic_area_unsigned() / 1e6
}

fn parse_ring(coords: &serde_json::Value) -> Option<LineString<f64>> {
    let points = coords.as_array()?;
    let coords: Vec<Coord<f64>> = points
        .iter()
        .filter_map(|p| {
            let pair = p.as_array()?;
            let lon = pair.first()?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            Some(Coord { x: lon, y: lat })
        })
        .collect();
    Some(LineString::new(coords))
}

fn parse_polygon(coordinates: &serde_json::Value) -> Option<Polygon<f64>> {
    let rings = coordinates.as_array()?;
    let exterior = parse_ring(rings.first()?)?;
    let interiors = rings.iter().skip(1).filter_map(parse_ring).collect();
    Some(Polygon::new(exterior, interiors))
}

fn parse_multi_polygon(geojson: &serde_json::Value) -> Option<MultiPolygon<f64>> {
    let kind = geojson.get("type")?.as_str()?;
    let coordinates = geojson.get("coordinates")?;
    match kind {
        "Polygon" => parse_polygon(coordinates).map(|p| MultiPolygon::new(vec![p])),
        "MultiPolygon" => {
            let polys = coordinates.as_array()?;
            let polygons = polys.iter().filter_map(parse_polygon).collect();
            Some(MultiPolygon::new(polygons))
        }
        _ => None,
    }
}

/// Recompute and store `geography.approx_area`, mirroring the
/// `before_insert`/`before_update` listeners in the original.
pub fn recompute_area(geography: &mut Geography) {
    geography.approx_area = geography.geojson.as_ref().map(approx_area_km2);
}

/// Given a set of geography ids, recursively replace every complete set
/// of siblings with their shared parent (`consolidate_geographies`).
pub fn consolidate(all: &[Geography], selected: &HashSet<GeographyId>) -> HashSet<GeographyId> {
    let mut current = selected.clone();
    loop {
        let mut parents_with_all_children_selected: HashSet<GeographyId> = HashSet::new();
        for geo in all {
            if let Some(parent_id) = geo.parent_id {
                let siblings: Vec<&Geography> =
                    all.iter().filter(|g| g.parent_id == Some(parent_id)).collect();
                if !siblings.is_empty() && siblings.iter().all(|s| current.contains(&s.id)) {
                    parents_with_all_children_selected.insert(parent_id);
                }
            }
        }

        let mut next: HashSet<GeographyId> = HashSet::new();
        for &id in &parents_with_all_children_selected {
            next.insert(id);
        }
        for &id in &current {
            let ancestors = parent_ids(all, id);
            if parents_with_all_children_selected.is_disjoint(&ancestors) {
                next.insert(id);
            }
        }

        if next == current {
            return next;
        }
        current = next;
    }
}

/// Consolidate `selected` geographies up toward their common ancestors,
/// stopping as soon as climbing further would merge in more than
/// `percent`% of unselected area, or a node already in `selected` is hit
/// (`ConsolidateByPercentArea.__call__`).
pub fn consolidate_by_percent_area(
    all: &[Geography],
    selected: &HashSet<GeographyId>,
    percent: u32,
    allowable_children: usize,
) -> HashSet<GeographyId> {
    let roots: Vec<&Geography> = all.iter().filter(|g| g.parent_id.is_none()).collect();
    let mut result = HashSet::new();
    for root in roots {
        walk_consolidate(all, root, selected, percent, allowable_children, &mut result);
    }
    result
}

fn walk_consolidate(
    all: &[Geography],
    node: &Geography,
    selected: &HashSet<GeographyId>,
    percent: u32,
    allowable_children: usize,
    result: &mut HashSet<GeographyId>,
) {
    if selected.contains(&node.id) {
        result.insert(node.id);
        return;
    }
    let children: Vec<&Geography> = all.iter().filter(|g| g.parent_id == Some(node.id)).collect();
    if children.len() >= allowable_children {
        let leaves_area: f64 = leaf_area_sum(all, node);
        let node_area = node.approx_area.unwrap_or(0.0);
        if node_area * percent as f64 / 100.0 < leaves_area {
            result.insert(node.id);
            return;
        }
    }
    if children.is_empty() {
        result.insert(node.id);
        return;
    }
    for child in children {
        walk_consolidate(all, child, selected, percent, allowable_children, result);
    }
}

fn leaf_area_sum(all: &[Geography], node: &Geography) -> f64 {
    let children: Vec<&Geography> = all.iter().filter(|g| g.parent_id == Some(node.id)).collect();
    if children.is_empty() {
        return node.approx_area.unwrap_or(0.0);
    }
    children.iter().map(|c| leaf_area_sum(all, c)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn geo(id: GeographyId, parent_id: Option<GeographyId>) -> Geography {
        Geography {
            id,
            name: format!("geo{id}"),
            parent_id,
            code: None,
            geojson: None,
            approx_area: None,
        }
    }

    #[test]
    fn parent_ids_walks_to_root() {
        let all = vec![geo(1, None), geo(2, Some(1)), geo(3, Some(2))];
        let mut ids: Vec<_> = parent_ids(&all, 3).into_iter().collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn children_ids_walks_down() {
        let all = vec![geo(1, None), geo(2, Some(1)), geo(3, Some(2))];
        let mut ids: Vec<_> = children_ids(&all, 1).into_iter().collect();
        ids.sort();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn path_from_root_includes_self() {
        let all = vec![geo(1, None), geo(2, Some(1)), geo(3, Some(2))];
        assert_eq!(path_from_root(&all, 3), vec![1, 2, 3]);
    }

    #[test]
    fn species_in_geography_includes_descendants() {
        let all = vec![geo(1, None), geo(2, Some(1))];
        let dist = vec![
            SpeciesDistribution { species_id: 10, geography_id: 1 },
            SpeciesDistribution { species_id: 11, geography_id: 2 },
        ];
        let mut species: Vec<_> = species_in_geography(&all, &dist, 1).into_iter().collect();
        species.sort();
        assert_eq!(species, vec![10, 11]);
    }

    #[test]
    fn approx_area_of_small_square_is_positive() {
        let square = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]]
        });
        let area = approx_area_km2(&square);
        assert!(area > 0.0);
    }

    #[test]
    fn approx_area_without_geometry_is_zero() {
        assert_eq!(approx_area_km2(&json!({"type": "Point"})), 0.0);
    }

    #[test]
    fn consolidate_merges_complete_sibling_sets() {
        let all = vec![geo(1, None), geo(2, Some(1)), geo(3, Some(1))];
        let selected: HashSet<_> = [2, 3].into_iter().collect();
        let result = consolidate(&all, &selected);
        assert_eq!(result, [1].into_iter().collect());
    }
}
