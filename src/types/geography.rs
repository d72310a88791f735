//! Geography tree node and species-distribution edge (spec.md §3, §4.4
//! domain `distribution`). Grounded on `Geography` and
//! `SpeciesDistribution` in
//! `original_source/bauble/plugins/plants/geography.py`.

use crate::error::{BotanicError, Result};
use crate::types::species::SpeciesId;
use serde::{Deserialize, Serialize};

pub type GeographyId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geography {
    pub id: GeographyId,
    pub name: String,
    pub parent_id: Option<GeographyId>,
    pub code: Option<String>,
    /// GeoJSON polygon/multipolygon geometry, if this node has a mapped
    /// boundary (spec.md "WGS84 sphere area").
    pub geojson: Option<serde_json::Value>,
    /// Cached km² area, recomputed by `crate::graph::recompute_area`
    /// whenever `geojson` changes (mirrors the `before_insert`/
    /// `before_update` listeners in the original).
    pub approx_area: Option<f64>,
}

impl Geography {
    pub fn create(name: &str, parent_id: Option<GeographyId>) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(BotanicError::validation("geography name must not be empty"));
        }
        Ok(Geography {
            id: 0,
            name,
            parent_id,
            code: None,
            geojson: None,
            approx_area: None,
        })
    }
}

/// Edge recording that a species occurs in a geography (spec.md §3
/// "Species—Geography distribution edges").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesDistribution {
    pub species_id: SpeciesId,
    pub geography_id: GeographyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_name() {
        assert!(Geography::create("  ", None).is_err());
    }

    #[test]
    fn create_defaults_area_to_none() {
        let geo = Geography::create("Europe", None).unwrap();
        assert!(geo.approx_area.is_none());
    }
}
