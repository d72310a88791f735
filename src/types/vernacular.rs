//! Vernacular (common) names attached to a species (spec.md §3).
//! Grounded on `VernacularName` / `DefaultVernacularName` in
//! `original_source/bauble/plugins/plants/species_model.py`.

use crate::error::{BotanicError, Result};
use crate::types::species::SpeciesId;
use serde::{Deserialize, Serialize};

pub type VernacularNameId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VernacularName {
    pub id: VernacularNameId,
    pub species_id: SpeciesId,
    pub name: String,
    pub language: Option<String>,
}

impl VernacularName {
    pub fn create(species_id: SpeciesId, name: &str, language: Option<String>) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(BotanicError::validation("vernacular name must not be empty"));
        }
        Ok(VernacularName {
            id: 0,
            species_id,
            name,
            language: language.filter(|l| !l.trim().is_empty()),
        })
    }
}

/// `Species.default_vernacular_name` hybrid attribute: the one entry in
/// `names` flagged default, else `None`.
pub fn default_of<'a>(
    names: &'a [VernacularName],
    default_id: Option<VernacularNameId>,
) -> Option<&'a VernacularName> {
    let id = default_id?;
    names.iter().find(|n| n.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_name() {
        assert!(VernacularName::create(1, "  ", None).is_err());
    }

    #[test]
    fn default_of_finds_flagged_entry() {
        let names = vec![
            VernacularName::create(1, "Rose", None).unwrap(),
            VernacularName {
                id: 2,
                species_id: 1,
                name: "Rosier".into(),
                language: Some("fr".into()),
            },
        ];
        assert_eq!(default_of(&names, Some(2)).unwrap().name, "Rosier");
        assert!(default_of(&names, None).is_none());
    }
}
