//! Domain registry (spec.md §4.5.1): maps the short names a query uses
//! (`plant`, `acc`, `gen`, `sp`, `fam`, …) to the table they scan and
//! the columns eligible for bare text search.

use crate::error::{BotanicError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Family,
    Genus,
    Species,
    Geography,
    VernacularName,
    Accession,
    Plant,
}

#[derive(Debug, Clone, Copy)]
pub struct DomainInfo {
    pub entity: Entity,
    pub table: &'static str,
    pub searchable_columns: &'static [&'static str],
}

const REGISTRY: &[(&str, DomainInfo)] = &[
    (
        "fam",
        DomainInfo { entity: Entity::Family, table: "family", searchable_columns: &["epithet"] },
    ),
    (
        "family",
        DomainInfo { entity: Entity::Family, table: "family", searchable_columns: &["epithet"] },
    ),
    (
        "gen",
        DomainInfo { entity: Entity::Genus, table: "genus", searchable_columns: &["epithet"] },
    ),
    (
        "genus",
        DomainInfo { entity: Entity::Genus, table: "genus", searchable_columns: &["epithet"] },
    ),
    (
        "sp",
        DomainInfo {
            entity: Entity::Species,
            table: "species",
            searchable_columns: &["epithet", "full_name", "full_sci_name"],
        },
    ),
    (
        "species",
        DomainInfo {
            entity: Entity::Species,
            table: "species",
            searchable_columns: &["epithet", "full_name", "full_sci_name"],
        },
    ),
    (
        "geo",
        DomainInfo { entity: Entity::Geography, table: "geography", searchable_columns: &["name"] },
    ),
    (
        "vn",
        DomainInfo {
            entity: Entity::VernacularName,
            table: "vernacular_name",
            searchable_columns: &["name"],
        },
    ),
    (
        "acc",
        DomainInfo {
            entity: Entity::Accession,
            table: "accession",
            searchable_columns: &["code"],
        },
    ),
    (
        "accession",
        DomainInfo {
            entity: Entity::Accession,
            table: "accession",
            searchable_columns: &["code"],
        },
    ),
    (
        "plant",
        DomainInfo {
            entity: Entity::Plant,
            table: "plant",
            searchable_columns: &["quantity"],
        },
    ),
];

/// Resolve a domain short name, or `ParseError` if it isn't registered
/// (spec.md §4.5.1 "Unknown domains raise ParseError").
pub fn resolve(name: &str) -> Result<DomainInfo> {
    let lower = name.to_ascii_lowercase();
    REGISTRY
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, info)| *info)
        .ok_or_else(|| BotanicError::parse(format!("unknown domain: {name:?}")))
}

/// The relations reachable by one dot-step from `entity`, used by the
/// planner's path resolver to validate `relation` names in a
/// `ColumnPath` (spec.md §4.5.2).
pub fn relations_of(entity: Entity) -> &'static [(&'static str, Entity, bool)] {
    // (relation name, target entity, is_to_many)
    match entity {
        Entity::Family => &[("genera", Entity::Genus, true)],
        Entity::Genus => &[
            ("family", Entity::Family, false),
            ("species", Entity::Species, true),
        ],
        Entity::Species => &[
            ("genus", Entity::Genus, false),
            ("vernacular_names", Entity::VernacularName, true),
            ("accessions", Entity::Accession, true),
            ("distribution", Entity::Geography, true),
        ],
        Entity::Geography => &[("species", Entity::Species, true)],
        Entity::VernacularName => &[("species", Entity::Species, false)],
        Entity::Accession => &[
            ("species", Entity::Species, false),
            ("plants", Entity::Plant, true),
        ],
        Entity::Plant => &[("accession", Entity::Accession, false)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_short_names_case_insensitively() {
        assert_eq!(resolve("SP").unwrap().table, "species");
        assert_eq!(resolve("fam").unwrap().table, "family");
    }

    #[test]
    fn unknown_domain_is_parse_error() {
        assert!(resolve("bogus").is_err());
    }

    #[test]
    fn species_reaches_accessions_to_many() {
        let rel = relations_of(Entity::Species)
            .iter()
            .find(|(name, _, _)| *name == "accessions")
            .unwrap();
        assert!(rel.2);
    }
}
