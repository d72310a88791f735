//! Read-only stand-ins for entities this crate never constructs, but
//! whose ids it stores and whose rows it joins against when resolving
//! `accession`/`plant`-domain queries (spec.md §6: "core references it
//! only to read ... never constructs those entities").

pub type AccessionId = i64;
pub type PlantId = i64;

/// Enough of the `accession` table to drive the query planner's joins
/// and the distribution map. The owning collection software is the only
/// writer of this table; this crate treats it as foreign read-only data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessionRef {
    pub id: AccessionId,
    pub species_id: crate::types::species::SpeciesId,
    pub code: String,
}

/// Enough of the `plant` table to resolve `plant.`-domain predicates and
/// to attach pictures transitively (`Species::pictures`, spec.md §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantRef {
    pub id: PlantId,
    pub accession_id: AccessionId,
    pub quantity: i64,
}
