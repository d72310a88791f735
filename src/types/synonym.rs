//! Synonym-forest edges for Family/Genus/Species (spec.md §3, §4.3).
//! Grounded on `SpeciesSynonym` in
//! `original_source/bauble/plugins/plants/species_model.py`, which
//! carries a `CheckConstraint(species_id != synonym_id)` and a unique
//! constraint on `synonym_id` (a name may be a synonym of at most one
//! accepted taxon).

use crate::error::{BotanicError, Result};

/// A directed synonym edge: `synonym_id` is a synonym of `accepted_id`.
/// Generic over the three taxon id types (`FamilyId`/`GenusId`/
/// `SpeciesId`) since the shape and invariants are identical for all
/// three (spec.md §4.3 "Analogous edges exist for Family and Genus").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynonymEdge<Id> {
    pub accepted_id: Id,
    pub synonym_id: Id,
}

impl<Id: PartialEq + Copy + std::fmt::Debug> SynonymEdge<Id> {
    pub fn new(accepted_id: Id, synonym_id: Id) -> Result<Self> {
        if accepted_id == synonym_id {
            return Err(BotanicError::validation(format!(
                "a taxon cannot be its own synonym: {accepted_id:?}"
            )));
        }
        Ok(SynonymEdge { accepted_id, synonym_id })
    }
}

/// Reassign `taxon_id`'s accepted name, per spec.md §4.3: removing an
/// existing edge where `taxon_id` is the synonym, then (if `new_accepted`
/// is `Some`) inserting the new one. Enforces the "at most one accepted
/// name per synonym" constraint by construction (a `Vec` here models one
/// table row per synonym id, so replacing is a filter-then-push).
pub fn reassign_accepted<Id: PartialEq + Copy + std::fmt::Debug>(
    edges: &mut Vec<SynonymEdge<Id>>,
    taxon_id: Id,
    new_accepted: Option<Id>,
) -> Result<()> {
    edges.retain(|e| e.synonym_id != taxon_id);
    if let Some(accepted_id) = new_accepted {
        edges.push(SynonymEdge::new(accepted_id, taxon_id)?);
    }
    Ok(())
}

/// All ids currently recorded as synonyms of `accepted_id`.
pub fn synonyms_of<Id: PartialEq + Copy>(edges: &[SynonymEdge<Id>], accepted_id: Id) -> Vec<Id> {
    edges
        .iter()
        .filter(|e| e.accepted_id == accepted_id)
        .map(|e| e.synonym_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_self_synonym() {
        assert!(SynonymEdge::new(1i64, 1i64).is_err());
    }

    #[test]
    fn reassign_replaces_existing_edge() {
        let mut edges = vec![SynonymEdge::new(1i64, 2i64).unwrap()];
        reassign_accepted(&mut edges, 2, Some(3)).unwrap();
        assert_eq!(edges, vec![SynonymEdge::new(3, 2).unwrap()]);
    }

    #[test]
    fn reassign_to_none_removes_edge() {
        let mut edges = vec![SynonymEdge::new(1i64, 2i64).unwrap()];
        reassign_accepted(&mut edges, 2, None).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn synonyms_of_filters_by_accepted() {
        let edges = vec![
            SynonymEdge::new(1i64, 2i64).unwrap(),
            SynonymEdge::new(1i64, 3i64).unwrap(),
            SynonymEdge::new(4i64, 5i64).unwrap(),
        ];
        let mut syns = synonyms_of(&edges, 1);
        syns.sort();
        assert_eq!(syns, vec![2, 3]);
    }
}
