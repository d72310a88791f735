//! IUCN Red List helpers: pure category → threat/priority derivation.
//!
//! Grounded on `IUCNCategory`/`integration::is_species_threatened`/
//! `integration::get_conservation_priority` in
//! `examples/Michael-A-Kuykendall-botanica/src/conservation.rs`, with the
//! remote `IUCNClient` (spec's Non-goal: "Remote taxonomic lookup
//! services") dropped — `crate::types::enums::RedList` is the category
//! carrier now, stored directly on `Species`/looked up from `notes`.

#[cfg(feature = "conservation")]
use crate::types::enums::RedList;

/// Whether `category` counts as threatened (VU, EN, CR, EW, EX), per
/// the same grouping the teacher used.
#[cfg(feature = "conservation")]
pub fn is_threatened(category: RedList) -> bool {
    category.is_threatened()
}

/// Priority score (0-10, higher = more urgent), used to sort a
/// watchlist view. Kept as a free function, not a `RedList` method,
/// since it's a conservation-specific weighting rather than an
/// intrinsic property of the category.
#[cfg(feature = "conservation")]
pub fn priority(category: RedList) -> u8 {
    match category {
        RedList::Ex => 10,
        RedList::Ew => 9,
        RedList::Cr => 8,
        RedList::En => 7,
        RedList::Vu => 6,
        RedList::Nt => 4,
        RedList::Dd => 3,
        RedList::Lc => 1,
        RedList::Re => 5,
        RedList::Ne => 0,
    }
}

#[cfg(all(test, feature = "conservation"))]
mod tests {
    use super::*;

    #[test]
    fn priority_ranks_extinct_highest() {
        assert_eq!(priority(RedList::Ex), 10);
        assert!(priority(RedList::Ex) > priority(RedList::Vu));
    }

    #[test]
    fn threatened_matches_red_list_grouping() {
        assert!(is_threatened(RedList::Cr));
        assert!(!is_threatened(RedList::Lc));
    }
}
