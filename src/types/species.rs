//! `Species` entity (spec.md §3, §4.2) — the most detailed taxon in the
//! hierarchy. Grounded on
//! `original_source/bauble/plugins/plants/species_model.py`.

use crate::error::{BotanicError, Result};
use crate::name::{format_name, NameFlags};
use crate::types::enums::{Cites, Hybrid, InfraspRank, RedList, SpeciesQualifier, TrademarkSymbol};
use crate::types::external::{AccessionRef, PlantRef};
use crate::types::genus::GenusId;
use crate::types::note::{Note, Picture};
use serde::{Deserialize, Serialize};

pub type SpeciesId = i64;

/// One of the four infraspecific slots a species may carry (spec.md
/// §4.2 "four infraspecific slots").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InfraspSlot {
    pub rank: InfraspRank,
    pub epithet: String,
    pub author: Option<String>,
}

impl InfraspSlot {
    fn is_set(&self) -> bool {
        !self.epithet.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub genus_id: GenusId,
    /// Denormalised for `name::format_name`; kept in sync with the owning
    /// genus by the persistence layer on every load (spec.md §6).
    pub genus_epithet: String,
    pub hybrid: Hybrid,
    pub epithet: String,
    pub author: Option<String>,
    pub sp_qual: Option<SpeciesQualifier>,

    pub infrasp1: InfraspSlot,
    pub infrasp2: InfraspSlot,
    pub infrasp3: InfraspSlot,
    pub infrasp4: InfraspSlot,

    pub grex: Option<String>,
    pub cv_group: Option<String>,
    pub cultivar_epithet: Option<String>,
    pub pbr_name: bool,
    pub trade_name: Option<String>,
    pub trademark_symbol: TrademarkSymbol,

    /// Local CITES override; falls back to the owning genus's, which
    /// falls back to the family's (spec.md §4.2).
    pub cites: Option<Cites>,
    pub red_list: Option<RedList>,
    pub label_distribution: Option<String>,

    /// References into the `habit`/`color` lookup tables (SPEC_FULL.md
    /// §3 supplement, ported from `species_model.py`'s `habit`/
    /// `flower_color` relations).
    pub habit_id: Option<i64>,
    pub flower_color_id: Option<i64>,

    pub notes: Vec<Note>,
    pub pictures: Vec<Picture>,

    /// Derived, recomputed by `crate::history` before every commit
    /// (spec.md C7).
    pub full_name: String,
    pub full_sci_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesFields {
    pub genus_id: GenusId,
    pub genus_epithet: String,
    pub hybrid: Hybrid,
    pub epithet: String,
    pub author: Option<String>,
    pub sp_qual: Option<SpeciesQualifier>,
    pub infrasp1: InfraspSlot,
    pub infrasp2: InfraspSlot,
    pub infrasp3: InfraspSlot,
    pub infrasp4: InfraspSlot,
    pub grex: Option<String>,
    pub cv_group: Option<String>,
    pub cultivar_epithet: Option<String>,
    pub pbr_name: bool,
    pub trade_name: Option<String>,
    pub trademark_symbol: TrademarkSymbol,
    pub cites: Option<Cites>,
    pub red_list: Option<RedList>,
    pub label_distribution: Option<String>,
    pub habit_id: Option<i64>,
    pub flower_color_id: Option<i64>,
}

impl Species {
    pub fn create(fields: SpeciesFields) -> Result<Species> {
        let epithet = fields.epithet.trim().to_string();
        if epithet.is_empty() {
            return Err(BotanicError::validation("species epithet must not be empty"));
        }
        if fields.genus_id == 0 {
            return Err(BotanicError::validation(
                "species must belong to a genus (invariant 1)",
            ));
        }
        // invariant 3: infraspecific slots must be filled contiguously,
        // slot N requires slot N-1 to be set.
        let slots = [&fields.infrasp1, &fields.infrasp2, &fields.infrasp3, &fields.infrasp4];
        let mut seen_gap = false;
        for slot in slots {
            if !slot.is_set() {
                seen_gap = true;
            } else if seen_gap {
                return Err(BotanicError::validation(
                    "infraspecific slots must be filled contiguously (invariant 3)",
                ));
            }
        }
        // invariant 4: cultivar epithet and grex/cv_group are mutually
        // consistent with at least one infraspecific/cultivar marker when
        // a trade name is present.
        if fields.trade_name.is_some() && fields.cultivar_epithet.is_none() {
            return Err(BotanicError::validation(
                "a trade name requires a cultivar epithet (invariant 4)",
            ));
        }

        let mut species = Species {
            id: 0,
            genus_id: fields.genus_id,
            genus_epithet: fields.genus_epithet,
            hybrid: fields.hybrid,
            epithet,
            author: fields.author.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
            sp_qual: fields.sp_qual,
            infrasp1: fields.infrasp1,
            infrasp2: fields.infrasp2,
            infrasp3: fields.infrasp3,
            infrasp4: fields.infrasp4,
            grex: fields.grex,
            cv_group: fields.cv_group,
            cultivar_epithet: fields.cultivar_epithet,
            pbr_name: fields.pbr_name,
            trade_name: fields.trade_name,
            trademark_symbol: fields.trademark_symbol,
            cites: fields.cites,
            red_list: fields.red_list,
            label_distribution: fields.label_distribution,
            habit_id: fields.habit_id,
            flower_color_id: fields.flower_color_id,
            notes: Vec::new(),
            pictures: Vec::new(),
            full_name: String::new(),
            full_sci_name: String::new(),
        };
        species.recompute_full_names();
        Ok(species)
    }

    pub fn update(&self, patch: SpeciesFields) -> Result<Species> {
        let mut next = Species::create(patch)?;
        next.id = self.id;
        next.notes = self.notes.clone();
        next.pictures = self.pictures.clone();
        Ok(next)
    }

    /// Recompute `full_name`/`full_sci_name`, mirroring the pre-commit
    /// hook in spec.md C7. Both are plain text (no markup); they differ
    /// only in whether author citations are included (spec.md §3, §4.2,
    /// testable property §8.1).
    pub fn recompute_full_names(&mut self) {
        self.full_name = format_name(self, NameFlags { authors: false, markup: false, ..Default::default() });
        self.full_sci_name = format_name(self, NameFlags { authors: true, markup: false, ..Default::default() });
    }

    pub fn infraspecific_slots(&self) -> [Option<(InfraspRank, String, Option<String>)>; 4] {
        [
            as_slot(&self.infrasp1),
            as_slot(&self.infrasp2),
            as_slot(&self.infrasp3),
            as_slot(&self.infrasp4),
        ]
    }

    /// `infraspecific_rank` hybrid attribute: the lowest occupied rank
    /// that isn't `cv.` (spec.md §4.2).
    pub fn infraspecific_rank(&self) -> Option<InfraspRank> {
        [self.infrasp1.rank, self.infrasp2.rank, self.infrasp3.rank, self.infrasp4.rank]
            .into_iter()
            .filter(|r| r.is_occupied() && !matches!(r, InfraspRank::Cv))
            .max_by_key(|r| r.compare_rank())
    }

    /// `infraspecific_epithet` hybrid attribute: the epithet paired with
    /// `infraspecific_rank`.
    pub fn infraspecific_epithet(&self) -> Option<&str> {
        let rank = self.infraspecific_rank()?;
        [&self.infrasp1, &self.infrasp2, &self.infrasp3, &self.infrasp4]
            .into_iter()
            .find(|slot| slot.rank == rank)
            .map(|slot| slot.epithet.as_str())
    }

    /// `infraspecific_parts` hybrid attribute: the full "rank epithet
    /// rank epithet..." string across all four slots.
    pub fn infraspecific_parts(&self) -> String {
        [&self.infrasp1, &self.infrasp2, &self.infrasp3, &self.infrasp4]
            .into_iter()
            .filter(|slot| slot.is_set())
            .map(|slot| {
                if slot.rank.is_occupied() {
                    format!("{} {}", slot.rank.as_str(), slot.epithet)
                } else {
                    slot.epithet.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Setter side of `infraspecific_parts`: parse "rank epithet rank
    /// epithet..." back into the four slots, two tokens at a time.
    pub fn set_infraspecific_parts(&mut self, value: &str) -> Result<()> {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let mut slots = [
            InfraspSlot::default(),
            InfraspSlot::default(),
            InfraspSlot::default(),
            InfraspSlot::default(),
        ];
        let mut i = 0;
        let mut slot_idx = 0;
        while i < tokens.len() {
            if slot_idx >= 4 {
                return Err(BotanicError::validation(
                    "infraspecific_parts names more than four slots",
                ));
            }
            let rank = InfraspRank::parse(tokens[i])?;
            i += 1;
            let epithet = tokens
                .get(i)
                .ok_or_else(|| BotanicError::validation("infraspecific_parts missing epithet"))?;
            slots[slot_idx] = InfraspSlot {
                rank,
                epithet: epithet.to_string(),
                author: None,
            };
            i += 1;
            slot_idx += 1;
        }
        self.infrasp1 = slots[0].clone();
        self.infrasp2 = slots[1].clone();
        self.infrasp3 = slots[2].clone();
        self.infrasp4 = slots[3].clone();
        Ok(())
    }

    /// `active` hybrid attribute (spec.md §4.2, testable property §8.8):
    /// `true` if this species has no accessions, else `true` iff at
    /// least one of its accessions has a plant with `quantity > 0`.
    /// Accession/plant rows are owned by an external subsystem (spec.md
    /// §6); callers pass in the slice of rows they've already loaded.
    pub fn is_active(&self, accessions: &[AccessionRef], plants: &[PlantRef]) -> bool {
        let own_accessions: Vec<_> = accessions.iter().filter(|a| a.species_id == self.id).collect();
        if own_accessions.is_empty() {
            return true;
        }
        plants.iter().any(|p| {
            own_accessions.iter().any(|a| a.id == p.accession_id) && p.quantity > 0
        })
    }
}

fn as_slot(slot: &InfraspSlot) -> Option<(InfraspRank, String, Option<String>)> {
    if slot.is_set() {
        Some((slot.rank, slot.epithet.clone(), slot.author.clone()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_fields() -> SpeciesFields {
        SpeciesFields {
            genus_id: 1,
            genus_epithet: "Rosa".into(),
            epithet: "alba".into(),
            ..Default::default()
        }
    }

    #[test]
    fn create_requires_genus() {
        let mut fields = base_fields();
        fields.genus_id = 0;
        assert!(Species::create(fields).is_err());
    }

    #[test]
    fn create_rejects_gapped_infraspecific_slots() {
        let mut fields = base_fields();
        fields.infrasp2 = InfraspSlot {
            rank: InfraspRank::Var,
            epithet: "rubra".into(),
            author: None,
        };
        assert!(Species::create(fields).is_err());
    }

    #[test]
    fn create_accepts_contiguous_infraspecific_slots() {
        let mut fields = base_fields();
        fields.infrasp1 = InfraspSlot {
            rank: InfraspRank::Subsp,
            epithet: "maritima".into(),
            author: None,
        };
        assert!(Species::create(fields).is_ok());
    }

    #[test]
    fn trade_name_requires_cultivar_epithet() {
        let mut fields = base_fields();
        fields.trade_name = Some("FIRST LIGHT".into());
        assert!(Species::create(fields).is_err());
    }

    #[test]
    fn full_name_is_recomputed_on_create() {
        let species = Species::create(base_fields()).unwrap();
        assert_eq!(species.full_name, "Rosa alba");
    }

    #[test]
    fn full_sci_name_includes_author_full_name_does_not() {
        let mut fields = base_fields();
        fields.author = Some("L.".into());
        let species = Species::create(fields).unwrap();
        assert_eq!(species.full_name, "Rosa alba");
        assert_eq!(species.full_sci_name, "Rosa alba L.");
    }

    #[test]
    fn species_without_accessions_is_active() {
        let species = Species::create(base_fields()).unwrap();
        assert!(species.is_active(&[], &[]));
    }

    #[test]
    fn species_is_active_only_with_a_nonzero_quantity_plant() {
        let mut fields = base_fields();
        fields.genus_id = 1;
        let species = Species { id: 7, ..Species::create(fields).unwrap() };
        let accessions = vec![AccessionRef { id: 1, species_id: 7, code: "1999/0001".into() }];
        let empty_plants = vec![PlantRef { id: 1, accession_id: 1, quantity: 0 }];
        assert!(!species.is_active(&accessions, &empty_plants));

        let stocked_plants = vec![PlantRef { id: 1, accession_id: 1, quantity: 3 }];
        assert!(species.is_active(&accessions, &stocked_plants));
    }

    #[test]
    fn infraspecific_rank_picks_lowest_occupied_non_cv() {
        let mut fields = base_fields();
        fields.infrasp1 = InfraspSlot {
            rank: InfraspRank::Subsp,
            epithet: "maritima".into(),
            author: None,
        };
        fields.infrasp2 = InfraspSlot {
            rank: InfraspRank::Var,
            epithet: "rubra".into(),
            author: None,
        };
        let species = Species::create(fields).unwrap();
        assert_eq!(species.infraspecific_rank(), Some(InfraspRank::Var));
        assert_eq!(species.infraspecific_epithet(), Some("rubra"));
    }

    #[test]
    fn infraspecific_parts_round_trips_through_setter() {
        let mut species = Species::create(base_fields()).unwrap();
        species.set_infraspecific_parts("subsp. maritima var. rubra").unwrap();
        assert_eq!(species.infraspecific_parts(), "subsp. maritima var. rubra");
    }
}
