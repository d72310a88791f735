//! `Genus` entity (spec.md §3, §4.2). Grounded on
//! `original_source/bauble/plugins/plants/genus.py`.

use crate::error::{BotanicError, Result};
use crate::types::enums::{Cites, Hybrid, Qualifier};
use crate::types::family::{Family, FamilyId};
use crate::types::note::Note;
use serde::{Deserialize, Serialize};

pub type GenusId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genus {
    pub id: GenusId,
    pub family_id: FamilyId,
    pub epithet: String,
    pub hybrid: Hybrid,
    pub qualifier: Qualifier,
    pub author: Option<String>,
    /// Local CITES override; falls back to the owning family's when unset
    /// (spec.md §4.2 "Analogous hybrids on Genus").
    pub cites: Option<Cites>,
    pub suprageneric: Option<String>,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Default)]
pub struct GenusFields {
    pub family_id: FamilyId,
    pub epithet: String,
    pub hybrid: Hybrid,
    pub qualifier: Qualifier,
    pub author: Option<String>,
    pub cites: Option<Cites>,
    pub suprageneric: Option<String>,
}

impl Genus {
    pub fn create(fields: GenusFields) -> Result<Genus> {
        let epithet = fields.epithet.trim().to_string();
        if epithet.is_empty() {
            return Err(BotanicError::validation("genus epithet must not be empty"));
        }
        if epithet.chars().count() > 64 {
            return Err(BotanicError::validation(
                "genus epithet must be 64 characters or fewer",
            ));
        }
        if fields.family_id == 0 {
            return Err(BotanicError::validation(
                "genus must belong to a family (invariant 1)",
            ));
        }
        let author = fields.author.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

        Ok(Genus {
            id: 0,
            family_id: fields.family_id,
            epithet,
            hybrid: fields.hybrid,
            qualifier: fields.qualifier,
            author,
            cites: fields.cites,
            suprageneric: fields.suprageneric,
            notes: Vec::new(),
        })
    }

    pub fn update(&self, patch: GenusFields) -> Result<Genus> {
        let mut next = Genus::create(patch)?;
        next.id = self.id;
        next.notes = self.notes.clone();
        Ok(next)
    }

    /// `cites` hybrid attribute: local override, else the owning family's
    /// (spec.md §4.2).
    pub fn cites(&self, family: &Family) -> Option<Cites> {
        self.cites.or_else(|| family.cites())
    }

    pub fn markup(&self) -> String {
        let mut s = String::new();
        if !matches!(self.hybrid, Hybrid::None) {
            s.push_str(self.hybrid.as_str());
            s.push(' ');
        }
        s.push_str(&format!("<i>{}</i>", self.epithet));
        s
    }
}

impl std::fmt::Display for Genus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !matches!(self.hybrid, Hybrid::None) {
            write!(f, "{} ", self.hybrid.as_str())?;
        }
        write!(f, "{}", self.epithet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::family::FamilyFields;

    fn fields(epithet: &str, family_id: FamilyId) -> GenusFields {
        GenusFields {
            family_id,
            epithet: epithet.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_requires_family() {
        assert!(Genus::create(fields("Rosa", 0)).is_err());
    }

    #[test]
    fn create_validates_epithet() {
        assert!(Genus::create(fields("", 1)).is_err());
        assert!(Genus::create(fields("Rosa", 1)).is_ok());
    }

    #[test]
    fn cites_falls_back_to_family() {
        let mut family = Family::create(FamilyFields {
            epithet: "Rosaceae".into(),
            ..Default::default()
        })
        .unwrap();
        family.cites = Some(Cites::II);
        let genus = Genus::create(fields("Rosa", 1)).unwrap();
        assert_eq!(genus.cites(&family), Some(Cites::II));
    }

    #[test]
    fn cites_local_override_wins() {
        let family = Family::create(FamilyFields {
            epithet: "Rosaceae".into(),
            ..Default::default()
        })
        .unwrap();
        let mut genus = Genus::create(fields("Rosa", 1)).unwrap();
        genus.cites = Some(Cites::I);
        assert_eq!(genus.cites(&family), Some(Cites::I));
    }

    #[test]
    fn markup_italicises_epithet_and_keeps_hybrid_marker() {
        let mut genus = Genus::create(fields("Rosa", 1)).unwrap();
        genus.hybrid = Hybrid::Multiply;
        assert_eq!(genus.markup(), "\u{d7} <i>Rosa</i>");
    }
}
