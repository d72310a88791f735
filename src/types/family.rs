//! `Family` entity (spec.md §3, §4.2). Grounded on
//! `original_source/bauble/plugins/plants/family.py`.

use crate::error::{BotanicError, Result};
use crate::types::enums::{Cites, Qualifier};
use crate::types::note::Note;
use serde::{Deserialize, Serialize};

pub type FamilyId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    pub epithet: String,
    pub qualifier: Qualifier,
    pub cites: Option<Cites>,
    pub author: Option<String>,
    pub notes: Vec<Note>,
}

/// Fields accepted by `create`/`update` (spec.md §4.2). Kept separate from
/// `Family` so callers can't set `id` or `notes` through the validated
/// entry points.
#[derive(Debug, Clone, Default)]
pub struct FamilyFields {
    pub epithet: String,
    pub qualifier: Qualifier,
    pub cites: Option<Cites>,
    pub author: Option<String>,
}

impl Family {
    /// Validate and construct a new `Family` (unsaved: `id == 0`).
    ///
    /// Applies the field validators named in spec.md §4.2: strips
    /// strings, enforces the epithet's non-empty/<=45 constraint.
    pub fn create(fields: FamilyFields) -> Result<Family> {
        let epithet = fields.epithet.trim().to_string();
        if epithet.is_empty() {
            return Err(BotanicError::validation("family epithet must not be empty"));
        }
        if epithet.chars().count() > 45 {
            return Err(BotanicError::validation(
                "family epithet must be 45 characters or fewer",
            ));
        }
        let author = fields.author.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

        Ok(Family {
            id: 0,
            epithet,
            qualifier: fields.qualifier,
            cites: fields.cites,
            author,
            notes: Vec::new(),
        })
    }

    /// Apply a patch, re-running the same validators (spec.md §4.2).
    pub fn update(&self, patch: FamilyFields) -> Result<Family> {
        let mut next = Family::create(patch)?;
        next.id = self.id;
        next.notes = self.notes.clone();
        Ok(next)
    }

    /// `cites` is a plain stored field on Family (the root of the
    /// inheritance chain in spec.md §4.2); nothing to inherit from.
    pub fn cites(&self) -> Option<Cites> {
        self.cites
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.epithet)?;
        if !matches!(self.qualifier, Qualifier::None) {
            write!(f, " {}", self.qualifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(epithet: &str) -> FamilyFields {
        FamilyFields {
            epithet: epithet.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_strips_and_validates_epithet() {
        let family = Family::create(fields("  Rosaceae  ")).unwrap();
        assert_eq!(family.epithet, "Rosaceae");
    }

    #[test]
    fn create_rejects_empty_epithet() {
        assert!(Family::create(fields("   ")).is_err());
    }

    #[test]
    fn create_rejects_overlong_epithet() {
        let long = "A".repeat(46);
        assert!(Family::create(fields(&long)).is_err());
    }

    #[test]
    fn create_accepts_45_char_epithet() {
        let exact = "A".repeat(45);
        assert!(Family::create(fields(&exact)).is_ok());
    }

    #[test]
    fn display_includes_qualifier() {
        let mut f = Family::create(fields("Rosaceae")).unwrap();
        f.qualifier = Qualifier::SLat;
        assert_eq!(f.to_string(), "Rosaceae s. lat.");
    }

    #[test]
    fn update_preserves_id_and_notes() {
        let mut f = Family::create(fields("Rosaceae")).unwrap();
        f.id = 7;
        f.notes.push(Note::new("x"));
        let updated = f.update(fields("Fabaceae")).unwrap();
        assert_eq!(updated.id, 7);
        assert_eq!(updated.notes.len(), 1);
        assert_eq!(updated.epithet, "Fabaceae");
    }
}
