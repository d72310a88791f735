//! Notes and pictures, owned by Family/Genus/Species (spec.md §3: "Owns
//! notes"). Grounded on the original's `db.WithNotes` mixin
//! (`family.py`, `genus.py`, `species_model.py` all derive from it) and
//! the `*_note` / `*_picture` tables named in spec.md §6.

use serde::{Deserialize, Serialize};

pub type NoteId = i64;

/// A single note attached to a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub category: Option<String>,
    pub note: String,
    pub date: Option<chrono::NaiveDate>,
    pub user: Option<String>,
}

impl Note {
    pub fn new(note: impl Into<String>) -> Self {
        Note {
            id: 0,
            category: None,
            note: note.into(),
            date: None,
            user: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

pub type PictureId = i64;

/// A picture attached to a taxon (or, transitively, to a plant beneath an
/// accession — see `Species::pictures` in spec.md §4.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: PictureId,
    pub path: String,
    pub category: Option<String>,
}

/// Find the first note whose category matches (case-insensitively),
/// mirroring `Species.condition` in `species_model.py`.
pub fn first_note_with_category<'a>(
    notes: &'a [Note],
    category: &str,
) -> Option<&'a Note> {
    notes
        .iter()
        .find(|n| n.category.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(category)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_note_by_category_case_insensitively() {
        let notes = vec![
            Note::new("native here").with_category("Condition"),
            Note::new("unrelated").with_category("General"),
        ];
        let found = first_note_with_category(&notes, "condition").unwrap();
        assert_eq!(found.note, "native here");
    }

    #[test]
    fn no_match_returns_none() {
        let notes = vec![Note::new("x").with_category("General")];
        assert!(first_note_with_category(&notes, "condition").is_none());
    }
}
