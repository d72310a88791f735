//! History/event bus (C7): recomputes derived fields before commit and
//! records an append-only audit trail.
//!
//! Grounded on `update_all_full_names_task()` in
//! `original_source/bauble/plugins/plants/species_model.py` (the
//! 5%-chunk progress-yielding batch rebuild) and on the
//! `before_insert`/`before_update` listeners in `geography.py` that
//! recompute `approx_area`.

use crate::types::species::Species;
use serde::{Deserialize, Serialize};

pub type HistoryId = i64;

/// What changed, in one `History` row. Append-only: rows are never
/// updated or deleted (spec.md §4.7 "append-only diff history").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub table_name: String,
    pub row_id: i64,
    pub operation: Operation,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub timestamp: chrono::NaiveDateTime,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Recompute `full_name`/`full_sci_name` and emit exactly one
/// `HistoryRecord` for an `accepted_id` reassignment, per the Open
/// Question resolution in SPEC_FULL.md §4.3: one record per assignment,
/// not the two the ORM-event-driven original would emit, since this
/// bus is invoked explicitly rather than via SQLAlchemy events.
pub fn record_accepted_reassignment(
    table_name: &str,
    row_id: i64,
    old_accepted: Option<i64>,
    new_accepted: Option<i64>,
    timestamp: chrono::NaiveDateTime,
    user: Option<String>,
) -> HistoryRecord {
    HistoryRecord {
        id: 0,
        table_name: table_name.to_string(),
        row_id,
        operation: Operation::Update,
        field: Some("accepted_id".to_string()),
        old_value: old_accepted.map(|v| v.to_string()),
        new_value: new_accepted.map(|v| v.to_string()),
        timestamp,
        user,
    }
}

/// Pre-commit hook: recompute every species' `full_name`/`full_sci_name`
/// in place. Call before handing a changed `Species` to the persistence
/// layer (spec.md C7 "recomputing derived fields").
pub fn recompute_before_commit(species: &mut Species) {
    species.recompute_full_names();
}

/// Cooperative-cancellation flag threaded through `rebuild_all_names`,
/// mirroring the original's `pb_set_fraction`/task-cancel machinery.
#[derive(Debug, Default)]
pub struct CancelFlag(std::sync::atomic::AtomicBool);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag(std::sync::atomic::AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::Relaxed)
    }
}

/// Progress reported by `rebuild_all_names` at each 5%-sized chunk.
pub struct RebuildProgress {
    pub done: usize,
    pub total: usize,
}

/// Batch-rebuild `full_name`/`full_sci_name` across every species,
/// yielding progress every 5% of the total (or every row, if fewer than
/// 20 total) and stopping early if `cancel` has been set.
///
/// `on_progress` is called synchronously; callers driving a progress bar
/// should yield to their own event loop inside the callback as the
/// original does inside its generator.
pub fn rebuild_all_names(
    species: &mut [Species],
    cancel: &CancelFlag,
    mut on_progress: impl FnMut(RebuildProgress),
) {
    let total = species.len();
    if total == 0 {
        return;
    }
    let chunk = std::cmp::max(total / 20, 1);
    for (done, sp) in species.iter_mut().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        sp.recompute_full_names();
        if done % chunk == 0 {
            on_progress(RebuildProgress { done, total });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::species::SpeciesFields;

    fn sample_species() -> Species {
        Species::create(SpeciesFields {
            genus_id: 1,
            genus_epithet: "Rosa".into(),
            epithet: "alba".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn reassignment_produces_single_record() {
        let record = record_accepted_reassignment(
            "species",
            7,
            Some(3),
            Some(9),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            None,
        );
        assert_eq!(record.old_value.as_deref(), Some("3"));
        assert_eq!(record.new_value.as_deref(), Some("9"));
        assert_eq!(record.operation, Operation::Update);
    }

    #[test]
    fn rebuild_all_names_recomputes_every_row() {
        let mut species = vec![sample_species(), sample_species()];
        species[0].full_name.clear();
        let cancel = CancelFlag::new();
        let mut calls = 0;
        rebuild_all_names(&mut species, &cancel, |_| calls += 1);
        assert!(!species[0].full_name.is_empty());
        assert!(calls >= 1);
    }

    #[test]
    fn cancel_flag_stops_the_rebuild_early() {
        let mut species: Vec<Species> = (0..40).map(|_| sample_species()).collect();
        for sp in &mut species {
            sp.full_name.clear();
        }
        let cancel = CancelFlag::new();
        cancel.cancel();
        rebuild_all_names(&mut species, &cancel, |_| {});
        assert!(species.iter().all(|sp| sp.full_name.is_empty()));
    }
}
