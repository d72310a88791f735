//! Caller-supplied hooks the core invokes synchronously (spec.md §6
//! "Consumed from collaborators").
//!
//! Grounded on the callback-closure style `history::rebuild_all_names`
//! already uses (`on_progress: impl FnMut(RebuildProgress)`); these
//! traits give that same shape a name so embedding applications can
//! implement them once (e.g. a GTK dialog) instead of writing a new
//! closure at every call site.

use crate::history::RebuildProgress;

/// Asked before running a search whose value-list is short enough that
/// it risks scanning the whole table for little benefit (spec.md §4.5.8
/// "small-value guard"). Returning `false` aborts the search.
pub trait ConfirmationCallback {
    fn confirm(&mut self, query_text: &str) -> bool;
}

/// Always confirms; the default for callers (and tests) that don't
/// want to gate on the small-value guard.
pub struct AlwaysConfirm;

impl ConfirmationCallback for AlwaysConfirm {
    fn confirm(&mut self, _query_text: &str) -> bool {
        true
    }
}

/// Receives progress updates from long-running batch operations, e.g.
/// `history::rebuild_all_names`.
pub trait ProgressSink {
    fn on_progress(&mut self, progress: RebuildProgress);
}

/// Adapts any `FnMut(RebuildProgress)` closure into a [`ProgressSink`].
impl<F: FnMut(RebuildProgress)> ProgressSink for F {
    fn on_progress(&mut self, progress: RebuildProgress) {
        self(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_confirm_returns_true() {
        let mut confirm = AlwaysConfirm;
        assert!(confirm.confirm("ab"));
    }

    #[test]
    fn closure_adapts_to_progress_sink() {
        let mut calls = 0;
        let mut sink = |_p: RebuildProgress| calls += 1;
        sink.on_progress(RebuildProgress { done: 1, total: 10 });
        assert_eq!(calls, 1);
    }
}
