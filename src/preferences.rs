//! User-configurable search/display preferences (spec.md §6 "Consumed
//! from collaborators").
//!
//! Grounded on the `serde`-derived config structs in
//! `src/contextlite.rs`/`src/conservation.rs` of the teacher, which
//! (de)serialise plain settings structs rather than reading a `TOML`
//! file directly — this crate keeps that shape; loading the result
//! from disk/IPC is the embedding application's job.

use serde::{Deserialize, Serialize};

/// One caller-defined web button shown alongside a search result
/// (spec.md §6), e.g. a link out to a taxonomic registry for the
/// currently selected name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebButtonDef {
    pub label: String,
    /// URL template; `{name}` is substituted with the result's display
    /// name by the caller before opening it.
    pub url_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether a search that resolves a synonym should also return its
    /// accepted name (and vice versa). See spec.md §4.5.9.
    #[serde(default = "default_true")]
    pub return_accepted: bool,

    /// Whether inactive (dead/removed) accessions are excluded from
    /// search results by default.
    #[serde(default = "default_true")]
    pub exclude_inactive: bool,

    /// Sort search results by full taxon name rather than by table
    /// insertion order.
    #[serde(default = "default_true")]
    pub sort_by_taxon: bool,

    /// Render distribution maps centred on the Pacific (date line at
    /// the centre) rather than the Greenwich meridian.
    #[serde(default)]
    pub pacific_centric: bool,

    #[serde(default)]
    pub web_buttons: Vec<WebButtonDef>,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            return_accepted: true,
            exclude_inactive: true,
            sort_by_taxon: true,
            pacific_centric: false,
            web_buttons: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_defaults() {
        let prefs = Preferences::default();
        assert!(prefs.return_accepted);
        assert!(prefs.exclude_inactive);
        assert!(prefs.sort_by_taxon);
        assert!(!prefs.pacific_centric);
        assert!(prefs.web_buttons.is_empty());
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"pacific_centric": true}"#).unwrap();
        assert!(prefs.pacific_centric);
        assert!(prefs.return_accepted);
    }
}
