//! Canonical species name formatting (C1).
//!
//! Grounded on `original_source/bauble/plugins/plants/species_model.py`:
//! `Species.str()` for the plain-text concatenation, and
//! `markup_italics()` / `_markup_complex_hyb()` / `_italicize_part()` for
//! the HTML-markup variant used by the search results view.

use crate::types::enums::{Hybrid, InfraspRank, TrademarkSymbol};
use crate::types::species::Species;
use regex::Regex;
use std::sync::OnceLock;

/// Zero-width space the original inserts between a hybrid marker and the
/// epithet it modifies, so that word-wrap never splits the two.
const ZWS: &str = "\u{200b}";

/// Where a leading/trailing qualifier in [`Qualification`] attaches
/// (spec.md §4.1 items 1 and 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualificationRank {
    Genus,
    Species,
}

/// A qualifier string to splice into the name, tagged with the rank it
/// qualifies so the formatter knows whether it's a leading or trailing
/// piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualification {
    pub rank: QualificationRank,
    pub text: String,
}

/// The §4.1/§6 public contract: every optional behaviour of
/// `format_name` is a bit the caller sets explicitly, so the function
/// stays a pure, fully-parameterised mapping from `(Species, flags)` to
/// a string.
#[derive(Debug, Clone, Default)]
pub struct NameFlags {
    /// Include `sp_author` and infraspecific-slot authors.
    pub authors: bool,
    /// Emit HTML `<i>…</i>` italics instead of plain text.
    pub markup: bool,
    /// Stop after the genus piece — the simpler Genus/Family rendering
    /// spec.md §4.1 mentions alongside the full Species one.
    pub genus: bool,
    /// Suppress the leading zero-width space normally prepended to the
    /// epithet when a hybrid marker precedes it.
    pub remove_zws: bool,
    pub qualification: Option<Qualification>,
    /// Search-result rendering prefers a plain uppercase trade name over
    /// the small-caps span used elsewhere (item 10).
    pub for_search_view: bool,
}

/// Build the canonical display name for a species (spec.md §4.1).
///
/// Pure function of `(species, flags)` — no I/O, no DB. `flags.markup`
/// selects HTML italics over plain text; `flags.authors` selects
/// whether author citations are included (`full_name` drops them,
/// `full_sci_name` keeps them — see `Species::recompute_full_names`).
pub fn format_name(species: &Species, flags: NameFlags) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(q) = &flags.qualification {
        if matches!(q.rank, QualificationRank::Genus) && !q.text.is_empty() {
            parts.push(q.text.clone());
        }
    }

    let genus_part = if flags.markup {
        format!("<i>{}</i>", species.genus_epithet)
    } else {
        species.genus_epithet.clone()
    };
    parts.push(genus_part);

    if flags.genus {
        return parts.join(" ").trim().to_string();
    }

    let mut sp_part = String::new();
    if !matches!(species.hybrid, Hybrid::None) {
        sp_part.push_str(species.hybrid.as_str());
        if !flags.remove_zws {
            sp_part.push_str(ZWS);
        }
    }
    sp_part.push_str(&species.epithet);
    parts.push(if flags.markup {
        wrap_italic_sp(&sp_part)
    } else {
        sp_part
    });

    if flags.authors {
        if let Some(author) = &species.author {
            if !author.is_empty() {
                parts.push(author.clone());
            }
        }
    }

    for slot in species.infraspecific_slots() {
        if let Some((rank, epithet, author)) = slot {
            if rank.is_occupied() || matches!(rank, InfraspRank::Cv) {
                parts.push(rank.as_str().to_string());
            }
            parts.push(if flags.markup {
                format!("<i>{epithet}</i>")
            } else {
                epithet.clone()
            });
            if flags.authors {
                if let Some(author) = author {
                    if !author.is_empty() {
                        parts.push(author.clone());
                    }
                }
            }
        }
    }

    if let Some(grex) = &species.grex {
        if !grex.is_empty() {
            parts.push(format!("{grex} Group"));
        }
    }

    if let Some(group) = &species.cv_group {
        if !group.is_empty() {
            if species.cultivar_epithet.is_some() {
                parts.push(format!("({group} Group)"));
            } else {
                parts.push(format!("{group} Group"));
            }
        }
    }

    if let Some(cultivar) = &species.cultivar_epithet {
        if !cultivar.is_empty() {
            if matches!(cultivar.as_str(), "cv." | "cvs.") {
                parts.push(cultivar.clone());
            } else {
                parts.push(format!("'{cultivar}'"));
            }
        }
    }

    if species.pbr_name {
        parts.push(if flags.markup {
            "<small>(PBR)</small>".to_string()
        } else {
            "(PBR)".to_string()
        });
    }

    if let Some(trade_name) = &species.trade_name {
        if !trade_name.is_empty() {
            let mark = match species.trademark_symbol {
                TrademarkSymbol::None => String::new(),
                other => other.as_str().to_string(),
            };
            let name = if flags.markup && !flags.for_search_view {
                format!("<span class=\"small-caps\">{trade_name}</span>")
            } else {
                trade_name.to_uppercase()
            };
            parts.push(format!("{name}{mark}"));
        }
    }

    if let Some(q) = &flags.qualification {
        if matches!(q.rank, QualificationRank::Species) && !q.text.is_empty() {
            parts.push(format!("({})", q.text));
        }
    }

    if let Some(qualifier) = &species.sp_qual {
        if !qualifier.as_str().is_empty() {
            parts.push(qualifier.as_str().to_string());
        }
    }

    parts.join(" ").trim().to_string()
}

fn wrap_italic_sp(sp_part: &str) -> String {
    if let Some(stripped) = sp_part.strip_prefix(ZWS) {
        format!("{ZWS}{}", markup_italics(stripped))
    } else {
        markup_italics(sp_part)
    }
}

fn simple_sp() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z-]+$").unwrap())
}
fn simple_hyb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z-]+( \u{d7} [a-z-]+)*$").unwrap())
}
fn simple_cv() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^'[^\u{d7}'"]+'$"#).unwrap())
}
fn simple_infra_hyb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\u{d7}[a-z-]+$").unwrap())
}
fn simple_prov() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^sp\. \([^\u{d7}]+\)$").unwrap())
}
fn simple_desc() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\([^\u{d7}]*\)$").unwrap())
}
fn complex_desc() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z-]+ \([^\u{d7}]+\)$").unwrap())
}
fn complex_hyb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(.+\u{d7}.+\)").unwrap())
}
fn other_hyb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.+ \u{d7} .+$").unwrap())
}

/// Port of `markup_italics()`: dispatches on the shape of `string` and
/// wraps the taxonomic part(s) of it in `<i>…</i>`.
pub fn markup_italics(string: &str) -> String {
    let (start, trimmed) = if let Some(rest) = string.strip_prefix(ZWS) {
        (ZWS, rest.trim_matches(|c| c == '\u{200b}'))
    } else {
        ("", string)
    };
    let s = trimmed.trim();

    let result = if s == "sp." {
        s.to_string()
    } else if simple_sp().is_match(s) {
        format!("<i>{s}</i>")
    } else if simple_hyb().is_match(s) {
        format!("<i>{s}</i>").replace(" \u{d7} ", "</i> \u{d7} <i>")
    } else if simple_cv().is_match(s) {
        s.to_string()
    } else if simple_infra_hyb().is_match(s) {
        let mut chars = s.chars();
        let first = chars.next().unwrap();
        format!("{first}<i>{}</i>", chars.as_str())
    } else if simple_prov().is_match(s) {
        s.to_string()
    } else if simple_desc().is_match(s) {
        s.to_string()
    } else if complex_desc().is_match(s) {
        split_once_markup(s)
    } else if complex_hyb().is_match(s) {
        markup_complex_hyb(s)
    } else if other_hyb().is_match(s) {
        s.split(" \u{d7} ")
            .map(|part| markup_italics(part.trim()))
            .collect::<Vec<_>>()
            .join(" \u{d7} ")
    } else if s.contains(' ') {
        split_once_markup(s)
    } else {
        s.to_string()
    };

    format!("{start}{}", result.trim())
}

fn split_once_markup(s: &str) -> String {
    match s.split_once(' ') {
        Some((head, tail)) => format!("{} {}", markup_italics(head), markup_italics(tail)),
        None => markup_italics(s),
    }
}

/// Port of `_markup_complex_hyb()`: peels bracket-balanced groups off a
/// `×`-separated string and re-italicises each resulting part.
fn markup_complex_hyb(string: &str) -> String {
    let parts: Vec<&str> = string.split('\u{d7}').collect();
    let len_parts = parts.len();
    let mut left = 0usize;
    let mut right = 0usize;
    let mut find = 0i64;
    let mut found = 0i64;
    let mut result: Vec<String> = Vec::new();

    for (i, raw) in parts.iter().enumerate() {
        let prt = raw.trim();
        if prt.starts_with('(') {
            find += prt.chars().take_while(|&c| c == '(').count() as i64;
            if left == 0 {
                left = i + 1;
            }
        }
        if prt.ends_with(')') {
            found += prt.chars().rev().take_while(|&c| c == ')').count() as i64;
            if found == find {
                right = i + 1;
            }
        }
        if right != 0 {
            let joined = parts[left - 1..right]
                .join("\u{d7}")
                .trim()
                .replace("  ", " \u{d7} ");
            result.push(joined);
            left = 0;
            right = 0;
            find = 0;
            found = 0;
        } else if left == 0 && right == 0 && find == 0 && found == 0 {
            result.push(prt.to_string());
        } else if i == len_parts - 1 {
            let joined = parts[left - 1..]
                .join("\u{d7}")
                .trim()
                .replace("  ", " \u{d7} ");
            result.push(joined);
        }
    }

    result
        .iter()
        .map(|p| markup_italics(p))
        .collect::<Vec<_>>()
        .join(" \u{d7} ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_species_is_italicised() {
        assert_eq!(markup_italics("alba"), "<i>alba</i>");
    }

    #[test]
    fn simple_hybrid_splits_each_epithet() {
        assert_eq!(
            markup_italics("alba \u{d7} nigra"),
            "<i>alba</i> \u{d7} <i>nigra</i>"
        );
    }

    #[test]
    fn cultivar_is_left_alone() {
        assert_eq!(markup_italics("'Big Red'"), "'Big Red'");
    }

    #[test]
    fn infraspecific_hybrid_marker_excluded_from_italics() {
        assert_eq!(markup_italics("\u{d7}alba"), "\u{d7}<i>alba</i>");
    }

    #[test]
    fn bare_sp_is_unchanged() {
        assert_eq!(markup_italics("sp."), "sp.");
    }

    #[test]
    fn descriptor_species_recurses_on_both_parts() {
        assert_eq!(markup_italics("alba (red form)"), "<i>alba</i> (red form)");
    }

    #[test]
    fn zero_width_space_prefix_is_preserved() {
        assert_eq!(markup_italics("\u{200b}alba"), "\u{200b}<i>alba</i>");
    }
}
