//! Enumerations shared by the domain entities (spec.md §3).
//!
//! Most of these map directly onto SQLite `TEXT` columns constrained by a
//! `CHECK` in the migrations (see `migrations::schema`). Parsing an
//! unrecognised value is a [`BotanicError::Validation`], matching the
//! decision in SPEC_FULL.md §4.2: out-of-range assignment is an error, not
//! a silent no-op.

use crate::error::BotanicError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `Family.qualifier` / `Genus.qualifier`.
///
/// Represented as the empty string for "no qualifier", never `None` —
/// SPEC_FULL.md §4.2 resolves the open question in spec.md §9 this way,
/// matching the original implementation's SQLite-driven choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualifier {
    None,
    SLat,
    SStr,
}

impl Qualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::None => "",
            Qualifier::SLat => "s. lat.",
            Qualifier::SStr => "s. str.",
        }
    }

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value {
            "" => Ok(Qualifier::None),
            "s. lat." => Ok(Qualifier::SLat),
            "s. str." => Ok(Qualifier::SStr),
            other => Err(BotanicError::validation(format!(
                "invalid qualifier: {other:?}"
            ))),
        }
    }
}

impl Default for Qualifier {
    fn default() -> Self {
        Qualifier::None
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `×` or `+` hybrid marker, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hybrid {
    None,
    Multiply,
    Graft,
}

impl Hybrid {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hybrid::None => "",
            Hybrid::Multiply => "\u{d7}",
            Hybrid::Graft => "+",
        }
    }

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value {
            "" => Ok(Hybrid::None),
            "\u{d7}" | "x" | "X" => Ok(Hybrid::Multiply),
            "+" => Ok(Hybrid::Graft),
            other => Err(BotanicError::validation(format!(
                "invalid hybrid marker: {other:?}"
            ))),
        }
    }
}

impl Default for Hybrid {
    fn default() -> Self {
        Hybrid::None
    }
}

/// `Species.sp_qual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeciesQualifier {
    None,
    Agg,
    SLat,
    SStr,
}

impl SpeciesQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesQualifier::None => "",
            SpeciesQualifier::Agg => "agg.",
            SpeciesQualifier::SLat => "s. lat.",
            SpeciesQualifier::SStr => "s. str.",
        }
    }

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value {
            "" => Ok(SpeciesQualifier::None),
            "agg." => Ok(SpeciesQualifier::Agg),
            "s. lat." => Ok(SpeciesQualifier::SLat),
            "s. str." => Ok(SpeciesQualifier::SStr),
            other => Err(BotanicError::validation(format!(
                "invalid species qualifier: {other:?}"
            ))),
        }
    }
}

impl Default for SpeciesQualifier {
    fn default() -> Self {
        SpeciesQualifier::None
    }
}

/// Infraspecific rank, ordered per the comparison table in spec.md §4.2.
/// `"cv."` is accepted for storage but is ignored when deriving
/// `infraspecific_rank` (the lowest non-"cv." rank wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfraspRank {
    None,
    Subsp,
    Var,
    Subvar,
    F,
    Subf,
    Cv,
}

impl InfraspRank {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfraspRank::None => "",
            InfraspRank::Subsp => "subsp.",
            InfraspRank::Var => "var.",
            InfraspRank::Subvar => "subvar.",
            InfraspRank::F => "f.",
            InfraspRank::Subf => "subf.",
            InfraspRank::Cv => "cv.",
        }
    }

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value {
            "" => Ok(InfraspRank::None),
            "subsp." => Ok(InfraspRank::Subsp),
            "var." => Ok(InfraspRank::Var),
            "subvar." => Ok(InfraspRank::Subvar),
            "f." => Ok(InfraspRank::F),
            "subf." => Ok(InfraspRank::Subf),
            "cv." => Ok(InfraspRank::Cv),
            other => Err(BotanicError::validation(format!(
                "invalid infraspecific rank: {other:?}"
            ))),
        }
    }

    /// Position in the rank table of spec.md §4.2. Lower sorts higher
    /// (closer to `familia`).
    pub fn compare_rank(&self) -> u32 {
        match self {
            InfraspRank::None => 70,
            InfraspRank::Subsp => 80,
            InfraspRank::Var => 90,
            InfraspRank::Subvar => 100,
            InfraspRank::F => 110,
            InfraspRank::Subf => 120,
            InfraspRank::Cv => u32::MAX, // excluded from infraspecific_rank derivation
        }
    }

    pub fn is_occupied(&self) -> bool {
        !matches!(self, InfraspRank::None)
    }
}

impl Default for InfraspRank {
    fn default() -> Self {
        InfraspRank::None
    }
}

/// Taxon rank, used by the shared rank-comparison table (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxonRank {
    Familia = 1,
    Subfamilia = 10,
    Tribus = 20,
    Subtribus = 30,
    Genus = 40,
    Subgenus = 50,
    Species = 60,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cites {
    I,
    II,
    III,
}

impl Cites {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cites::I => "I",
            Cites::II => "II",
            Cites::III => "III",
        }
    }

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value {
            "I" => Ok(Cites::I),
            "II" => Ok(Cites::II),
            "III" => Ok(Cites::III),
            other => Err(BotanicError::validation(format!(
                "invalid CITES appendix: {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedList {
    Ex,
    Ew,
    Re,
    Cr,
    En,
    Vu,
    Nt,
    Lc,
    Dd,
    Ne,
}

impl RedList {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedList::Ex => "EX",
            RedList::Ew => "EW",
            RedList::Re => "RE",
            RedList::Cr => "CR",
            RedList::En => "EN",
            RedList::Vu => "VU",
            RedList::Nt => "NT",
            RedList::Lc => "LC",
            RedList::Dd => "DD",
            RedList::Ne => "NE",
        }
    }

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value {
            "EX" => Ok(RedList::Ex),
            "EW" => Ok(RedList::Ew),
            "RE" => Ok(RedList::Re),
            "CR" => Ok(RedList::Cr),
            "EN" => Ok(RedList::En),
            "VU" => Ok(RedList::Vu),
            "NT" => Ok(RedList::Nt),
            "LC" => Ok(RedList::Lc),
            "DD" => Ok(RedList::Dd),
            "NE" => Ok(RedList::Ne),
            other => Err(BotanicError::validation(format!(
                "invalid red list category: {other:?}"
            ))),
        }
    }

    /// Whether this category is considered threatened (used by the
    /// conservation helpers in `crate::conservation`).
    pub fn is_threatened(&self) -> bool {
        matches!(
            self,
            RedList::Vu | RedList::En | RedList::Cr | RedList::Ew | RedList::Ex
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrademarkSymbol {
    None,
    Tm,
    Reg,
}

impl TrademarkSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrademarkSymbol::None => "",
            TrademarkSymbol::Tm => "\u{2122}",
            TrademarkSymbol::Reg => "\u{ae}",
        }
    }

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value {
            "" => Ok(TrademarkSymbol::None),
            "\u{2122}" => Ok(TrademarkSymbol::Tm),
            "\u{ae}" => Ok(TrademarkSymbol::Reg),
            other => Err(BotanicError::validation(format!(
                "invalid trademark symbol: {other:?}"
            ))),
        }
    }
}

impl Default for TrademarkSymbol {
    fn default() -> Self {
        TrademarkSymbol::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifier_round_trips() {
        for q in [Qualifier::None, Qualifier::SLat, Qualifier::SStr] {
            assert_eq!(Qualifier::parse(q.as_str()).unwrap().as_str(), q.as_str());
        }
    }

    #[test]
    fn qualifier_rejects_garbage() {
        assert!(Qualifier::parse("bogus").is_err());
    }

    #[test]
    fn infrasp_rank_ordering_matches_table() {
        assert!(InfraspRank::None.compare_rank() < InfraspRank::Subsp.compare_rank());
        assert!(InfraspRank::Subsp.compare_rank() < InfraspRank::Var.compare_rank());
        assert!(InfraspRank::Var.compare_rank() < InfraspRank::Subvar.compare_rank());
        assert!(InfraspRank::Subvar.compare_rank() < InfraspRank::F.compare_rank());
        assert!(InfraspRank::F.compare_rank() < InfraspRank::Subf.compare_rank());
    }

    #[test]
    fn taxon_rank_ordering() {
        assert!(TaxonRank::Familia < TaxonRank::Genus);
        assert!(TaxonRank::Genus < TaxonRank::Species);
    }

    #[test]
    fn red_list_threatened() {
        assert!(RedList::Cr.is_threatened());
        assert!(!RedList::Lc.is_threatened());
    }
}
