//! Error taxonomy for the botanic-collection core (spec.md §7).
//!
//! Every fallible operation in this crate returns one of the variants
//! below. `Parse` and `Validation` are reported synchronously with a
//! human-readable message; `Search` is what the evaluator and dispatcher
//! convert other failures into at their boundary (see `query::dispatch`);
//! `Database` wraps the underlying relational store.

use std::fmt;

/// The single error type returned by every public operation in this crate.
#[derive(Debug)]
pub enum BotanicError {
    /// Malformed query text, or reference to an unknown domain, column or
    /// function.
    Parse(String),

    /// A field was out of range, violated an enum, a length limit, or one
    /// of the invariants in spec.md §3 at commit time.
    Validation(String),

    /// A delete was refused because invariant 6 (no deleting a taxon that
    /// still has children which forbid cascade) would be violated.
    InUse(String),

    /// A semantic query error: a correlated subquery referencing an
    /// unrelated table, an aggregate used where a scalar is required, an
    /// unknown function, etc.
    Search(String),

    /// The underlying relational store is unavailable, or a query against
    /// it failed for reasons unrelated to validation.
    Database(sqlx::Error),
}

impl fmt::Display for BotanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotanicError::Parse(msg) => write!(f, "parse error: {msg}"),
            BotanicError::Validation(msg) => write!(f, "validation error: {msg}"),
            BotanicError::InUse(msg) => write!(f, "in use: {msg}"),
            BotanicError::Search(msg) => write!(f, "search error: {msg}"),
            BotanicError::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for BotanicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotanicError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for BotanicError {
    fn from(error: sqlx::Error) -> Self {
        BotanicError::Database(error)
    }
}

impl From<serde_json::Error> for BotanicError {
    fn from(error: serde_json::Error) -> Self {
        BotanicError::Validation(format!("malformed geojson: {error}"))
    }
}

impl BotanicError {
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        BotanicError::Parse(msg.into())
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        BotanicError::Validation(msg.into())
    }

    pub fn in_use<S: Into<String>>(msg: S) -> Self {
        BotanicError::InUse(msg.into())
    }

    pub fn search<S: Into<String>>(msg: S) -> Self {
        BotanicError::Search(msg.into())
    }

    /// True for the two error kinds spec.md §7 says must be reported
    /// synchronously rather than funneled through the dispatcher boundary.
    pub fn is_synchronous(&self) -> bool {
        matches!(self, BotanicError::Parse(_) | BotanicError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, BotanicError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_messages() {
        assert_eq!(
            BotanicError::parse("unknown domain 'xyz'").to_string(),
            "parse error: unknown domain 'xyz'"
        );
        assert_eq!(
            BotanicError::validation("epithet too long").to_string(),
            "validation error: epithet too long"
        );
        assert_eq!(
            BotanicError::in_use("family has genera").to_string(),
            "in use: family has genera"
        );
        assert_eq!(
            BotanicError::search("correlate on unrelated table").to_string(),
            "search error: correlate on unrelated table"
        );
    }

    #[test]
    fn synchronous_classification() {
        assert!(BotanicError::parse("x").is_synchronous());
        assert!(BotanicError::validation("x").is_synchronous());
        assert!(!BotanicError::in_use("x").is_synchronous());
        assert!(!BotanicError::search("x").is_synchronous());
    }

    #[test]
    fn source_present_only_for_database() {
        let db_err = BotanicError::Database(sqlx::Error::RowNotFound);
        assert!(db_err.source().is_some());
        assert!(BotanicError::validation("x").source().is_none());
    }
}
