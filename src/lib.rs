//! Taxonomic domain model and search engine core for a desktop
//! botanic-collection manager.
//!
//! The crate is organised the way the domain itself is: entity types
//! and their validation rules under [`types`], persistence under
//! [`queries`]/[`migrations`], the text-search dialects under
//! [`query`], and the cross-cutting C1/C3/C7 algorithms (name
//! formatting, geography graph walks, history/full-name rebuild) each
//! in their own top-level module.

pub mod callbacks;
pub mod conservation;
pub mod error;
pub mod graph;
pub mod history;
pub mod map;
pub mod migrations;
pub mod name;
pub mod preferences;
pub mod query;
pub mod queries;
pub mod types;

pub use callbacks::{AlwaysConfirm, ConfirmationCallback, ProgressSink};
pub use error::{BotanicError, Result};
pub use name::format_name;
pub use preferences::Preferences;

use sqlx::SqlitePool;

/// Open (and migrate) a SQLite store at `path`, or `:memory:` for an
/// ephemeral one. Thin convenience wrapper; callers needing pool
/// tuning should build their own `SqlitePool` and call
/// [`migrations::run_migrations`] directly.
pub async fn open(path: &str) -> Result<SqlitePool> {
    let url = if path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{path}?mode=rwc")
    };
    let pool = SqlitePool::connect(&url).await?;
    migrations::run_migrations(&pool).await?;
    Ok(pool)
}

/// Run a search and return matching row ids (spec.md §6 "search(query
/// text, session) → list<record>"; resolving ids into full records is
/// left to `queries::{family,genus,species}::get`, which callers
/// already have for single-record loads).
pub async fn search(
    pool: &SqlitePool,
    query_text: &str,
    preferences: &Preferences,
    confirm: &mut dyn ConfirmationCallback,
) -> Result<Vec<i64>> {
    queries::search::search(pool, query_text, preferences.return_accepted, confirm).await
}
