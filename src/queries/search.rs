//! Executes a dispatched search against the store (spec.md §4.6
//! "Executing the compiled SQL against the store is the caller's job").
//!
//! `query::dispatch::Dispatcher` only decides which strategies fire and
//! what SQL they produce; this module runs that SQL, unions the results
//! of every strategy that fired (first-seen order, per spec.md §4.6
//! step 4), and layers synonym augmentation (§4.5.9) on top when the
//! search targets the `species` domain.

use crate::callbacks::ConfirmationCallback;
use crate::error::Result;
use crate::query::ast::Statement;
use crate::query::dispatch::{augment_with_synonyms, Dispatcher};
use crate::query::parser;
use crate::query::planner::{self, CompiledQuery, Param};
use crate::types::synonym::SynonymEdge;
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;

async fn run(pool: &SqlitePool, compiled: &CompiledQuery) -> Result<Vec<i64>> {
    let mut query = sqlx::query(&compiled.sql);
    for param in &compiled.params {
        query = match param {
            Param::Int(v) => query.bind(*v),
            Param::Float(v) => query.bind(*v),
            Param::Str(v) => query.bind(v.clone()),
            Param::Null => query.bind(Option::<i64>::None),
        };
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(|row| row.get::<i64, _>("id")).collect())
}

fn domain_name(statement: &Statement) -> Option<&str> {
    match statement {
        Statement::Query { domain, .. } => Some(domain),
        Statement::Domain { domain, .. } => Some(domain),
        Statement::ValueList(_) => Some("sp"),
        Statement::Binomial { .. } => Some("sp"),
    }
}

async fn species_synonym_edges(pool: &SqlitePool) -> Result<Vec<SynonymEdge<i64>>> {
    let rows = sqlx::query("SELECT accepted_id, synonym_id FROM species_synonym")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| SynonymEdge {
            accepted_id: row.get("accepted_id"),
            synonym_id: row.get("synonym_id"),
        })
        .collect())
}

/// Run `query_text` against `pool`, returning matching row ids in
/// first-seen order across every strategy that fired. `return_accepted`
/// is the `Preferences` flag gating synonym augmentation (spec.md
/// §4.5.9); it only applies when the search resolves to the `species`
/// domain, since synonymy is only modelled for taxa.
pub async fn search(
    pool: &SqlitePool,
    query_text: &str,
    return_accepted: bool,
    confirm: &mut dyn ConfirmationCallback,
) -> Result<Vec<i64>> {
    let tokens: Vec<String> = query_text.split_whitespace().map(str::to_string).collect();
    if planner::needs_confirmation(&tokens) && !confirm.confirm(query_text) {
        return Ok(Vec::new());
    }

    let statement = parser::parse(query_text)?;
    let dispatcher = Dispatcher::new();
    let cache = dispatcher.dispatch(query_text)?;

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for strategy_name in ["primary", "value_list"] {
        if let Some(compiled) = cache.get(strategy_name) {
            for id in run(pool, compiled).await? {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
    }

    if domain_name(&statement) == Some("sp") || domain_name(&statement) == Some("species") {
        let edges = species_synonym_edges(pool).await?;
        ids = augment_with_synonyms(&ids, &edges, return_accepted);
    }

    Ok(ids)
}
