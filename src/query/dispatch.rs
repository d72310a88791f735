//! Search dispatcher (C6): registry of named strategies, each
//! contributing to one search's result set (spec.md §4.6).
//!
//! Grounded on the strategy-registry shape implied by spec.md's
//! `applicable`/`search`/cache description, expressed in the teacher's
//! manual-trait-object style (`src/conservation.rs`'s plain `impl`
//! blocks rather than generated dispatch).

use super::ast::Statement;
use super::parser;
use super::planner::{self, CompiledQuery};
use crate::error::Result;
use std::collections::HashMap;

/// One named search strategy. `applicable` decides whether this
/// strategy should run at all for the given query text; `compile`
/// produces the SQL this strategy contributes.
pub trait SearchStrategy {
    fn name(&self) -> &'static str;
    fn applicable(&self, query_text: &str) -> bool;
    fn compile(&self, statement: &Statement) -> Result<CompiledQuery>;
}

/// The default dialect-driven strategy: parse once, compile via
/// `query::planner`. Registered first so later strategies (synonym
/// augmentation) can consult its cached output.
pub struct PrimaryStrategy;

impl SearchStrategy for PrimaryStrategy {
    fn name(&self) -> &'static str {
        "primary"
    }

    fn applicable(&self, _query_text: &str) -> bool {
        true
    }

    fn compile(&self, statement: &Statement) -> Result<CompiledQuery> {
        planner::compile(statement)
    }
}

/// Runs only for bare value-list queries; exists as a separate,
/// independently cacheable strategy so later strategies (synonym
/// augmentation) can layer onto its results without recompiling the
/// primary strategy's query (spec.md §4.5 "dispatcher cache").
pub struct ValueListStrategy;

impl SearchStrategy for ValueListStrategy {
    fn name(&self) -> &'static str {
        "value_list"
    }

    fn applicable(&self, query_text: &str) -> bool {
        matches!(parser::parse(query_text), Ok(Statement::ValueList(_)))
    }

    fn compile(&self, statement: &Statement) -> Result<CompiledQuery> {
        planner::compile(statement)
    }
}

/// Per-strategy compiled output, keyed by strategy name, so a later
/// strategy can read an earlier one's results within the same search
/// (spec.md §4.5.9 synonym augmentation, §4.6.3).
#[derive(Default)]
pub struct ResultCache {
    entries: HashMap<&'static str, CompiledQuery>,
}

impl ResultCache {
    pub fn get(&self, strategy: &str) -> Option<&CompiledQuery> {
        self.entries.get(strategy)
    }
}

pub struct Dispatcher {
    strategies: Vec<Box<dyn SearchStrategy>>,
}

impl Dispatcher {
    /// The default registry: primary dialect resolution, then the
    /// value-list fast path. Strategies run in this order (spec.md
    /// §4.6 "registration order").
    pub fn new() -> Self {
        Dispatcher {
            strategies: vec![Box::new(PrimaryStrategy), Box::new(ValueListStrategy)],
        }
    }

    pub fn register(&mut self, strategy: Box<dyn SearchStrategy>) {
        self.strategies.push(strategy);
    }

    /// Runs every applicable strategy in registration order, caching
    /// each one's compiled query, and returns them in first-seen order
    /// (spec.md §4.6 steps 1-4). Executing the compiled SQL against the
    /// store is the caller's job (`queries::search`); this type only
    /// decides which strategies fire and what they compile to.
    pub fn dispatch(&self, query_text: &str) -> Result<ResultCache> {
        let statement = parser::parse(query_text)?;
        let mut cache = ResultCache::default();
        for strategy in &self.strategies {
            if strategy.applicable(query_text) {
                let compiled = strategy.compile(&statement)?;
                cache.entries.insert(strategy.name(), compiled);
            }
        }
        Ok(cache)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::new()
    }
}

/// Synonym augmentation (spec.md §4.5.9): given the ids a mapper search
/// already returned and the accepted/synonym edges for that entity,
/// add every accepted/synonym counterpart not already present. Runs
/// after the primary strategy, preserving first-seen order.
pub fn augment_with_synonyms(
    found: &[i64],
    edges: &[crate::types::synonym::SynonymEdge<i64>],
    return_accepted: bool,
) -> Vec<i64> {
    if !return_accepted {
        return found.to_vec();
    }
    let mut result = found.to_vec();
    let mut seen: std::collections::HashSet<i64> = found.iter().copied().collect();
    for &id in found {
        for edge in edges {
            let counterpart = if edge.accepted_id == id {
                Some(edge.synonym_id)
            } else if edge.synonym_id == id {
                Some(edge.accepted_id)
            } else {
                None
            };
            if let Some(counterpart) = counterpart {
                if seen.insert(counterpart) {
                    result.push(counterpart);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augment_adds_accepted_and_synonym_counterparts() {
        let edges = vec![crate::types::synonym::SynonymEdge::new(1i64, 2i64).unwrap()];
        assert_eq!(augment_with_synonyms(&[1], &edges, true), vec![1, 2]);
        assert_eq!(augment_with_synonyms(&[2], &edges, true), vec![2, 1]);
    }

    #[test]
    fn augment_is_noop_when_preference_is_off() {
        let edges = vec![crate::types::synonym::SynonymEdge::new(1i64, 2i64).unwrap()];
        assert_eq!(augment_with_synonyms(&[1], &edges, false), vec![1]);
    }

    #[test]
    fn dispatch_runs_primary_for_domain_query() {
        let dispatcher = Dispatcher::new();
        let cache = dispatcher.dispatch("fam = 'Rosaceae'").unwrap();
        assert!(cache.get("primary").is_some());
        assert!(cache.get("value_list").is_none());
    }

    #[test]
    fn dispatch_runs_value_list_strategy_for_bare_list() {
        let dispatcher = Dispatcher::new();
        let cache = dispatcher.dispatch("alba, rubra").unwrap();
        assert!(cache.get("primary").is_some());
        assert!(cache.get("value_list").is_some());
    }

    #[test]
    fn dispatch_surfaces_parse_errors() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.dispatch("===").is_err());
    }
}
