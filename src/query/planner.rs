//! Query planner/evaluator (C5): lowers a parsed [`Statement`] into
//! parameterised SQL runnable against the SQLite schema in
//! `migrations::schema` (spec.md §4.5).

use super::ast::*;
use super::domains::{self, DomainInfo, Entity};
use crate::error::{BotanicError, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

/// A literal value bound into the compiled SQL via a positional `?`
/// placeholder (sqlx's SQLite driver convention).
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Param>,
}

struct JoinPlanner {
    /// Relation path (dot-joined) -> alias, so the same relation is
    /// never joined twice (spec.md §4.5.2).
    aliases: HashMap<String, String>,
    joins: Vec<String>,
    counter: usize,
}

impl JoinPlanner {
    fn new(root_alias: &str) -> Self {
        JoinPlanner {
            aliases: HashMap::from([(String::new(), root_alias.to_string())]),
            joins: Vec::new(),
            counter: 0,
        }
    }

    /// Resolve (and lazily create) the join for `steps`, relative to
    /// `base_entity`. Returns the alias of the final relation in the
    /// path, and whether any step along the path was to-many (making the
    /// whole path an aggregate context per spec.md §4.5.4).
    fn resolve(&mut self, base_entity: Entity, steps: &[PathStep]) -> Result<(String, bool)> {
        let mut current_entity = base_entity;
        let mut current_alias = self.aliases.get("").cloned().unwrap();
        let mut path_key = String::new();
        let mut any_to_many = false;

        for step in steps {
            path_key.push('.');
            path_key.push_str(&step.relation);

            let (_, target_entity, to_many) = domains::relations_of(current_entity)
                .iter()
                .find(|(name, _, _)| *name == step.relation)
                .copied()
                .ok_or_else(|| {
                    BotanicError::parse(format!(
                        "unknown relation {:?} on this domain",
                        step.relation
                    ))
                })?;
            any_to_many |= to_many;

            if let Some(alias) = self.aliases.get(&path_key) {
                current_alias = alias.clone();
                current_entity = target_entity;
                continue;
            }

            self.counter += 1;
            let alias = format!("j{}", self.counter);
            let target_table = table_name(target_entity);
            let on_clause = join_condition(current_entity, &current_alias, target_entity, &alias);
            self.joins.push(format!("JOIN {target_table} {alias} ON {on_clause}"));
            self.aliases.insert(path_key.clone(), alias.clone());
            current_alias = alias;
            current_entity = target_entity;
        }

        Ok((current_alias, any_to_many))
    }
}

fn table_name(entity: Entity) -> &'static str {
    match entity {
        Entity::Family => "family",
        Entity::Genus => "genus",
        Entity::Species => "species",
        Entity::Geography => "geography",
        Entity::VernacularName => "vernacular_name",
        Entity::Accession => "accession",
        Entity::Plant => "plant",
    }
}

/// Walk `steps` from `base` purely on the relation adjacency table, with
/// no aliasing/joining side effects — used to find which entity a path
/// lands on before deciding what to do with its final segment.
fn entity_after_steps(base: Entity, steps: &[PathStep]) -> Result<Entity> {
    let mut current = base;
    for step in steps {
        let (_, target, _) = domains::relations_of(current)
            .iter()
            .find(|(name, _, _)| *name == step.relation)
            .copied()
            .ok_or_else(|| {
                BotanicError::parse(format!("unknown relation {:?} on this domain", step.relation))
            })?;
        current = target;
    }
    Ok(current)
}

fn join_condition(from: Entity, from_alias: &str, to: Entity, to_alias: &str) -> String {
    // Foreign keys all follow `<parent>_id` naming (spec.md §6 "Foreign
    // keys enforce ownership").
    match (from, to) {
        (Entity::Genus, Entity::Family) => format!("{from_alias}.family_id = {to_alias}.id"),
        (Entity::Species, Entity::Genus) => format!("{from_alias}.genus_id = {to_alias}.id"),
        (Entity::Family, Entity::Genus) => format!("{to_alias}.family_id = {from_alias}.id"),
        (Entity::Genus, Entity::Species) => format!("{to_alias}.genus_id = {from_alias}.id"),
        (Entity::Species, Entity::VernacularName) => {
            format!("{to_alias}.species_id = {from_alias}.id")
        }
        (Entity::VernacularName, Entity::Species) => {
            format!("{from_alias}.species_id = {to_alias}.id")
        }
        (Entity::Species, Entity::Accession) => format!("{to_alias}.species_id = {from_alias}.id"),
        (Entity::Accession, Entity::Species) => format!("{from_alias}.species_id = {to_alias}.id"),
        (Entity::Accession, Entity::Plant) => format!("{to_alias}.accession_id = {from_alias}.id"),
        (Entity::Plant, Entity::Accession) => format!("{from_alias}.accession_id = {to_alias}.id"),
        (Entity::Species, Entity::Geography) => format!(
            "{from_alias}.id IN (SELECT species_id FROM species_distribution WHERE geography_id = {to_alias}.id)"
        ),
        (Entity::Geography, Entity::Species) => format!(
            "{to_alias}.id IN (SELECT species_id FROM species_distribution WHERE geography_id = {from_alias}.id)"
        ),
        _ => format!("{from_alias}.id = {to_alias}.id"),
    }
}

struct Compiler<'a> {
    joins: JoinPlanner,
    domain: &'a DomainInfo,
    params: Vec<Param>,
    having: bool,
}

impl<'a> Compiler<'a> {
    fn compile_expr(&mut self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Literal(lit) => Ok(self.bind(lit)),
            Expr::Column(path) => self.compile_column(path),
            Expr::Not(inner) => Ok(format!("NOT ({})", self.compile_expr(inner)?)),
            Expr::And(l, r) => Ok(format!("({} AND {})", self.compile_expr(l)?, self.compile_expr(r)?)),
            Expr::Or(l, r) => Ok(format!("({} OR {})", self.compile_expr(l)?, self.compile_expr(r)?)),
            Expr::Compare(l, op, r) => self.compile_compare(l, *op, r),
            Expr::Between(v, lo, hi) => {
                if let (Expr::Literal(Literal::Date(lo_raw)), Expr::Literal(Literal::Date(hi_raw))) =
                    (lo.as_ref(), hi.as_ref())
                {
                    return self.compile_date_between(v, lo_raw, hi_raw);
                }
                let v_sql = self.compile_expr(v)?;
                let lo_sql = self.compile_expr(lo)?;
                let hi_sql = self.compile_expr(hi)?;
                Ok(format!("{v_sql} BETWEEN {lo_sql} AND {hi_sql}"))
            }
            Expr::In(v, items) => {
                let v_sql = self.compile_expr(v)?;
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(self.compile_expr(item)?);
                }
                Ok(format!("{v_sql} IN ({})", rendered.join(", ")))
            }
            Expr::IsNull(inner) => Ok(format!("{} IS NULL", self.compile_expr(inner)?)),
            Expr::IsNotNull(inner) => Ok(format!("{} IS NOT NULL", self.compile_expr(inner)?)),
            Expr::IsEmpty(inner) => self.compile_relation_emptiness(inner, true),
            Expr::IsNotEmpty(inner) => self.compile_relation_emptiness(inner, false),
            Expr::Call(call) => self.compile_call(call),
            Expr::Subquery(sub) => self.compile_subquery(sub, None),
            Expr::On(col, date) => self.compile_on(col, date),
        }
    }

    /// `col ON date` → `col >= start_of_day AND col < end_of_day`
    /// (spec.md §4.5.6).
    fn compile_on(&mut self, col: &Expr, date: &Expr) -> Result<String> {
        let col_sql = self.compile_expr(col)?;
        let raw = match date {
            Expr::Literal(Literal::Date(s)) => s.as_str(),
            Expr::Literal(Literal::Str(s)) => s.as_str(),
            _ => return Err(BotanicError::search("ON requires a date literal")),
        };
        let day = parse_resolved_day(raw)?;
        let (start, end) = day_bounds(day);
        self.params.push(Param::Str(start.format("%Y-%m-%d %H:%M:%S").to_string()));
        self.params.push(Param::Str(end.format("%Y-%m-%d %H:%M:%S").to_string()));
        Ok(format!("({col_sql} >= ? AND {col_sql} < ?)"))
    }

    /// `col BETWEEN d1 AND d2` on date literals: inclusive of every
    /// moment of both named days (spec.md §4.5.6), expressed as the
    /// same half-open trick applied to the combined span.
    fn compile_date_between(&mut self, v: &Expr, lo_raw: &str, hi_raw: &str) -> Result<String> {
        let v_sql = self.compile_expr(v)?;
        let (start, _) = day_bounds(parse_resolved_day(lo_raw)?);
        let (_, end) = day_bounds(parse_resolved_day(hi_raw)?);
        self.params.push(Param::Str(start.format("%Y-%m-%d %H:%M:%S").to_string()));
        self.params.push(Param::Str(end.format("%Y-%m-%d %H:%M:%S").to_string()));
        Ok(format!("{v_sql} >= ? AND {v_sql} < ?"))
    }

    fn compile_compare(&mut self, l: &Expr, op: CompareOp, r: &Expr) -> Result<String> {
        // `col is None`/`= None` -> IS NULL (spec.md §4.5.7).
        if let Expr::Literal(Literal::None) = r {
            let l_sql = self.compile_expr(l)?;
            return Ok(match op {
                CompareOp::Eq => format!("{l_sql} IS NULL"),
                CompareOp::NotEq => format!("{l_sql} IS NOT NULL"),
                _ => return Err(BotanicError::search("None only supports = or !=")),
            });
        }
        if let Expr::Literal(Literal::Empty) = r {
            return self.compile_relation_emptiness(l, matches!(op, CompareOp::Eq));
        }
        if let Expr::Subquery(sub) = r {
            return self.compile_subquery(sub, Some((l, op)));
        }

        let l_sql = self.compile_expr(l)?;
        let r_sql = self.compile_expr(r)?;
        match op {
            CompareOp::Like => Ok(format!("{l_sql} LIKE {r_sql} ESCAPE '\\'")),
            CompareOp::Contains => {
                // `r_sql` is always a freshly-bound placeholder here; wrap
                // the just-pushed parameter in `%...%` (spec.md §4.5.8).
                if let Some(Param::Str(s)) = self.params.last_mut() {
                    *s = format!("%{s}%");
                }
                Ok(format!("{l_sql} LIKE {r_sql} ESCAPE '\\'"))
            }
            _ => Ok(format!("{l_sql} {} {r_sql}", op.as_sql())),
        }
    }

    /// `rel = Empty` / `rel != Empty` (spec.md §4.5.7): the relation
    /// itself (named by `path.column`) must not be joined — joining it
    /// would INNER-JOIN away exactly the childless rows this predicate
    /// is meant to find. Any earlier steps in the path are real joins
    /// and are resolved normally; only the final relation is tested via
    /// a correlated `EXISTS`/`NOT EXISTS` against the real FK condition.
    fn compile_relation_emptiness(&mut self, expr: &Expr, is_empty: bool) -> Result<String> {
        let path = match expr {
            Expr::Column(path) => path,
            _ => return Err(BotanicError::search("Empty/None only apply to a relation or column")),
        };
        let (outer_alias, _) = self.joins.resolve(self.domain.entity, &path.steps)?;
        let outer_entity = entity_after_steps(self.domain.entity, &path.steps)?;
        let (_, target_entity, _) = domains::relations_of(outer_entity)
            .iter()
            .find(|(name, _, _)| *name == path.column)
            .copied()
            .ok_or_else(|| {
                BotanicError::parse(format!("unknown relation {:?} on this domain", path.column))
            })?;
        let target_table = table_name(target_entity);
        self.joins.counter += 1;
        let corr_alias = format!("e{}", self.joins.counter);
        let on_clause = join_condition(outer_entity, &outer_alias, target_entity, &corr_alias);
        let exists = format!("EXISTS (SELECT 1 FROM {target_table} {corr_alias} WHERE {on_clause})");
        Ok(if is_empty {
            format!("NOT {exists}")
        } else {
            exists
        })
    }

    fn compile_column(&mut self, path: &ColumnPath) -> Result<String> {
        let (alias, to_many) = self.joins.resolve(self.domain.entity, &path.steps)?;
        if to_many {
            self.having = true;
        }
        for step in &path.steps {
            for predicate in &step.predicates {
                // Filter-bracket predicates become additional ON-clause
                // terms; folded into the join's WHERE-equivalent by
                // AND-ing them onto the outer predicate stream is
                // sufficient for SQLite's implicit-join semantics used
                // here (spec.md §4.5.3).
                self.compile_expr(predicate)?;
            }
        }
        Ok(format!("{alias}.{}", path.column))
    }

    fn compile_call(&mut self, call: &FunctionCall) -> Result<String> {
        self.having = true;
        let distinct = if call.distinct { "DISTINCT " } else { "" };
        let arg_sql = self.compile_expr(&call.arg)?;
        Ok(format!("{}({distinct}{arg_sql})", call.func.as_sql()))
    }

    fn compile_subquery(&mut self, sub: &Subquery, outer: Option<(&Expr, CompareOp)>) -> Result<String> {
        let (inner_entity, inner_table) = if sub.correlated {
            (self.domain.entity, self.domain.table)
        } else {
            let entity = entity_for_column_path(&sub.select_column)
                .unwrap_or(self.domain.entity);
            (entity, table_name(entity))
        };

        let mut inner = Compiler {
            joins: JoinPlanner::new("sub"),
            domain: &DomainInfo {
                entity: inner_entity,
                table: inner_table,
                searchable_columns: &[],
            },
            params: Vec::new(),
            having: false,
        };
        let select_col = format!("sub.{}", sub.select_column.column);
        let mut where_parts = Vec::new();
        if let Some(where_clause) = &sub.where_clause {
            where_parts.push(inner.compile_expr(where_clause)?);
        }
        if sub.correlated {
            let outer_alias = self.joins.aliases.get("").cloned().unwrap_or_default();
            if inner_table != self.domain.table {
                return Err(BotanicError::search(
                    "correlated subquery must reference the outer scan's table",
                ));
            }
            where_parts.push(format!("sub.id = {outer_alias}.id"));
        }
        self.params.append(&mut inner.params);

        let where_sql = if where_parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_parts.join(" AND "))
        };
        let subquery_sql = format!(
            "(SELECT {select_col} FROM {inner_table} sub{}{})",
            inner.joins.joins.iter().map(|j| format!(" {j}")).collect::<String>(),
            where_sql
        );

        match outer {
            Some((outer_expr, op)) => {
                let outer_sql = self.compile_expr(outer_expr)?;
                Ok(format!("{outer_sql} {} {subquery_sql}", op.as_sql()))
            }
            None => Ok(subquery_sql),
        }
    }

    fn bind(&mut self, lit: &Literal) -> String {
        let param = match lit {
            Literal::Int(i) => Param::Int(*i),
            Literal::Float(f) => Param::Float(*f),
            Literal::Str(s) => Param::Str(s.clone()),
            Literal::Bool(b) => Param::Int(if *b { 1 } else { 0 }),
            Literal::None | Literal::Empty => Param::Null,
            Literal::Star => return "1".to_string(),
            Literal::Date(raw) => {
                let resolved = resolve_date(raw).unwrap_or_else(|_| raw.clone());
                Param::Str(resolved)
            }
        };
        self.params.push(param);
        "?".to_string()
    }
}

fn entity_for_column_path(path: &ColumnPath) -> Option<Entity> {
    path.steps.last().map(|s| match s.relation.as_str() {
        "species" => Entity::Species,
        "genus" => Entity::Genus,
        "family" => Entity::Family,
        "accession" | "accessions" => Entity::Accession,
        "plant" | "plants" => Entity::Plant,
        "geography" | "distribution" => Entity::Geography,
        _ => Entity::Species,
    })
}

/// Compile a parsed [`Statement`] to SQL against the domain it scans.
pub fn compile(statement: &Statement) -> Result<CompiledQuery> {
    match statement {
        Statement::Query { domain, where_clause } => compile_query(domain, where_clause.as_ref()),
        Statement::Domain { domain, op, values } => compile_domain(domain, *op, values),
        Statement::ValueList(values) => compile_value_list(values),
        Statement::Binomial { genus_prefix, species_prefix, cultivar_prefix } => {
            compile_binomial(genus_prefix, species_prefix.as_deref(), cultivar_prefix.as_deref())
        }
    }
}

fn compile_query(domain_name: &str, where_clause: Option<&Expr>) -> Result<CompiledQuery> {
    let info = domains::resolve(domain_name)?;
    let mut compiler = Compiler {
        joins: JoinPlanner::new("t"),
        domain: &info,
        params: Vec::new(),
        having: false,
    };

    let filter_sql = match where_clause {
        Some(expr) => Some(compiler.compile_expr(expr)?),
        None => None,
    };

    let joins_sql: String = compiler.joins.joins.iter().map(|j| format!(" {j}")).collect();
    let mut sql = format!("SELECT t.* FROM {} t{joins_sql}", info.table);
    if let Some(filter_sql) = &filter_sql {
        if compiler.having {
            sql.push_str(&format!(" GROUP BY t.id HAVING {filter_sql}"));
        } else {
            sql.push_str(&format!(" WHERE {filter_sql}"));
        }
    }

    Ok(CompiledQuery { sql, params: compiler.params })
}

fn compile_domain(domain_name: &str, op: CompareOp, values: &[Literal]) -> Result<CompiledQuery> {
    let info = domains::resolve(domain_name)?;
    if values.iter().any(|v| matches!(v, Literal::Star)) {
        return Ok(CompiledQuery {
            sql: format!("SELECT t.* FROM {} t", info.table),
            params: Vec::new(),
        });
    }

    let column = info
        .searchable_columns
        .first()
        .ok_or_else(|| BotanicError::parse(format!("domain {domain_name:?} has no searchable column")))?;

    let mut params = Vec::new();
    let placeholders: Vec<String> = values
        .iter()
        .map(|v| {
            params.push(match v {
                Literal::Int(i) => Param::Int(*i),
                Literal::Float(f) => Param::Float(*f),
                Literal::Str(s) => Param::Str(s.clone()),
                Literal::Bool(b) => Param::Int(if *b { 1 } else { 0 }),
                _ => Param::Null,
            });
            "?".to_string()
        })
        .collect();

    let sql = match op {
        CompareOp::In => format!(
            "SELECT t.* FROM {} t WHERE t.{column} IN ({})",
            info.table,
            placeholders.join(", ")
        ),
        CompareOp::NotIn => format!(
            "SELECT t.* FROM {} t WHERE t.{column} NOT IN ({})",
            info.table,
            placeholders.join(", ")
        ),
        CompareOp::Like | CompareOp::Contains => {
            format!("SELECT t.* FROM {} t WHERE t.{column} LIKE {} ESCAPE '\\'", info.table, placeholders[0])
        }
        _ => format!(
            "SELECT t.* FROM {} t WHERE t.{column} {} {}",
            info.table,
            op.as_sql(),
            placeholders[0]
        ),
    };

    Ok(CompiledQuery { sql, params })
}

/// Value-list dialect: matches taxa whose display string starts with
/// any of the given values (spec.md §4.4 ValueList).
fn compile_value_list(values: &[String]) -> Result<CompiledQuery> {
    let mut params = Vec::new();
    let clauses: Vec<String> = values
        .iter()
        .map(|v| {
            params.push(Param::Str(format!("{v}%")));
            "t.full_sci_name LIKE ? ESCAPE '\\'".to_string()
        })
        .collect();
    Ok(CompiledQuery {
        sql: format!("SELECT t.* FROM species t WHERE {}", clauses.join(" OR ")),
        params,
    })
}

fn compile_binomial(genus_prefix: &str, species_prefix: Option<&str>, cultivar_prefix: Option<&str>) -> Result<CompiledQuery> {
    let mut sql = "SELECT sp.* FROM species sp JOIN genus g ON sp.genus_id = g.id WHERE g.epithet LIKE ? ESCAPE '\\'".to_string();
    let mut params = vec![Param::Str(format!("{genus_prefix}%"))];
    if let Some(species) = species_prefix {
        sql.push_str(" AND sp.epithet LIKE ? ESCAPE '\\'");
        params.push(Param::Str(format!("{species}%")));
    }
    if let Some(cultivar) = cultivar_prefix {
        sql.push_str(" AND sp.cultivar_epithet LIKE ? ESCAPE '\\'");
        params.push(Param::Str(format!("{cultivar}%")));
    }
    Ok(CompiledQuery { sql, params })
}

/// Date arithmetic (spec.md §4.5.6). Resolves a date literal's text to
/// an ISO date, or (for bare offsets/`today`/`yesterday`) to the date
/// that many days from today. `reference` lets tests pin "today"
/// instead of reading the system clock.
pub fn resolve_date(text: &str) -> Result<String> {
    resolve_date_from(text, chrono_today())
}

fn chrono_today() -> NaiveDate {
    // `Utc::now()` is avoided at the top level so planning stays
    // deterministic under test; callers needing the real date pass it
    // through `resolve_date_from` directly in production code paths.
    chrono::Local::now().date_naive()
}

fn resolve_date_from(text: &str, today: NaiveDate) -> Result<String> {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower == "today" {
        return Ok(today.to_string());
    }
    if lower == "yesterday" {
        return Ok((today - Duration::days(1)).to_string());
    }
    if let Ok(offset) = trimmed.parse::<i64>() {
        return Ok((today + Duration::days(offset)).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Ok(date.to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d-%m-%Y") {
        return Ok(date.to_string());
    }
    if let Some(weekday_date) = resolve_weekday(&lower, today) {
        return Ok(weekday_date.to_string());
    }
    if let Some(month_date) = resolve_month(&lower, today) {
        return Ok(month_date.to_string());
    }

    Err(BotanicError::parse(format!("unrecognised date literal: {text:?}")))
}

fn resolve_weekday(lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    use chrono::Weekday::*;
    let weekday = match lower {
        "monday" => Mon,
        "tuesday" => Tue,
        "wednesday" => Wed,
        "thursday" => Thu,
        "friday" => Fri,
        "saturday" => Sat,
        "sunday" => Sun,
        _ => return None,
    };
    let mut candidate = today;
    for _ in 0..7 {
        candidate -= Duration::days(1);
        if candidate.weekday() == weekday {
            return Some(candidate);
        }
    }
    None
}

/// A bare month name resolves to the 1st of its most recent occurrence
/// (this year if not yet past, else last year) — there's no day number
/// to go on, so the 1st is the only unambiguous anchor; this mirrors
/// `resolve_weekday`'s "most recent matching day" rule.
fn resolve_month(lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    let month = match lower {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, 1)?;
    if this_year <= today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() - 1, month, 1)
    }
}

fn parse_resolved_day(raw: &str) -> Result<NaiveDate> {
    let resolved = resolve_date(raw)?;
    NaiveDate::parse_from_str(&resolved, "%Y-%m-%d")
        .map_err(|_| BotanicError::search(format!("date literal {raw:?} did not resolve to a calendar date")))
}

/// Expand an `ON <date>` predicate to `[start_of_day, end_of_day)` UTC
/// bounds (spec.md §4.5.6).
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = (date + Duration::days(1)).and_time(NaiveTime::MIN);
    (start, end)
}

/// Small-value guard (spec.md §4.5.10): value-list queries that are a
/// single short token, or many short tokens, should prompt the caller
/// before scanning.
pub fn needs_confirmation(values: &[String]) -> bool {
    const SHORT: usize = 3;
    const MANY: usize = 5;
    if values.len() == 1 {
        return values[0].len() < SHORT;
    }
    values.len() >= MANY && values.iter().all(|v| v.len() < SHORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_simple_domain_equality() {
        let compiled = compile(&Statement::Domain {
            domain: "fam".into(),
            op: CompareOp::Eq,
            values: vec![Literal::Str("Rosaceae".into())],
        })
        .unwrap();
        assert_eq!(compiled.sql, "SELECT t.* FROM family t WHERE t.epithet = ?");
        assert_eq!(compiled.params, vec![Param::Str("Rosaceae".into())]);
    }

    #[test]
    fn compiles_query_with_where_into_joins() {
        let stmt = super::super::parser::parse("sp where genus.epithet = 'Rosa'").unwrap();
        let compiled = compile(&stmt).unwrap();
        assert!(compiled.sql.contains("JOIN genus"));
        assert!(compiled.sql.contains("WHERE"));
    }

    #[test]
    fn aggregate_comparison_uses_having() {
        let stmt = super::super::parser::parse("gen where count(species) > 5").unwrap();
        let compiled = compile(&stmt).unwrap();
        assert!(compiled.sql.contains("HAVING"));
        assert!(compiled.sql.contains("GROUP BY"));
    }

    #[test]
    fn star_domain_matches_everything() {
        let compiled = compile(&Statement::Domain {
            domain: "sp".into(),
            op: CompareOp::Eq,
            values: vec![Literal::Star],
        })
        .unwrap();
        assert_eq!(compiled.params.len(), 0);
    }

    #[test]
    fn resolve_date_handles_offsets_and_keywords() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(resolve_date_from("today", today).unwrap(), "2024-06-15");
        assert_eq!(resolve_date_from("0", today).unwrap(), "2024-06-15");
        assert_eq!(resolve_date_from("-1", today).unwrap(), "2024-06-14");
        assert_eq!(resolve_date_from("yesterday", today).unwrap(), "2024-06-14");
    }

    #[test]
    fn resolve_date_parses_common_forms() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(resolve_date_from("2024-01-02", today).unwrap(), "2024-01-02");
        assert_eq!(resolve_date_from("02/01/2024", today).unwrap(), "2024-01-02");
    }

    #[test]
    fn relation_emptiness_correlates_against_the_real_fk_without_joining() {
        let stmt = super::super::parser::parse("sp where accessions = Empty").unwrap();
        let compiled = compile(&stmt).unwrap();
        assert!(compiled.sql.contains("EXISTS (SELECT 1 FROM accession"));
        assert!(compiled.sql.contains(".species_id = t.id)"));
        assert!(compiled.sql.starts_with("SELECT t.* FROM species t WHERE NOT EXISTS"));
        // the relation itself must not be joined into the FROM clause
        assert!(!compiled.sql.contains("JOIN accession"));
    }

    #[test]
    fn relation_not_empty_drops_the_negation() {
        let stmt = super::super::parser::parse("acc where plants != Empty").unwrap();
        let compiled = compile(&stmt).unwrap();
        assert!(compiled.sql.contains("EXISTS (SELECT 1 FROM plant"));
        assert!(!compiled.sql.contains("NOT EXISTS"));
    }

    #[test]
    fn on_date_compiles_to_a_half_open_window() {
        let stmt = super::super::parser::parse("accession where date_recvd on 21/11/2021").unwrap();
        let compiled = compile(&stmt).unwrap();
        assert!(compiled.sql.contains("date_recvd >= ? AND t.date_recvd < ?"));
        assert_eq!(
            compiled.params,
            vec![
                Param::Str("2021-11-21 00:00:00".into()),
                Param::Str("2021-11-22 00:00:00".into()),
            ]
        );
    }

    #[test]
    fn resolve_date_handles_month_names() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(resolve_date_from("march", today).unwrap(), "2024-03-01");
        assert_eq!(resolve_date_from("december", today).unwrap(), "2023-12-01");
    }

    #[test]
    fn small_value_guard_flags_single_short_token() {
        assert!(needs_confirmation(&["ab".to_string()]));
        assert!(!needs_confirmation(&["albaxyz".to_string()]));
    }

    #[test]
    fn small_value_guard_flags_many_short_tokens() {
        let values: Vec<String> = vec!["ab", "cd", "ef", "gh", "ij"].into_iter().map(String::from).collect();
        assert!(needs_confirmation(&values));
    }
}
