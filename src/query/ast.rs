//! The single AST every query dialect lowers into (spec.md §4.4).
//!
//! Grounded on the large tagged `Command`/`WhereExpr` enums in
//! `other_examples/cb5c53ae_euanmacinnes-clarium__src-server-query.rs.rs`
//! — one enum per syntactic category, `Box` for recursive children.

/// The parsed form of one of the four accepted dialects (spec.md §4.4).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `domain[where clause]` — scan a table with an optional filter.
    Query { domain: String, where_clause: Option<Expr> },
    /// A bare list of space/comma separated values, matched by prefix
    /// against every taxon's display string.
    ValueList(Vec<String>),
    /// `domain op value[,value...]`.
    Domain { domain: String, op: CompareOp, values: Vec<Literal> },
    /// Partial "Genus species 'Cultivar'".
    Binomial {
        genus_prefix: String,
        species_prefix: Option<String>,
        cultivar_prefix: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    Contains,
    In,
    NotIn,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
            CompareOp::Like | CompareOp::Contains => "LIKE",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT IN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    Empty,
    Star,
    /// Raw text of a date literal; resolved to a UTC range by
    /// `query::planner::resolve_date`.
    Date(String),
}

/// A single step on a `ColumnPath`: the relation name and the filter
/// predicates applied to its join, if any (`rel[pred1,pred2]`).
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub relation: String,
    pub predicates: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPath {
    pub steps: Vec<PathStep>,
    pub column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Min,
    Max,
    Sum,
    Avg,
    Length,
}

impl AggregateFn {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Some(AggregateFn::Count),
            "min" => Some(AggregateFn::Min),
            "max" => Some(AggregateFn::Max),
            "sum" => Some(AggregateFn::Sum),
            "avg" => Some(AggregateFn::Avg),
            "length" => Some(AggregateFn::Length),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            AggregateFn::Count => "COUNT",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Length => "LENGTH",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub func: AggregateFn,
    pub distinct: bool,
    pub arg: Box<Expr>,
}

/// `SELECT column [WHERE ...]` appearing on the RHS of `IN`/a
/// comparison; `correlated` is set when the original carried a trailing
/// `CORRELATE` keyword (spec.md §4.5.5).
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    pub select_column: ColumnPath,
    pub where_clause: Option<Box<Expr>>,
    pub correlated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Column(ColumnPath),
    Call(FunctionCall),
    Subquery(Subquery),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(Box<Expr>, CompareOp, Box<Expr>),
    Between(Box<Expr>, Box<Expr>, Box<Expr>),
    In(Box<Expr>, Vec<Expr>),
    IsNull(Box<Expr>),
    IsNotNull(Box<Expr>),
    /// `rel = Empty` / `rel != Empty` on a to-many relation (spec.md
    /// §4.5.7).
    IsEmpty(Box<Expr>),
    IsNotEmpty(Box<Expr>),
    /// `col ON date` — half-open `[start_of_local_day, end_of_local_day)`
    /// window (spec.md §4.5.6).
    On(Box<Expr>, Box<Expr>),
}
