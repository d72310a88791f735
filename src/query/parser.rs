//! Recursive-descent parser lowering all four dialects into the shared
//! AST (spec.md §4.4).
//!
//! Grounded on the module-per-clause-kind layout and string-prefix
//! dispatch of
//! `other_examples/cb5c53ae_euanmacinnes-clarium__src-server-query.rs.rs`'s
//! top-level `parse()`.

use super::ast::*;
use super::lexer::{Lexer, Token};
use crate::error::{BotanicError, Result};

pub fn parse(input: &str) -> Result<Statement> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(BotanicError::parse("empty query"));
    }

    if let Some(binomial) = try_parse_binomial(trimmed) {
        return Ok(binomial);
    }

    let tokens = Lexer::new(trimmed).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };

    // `domain op value[,value...]` — a bare domain identifier followed
    // directly by a comparison operator (not `where`) is the Domain
    // dialect (spec.md §4.4 Domain variant).
    if let (Token::Ident(domain), Some(op_tok)) = (parser.peek().clone(), parser.peek_n(1)) {
        if let Some(op) = token_to_compare_op(op_tok) {
            parser.advance();
            parser.advance();
            let values = parser.parse_value_list()?;
            parser.expect_eof()?;
            return Ok(Statement::Domain { domain, op, values });
        }
    }

    // `domain [where expr]` — Query dialect.
    if let Token::Ident(domain) = parser.peek().clone() {
        let mut lookahead = parser.clone_at(parser.pos + 1);
        if matches!(lookahead.peek(), Token::Where | Token::Eof) {
            parser.advance();
            let where_clause = if matches!(parser.peek(), Token::Where) {
                parser.advance();
                Some(parser.parse_or()?)
            } else {
                None
            };
            parser.expect_eof()?;
            return Ok(Statement::Query { domain, where_clause });
        }
    }

    // Anything else is a bare value list: whitespace/comma-separated
    // bare or quoted tokens (spec.md §4.4 ValueList variant).
    let values = parse_bare_value_list(trimmed);
    if !values.is_empty() {
        return Ok(Statement::ValueList(values));
    }

    Err(BotanicError::parse(format!("could not parse query: {trimmed:?}")))
}

/// "Genus species 'Cultivar'" with optional trailing parts — only
/// attempted when the text starts with a capitalised bare word, since
/// every other dialect starts with a lowercase domain identifier.
fn try_parse_binomial(input: &str) -> Option<Statement> {
    let mut words = input.split_whitespace();
    let first = words.next()?;
    if !first.chars().next()?.is_uppercase() {
        return None;
    }
    if first.contains(['=', '[', '\'', '"']) {
        return None;
    }
    let rest: Vec<&str> = words.collect();
    let species_prefix = rest.iter().find(|w| !w.starts_with('\'')).map(|w| w.to_string());
    let cultivar_prefix = input
        .find('\'')
        .map(|idx| input[idx..].trim_matches('\'').to_string());

    Some(Statement::Binomial {
        genus_prefix: first.to_string(),
        species_prefix,
        cultivar_prefix,
    })
}

fn parse_bare_value_list(input: &str) -> Vec<String> {
    input
        .split([',', ' '])
        .map(|s| s.trim().trim_matches(['\'', '"']).to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Bare words that resolve to a calendar date when used as a literal
/// (spec.md §4.5.6: `today`/`yesterday`, weekday names, month names).
/// Quoted strings never go through this path — only an unquoted
/// identifier is eligible, so `epithet = 'today'` still matches text.
fn is_date_word(word: &str) -> bool {
    const WORDS: &[&str] = &[
        "today", "yesterday",
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        "january", "february", "march", "april", "may", "june",
        "july", "august", "september", "october", "november", "december",
    ];
    let lower = word.to_ascii_lowercase();
    WORDS.contains(&lower.as_str())
}

fn token_to_compare_op(token: &Token) -> Option<CompareOp> {
    match token {
        Token::Eq => Some(CompareOp::Eq),
        Token::NotEq => Some(CompareOp::NotEq),
        Token::Gt => Some(CompareOp::Gt),
        Token::Lt => Some(CompareOp::Lt),
        Token::Gte => Some(CompareOp::Gte),
        Token::Lte => Some(CompareOp::Lte),
        Token::Like => Some(CompareOp::Like),
        Token::Contains => Some(CompareOp::Contains),
        Token::In => Some(CompareOp::In),
        _ => None,
    }
}

#[derive(Clone)]
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn clone_at(&self, pos: usize) -> Parser {
        Parser {
            tokens: self.tokens.clone(),
            pos,
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect_eof(&self) -> Result<()> {
        if matches!(self.peek(), Token::Eof) {
            Ok(())
        } else {
            Err(BotanicError::parse(format!("unexpected trailing token: {:?}", self.peek())))
        }
    }

    fn parse_value_list(&mut self) -> Result<Vec<Literal>> {
        let mut values = vec![self.parse_literal()?];
        while matches!(self.peek(), Token::Comma) {
            self.advance();
            values.push(self.parse_literal()?);
        }
        Ok(values)
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        match self.advance() {
            Token::Star => Ok(Literal::Star),
            Token::Int(i) => Ok(Literal::Int(i)),
            Token::Float(f) => Ok(Literal::Float(f)),
            Token::Date(s) => Ok(Literal::Date(s)),
            Token::Str(s) => Ok(Literal::Str(s)),
            Token::Null => Ok(Literal::None),
            Token::Ident(s) if s == "Empty" => Ok(Literal::Empty),
            Token::Ident(s) if s.eq_ignore_ascii_case("true") => Ok(Literal::Bool(true)),
            Token::Ident(s) if s.eq_ignore_ascii_case("false") => Ok(Literal::Bool(false)),
            Token::Ident(s) if is_date_word(&s) => Ok(Literal::Date(s)),
            Token::Ident(s) => Ok(Literal::Str(s)),
            other => Err(BotanicError::parse(format!("expected a literal, found {other:?}"))),
        }
    }

    // OR (lowest)
    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_not()?;
        while matches!(self.peek(), Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if matches!(self.peek(), Token::Not) {
            self.advance();
            Ok(Expr::Not(Box::new(self.parse_not()?)))
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let left = self.parse_predicate()?;
        if let Some(op) = token_to_compare_op(self.peek()) {
            self.advance();
            let right = self.parse_predicate()?;
            return Ok(Expr::Compare(Box::new(left), op, Box::new(right)));
        }
        Ok(left)
    }

    /// BETWEEN…AND…, IN, LIKE, CONTAINS, ON, IS [NOT] (NULL|EMPTY).
    fn parse_predicate(&mut self) -> Result<Expr> {
        let left = self.parse_additive()?;
        match self.peek() {
            Token::On => {
                self.advance();
                let date = self.parse_additive()?;
                Ok(Expr::On(Box::new(left), Box::new(date)))
            }
            Token::Between => {
                self.advance();
                let lo = self.parse_additive()?;
                if !matches!(self.peek(), Token::And) {
                    return Err(BotanicError::parse("expected AND in BETWEEN expression"));
                }
                self.advance();
                let hi = self.parse_additive()?;
                Ok(Expr::Between(Box::new(left), Box::new(lo), Box::new(hi)))
            }
            Token::In => {
                self.advance();
                self.expect(Token::LParen)?;
                let mut items = vec![self.parse_additive()?];
                while matches!(self.peek(), Token::Comma) {
                    self.advance();
                    items.push(self.parse_additive()?);
                }
                self.expect(Token::RParen)?;
                Ok(Expr::In(Box::new(left), items))
            }
            Token::Like => {
                self.advance();
                let right = self.parse_additive()?;
                Ok(Expr::Compare(Box::new(left), CompareOp::Like, Box::new(right)))
            }
            Token::Contains => {
                self.advance();
                let right = self.parse_additive()?;
                Ok(Expr::Compare(Box::new(left), CompareOp::Contains, Box::new(right)))
            }
            Token::Is => {
                self.advance();
                let negate = if matches!(self.peek(), Token::Not) {
                    self.advance();
                    true
                } else {
                    false
                };
                match self.advance() {
                    Token::Null => {
                        if negate {
                            Ok(Expr::IsNotNull(Box::new(left)))
                        } else {
                            Ok(Expr::IsNull(Box::new(left)))
                        }
                    }
                    Token::Ident(s) if s == "Empty" => {
                        if negate {
                            Ok(Expr::IsNotEmpty(Box::new(left)))
                        } else {
                            Ok(Expr::IsEmpty(Box::new(left)))
                        }
                    }
                    other => Err(BotanicError::parse(format!(
                        "expected NULL or Empty after IS, found {other:?}"
                    ))),
                }
            }
            _ => Ok(left),
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        match self.peek().clone() {
            Token::LParen => {
                self.advance();
                if matches!(self.peek(), Token::Select) {
                    return self.parse_subquery();
                }
                let expr = self.parse_or()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Int(_) | Token::Float(_) | Token::Str(_) | Token::Star | Token::Null | Token::Date(_) => {
                Ok(Expr::Literal(self.parse_literal()?))
            }
            // `Empty`/boolean words are literals, not column references,
            // when they appear where an atom is expected (e.g. the RHS
            // of `rel = Empty`; spec.md §4.5.7).
            Token::Ident(name) if name == "Empty" || name.eq_ignore_ascii_case("true") || name.eq_ignore_ascii_case("false") => {
                self.advance();
                Ok(Expr::Literal(if name == "Empty" {
                    Literal::Empty
                } else {
                    Literal::Bool(name.eq_ignore_ascii_case("true"))
                }))
            }
            Token::Ident(name) => {
                self.advance();
                if matches!(self.peek(), Token::LParen) {
                    return self.parse_function_call(name);
                }
                let path = self.parse_column_path_rest(name)?;
                Ok(Expr::Column(path))
            }
            other => Err(BotanicError::parse(format!("unexpected token: {other:?}"))),
        }
    }

    fn parse_function_call(&mut self, name: String) -> Result<Expr> {
        let func = AggregateFn::parse(&name)
            .ok_or_else(|| BotanicError::parse(format!("unknown function: {name}")))?;
        self.expect(Token::LParen)?;
        let distinct = if matches!(self.peek(), Token::Distinct) {
            self.advance();
            true
        } else {
            false
        };
        let arg = self.parse_or()?;
        self.expect(Token::RParen)?;
        Ok(Expr::Call(FunctionCall {
            func,
            distinct,
            arg: Box::new(arg),
        }))
    }

    /// Parses `[.relation[pred,...]]*.column` after the leading
    /// identifier has already been consumed.
    fn parse_column_path_rest(&mut self, first: String) -> Result<ColumnPath> {
        let mut parts = vec![first];
        let mut predicates_per_part: Vec<Vec<Expr>> = vec![self.parse_optional_brackets()?];

        while matches!(self.peek(), Token::Dot) {
            self.advance();
            match self.advance() {
                Token::Ident(next) => {
                    parts.push(next);
                    predicates_per_part.push(self.parse_optional_brackets()?);
                }
                other => return Err(BotanicError::parse(format!("expected identifier after '.', found {other:?}"))),
            }
        }

        let column = parts.pop().unwrap();
        let column_predicates = predicates_per_part.pop().unwrap();
        if !column_predicates.is_empty() {
            return Err(BotanicError::parse("filter brackets are not valid on the final column"));
        }

        let steps = parts
            .into_iter()
            .zip(predicates_per_part)
            .map(|(relation, predicates)| PathStep { relation, predicates })
            .collect();

        Ok(ColumnPath { steps, column })
    }

    fn parse_optional_brackets(&mut self) -> Result<Vec<Expr>> {
        if !matches!(self.peek(), Token::LBracket) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut predicates = vec![self.parse_or()?];
        while matches!(self.peek(), Token::Comma) {
            self.advance();
            predicates.push(self.parse_or()?);
        }
        self.expect(Token::RBracket)?;
        Ok(predicates)
    }

    fn parse_subquery(&mut self) -> Result<Expr> {
        self.expect(Token::Select)?;
        let column_name = match self.advance() {
            Token::Ident(name) => name,
            other => return Err(BotanicError::parse(format!("expected column name in subquery, found {other:?}"))),
        };
        let select_column = self.parse_column_path_rest(column_name)?;
        let where_clause = if matches!(self.peek(), Token::Where) {
            self.advance();
            Some(Box::new(self.parse_or()?))
        } else {
            None
        };
        let correlated = if matches!(self.peek(), Token::Correlate) {
            self.advance();
            true
        } else {
            false
        };
        self.expect(Token::RParen)?;
        Ok(Expr::Subquery(Subquery {
            select_column,
            where_clause,
            correlated,
        }))
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let actual = self.advance();
        if actual == expected {
            Ok(())
        } else {
            Err(BotanicError::parse(format!("expected {expected:?}, found {actual:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_domain_with_operator() {
        let stmt = parse("fam = 'Rosaceae'").unwrap();
        assert_eq!(
            stmt,
            Statement::Domain {
                domain: "fam".into(),
                op: CompareOp::Eq,
                values: vec![Literal::Str("Rosaceae".into())],
            }
        );
    }

    #[test]
    fn parses_query_with_where_clause() {
        let stmt = parse("sp where epithet = 'alba'").unwrap();
        match stmt {
            Statement::Query { domain, where_clause } => {
                assert_eq!(domain, "sp");
                assert!(where_clause.is_some());
            }
            other => panic!("expected Query, got {other:?}"),
        }
    }

    #[test]
    fn parses_bare_value_list() {
        let stmt = parse("alba, rubra nigra").unwrap();
        assert_eq!(
            stmt,
            Statement::ValueList(vec!["alba".into(), "rubra".into(), "nigra".into()])
        );
    }

    #[test]
    fn parses_binomial() {
        let stmt = parse("Rosa alba 'Alba Plena'").unwrap();
        assert_eq!(
            stmt,
            Statement::Binomial {
                genus_prefix: "Rosa".into(),
                species_prefix: Some("alba".into()),
                cultivar_prefix: Some("Alba Plena".into()),
            }
        );
    }

    #[test]
    fn parses_filter_brackets_and_path() {
        let stmt = parse("sp where accessions[quantity > 0].code = 'A1'").unwrap();
        match stmt {
            Statement::Query { where_clause: Some(Expr::Compare(lhs, CompareOp::Eq, _)), .. } => {
                match *lhs {
                    Expr::Column(path) => {
                        assert_eq!(path.column, "code");
                        assert_eq!(path.steps[0].relation, "accessions");
                        assert_eq!(path.steps[0].predicates.len(), 1);
                    }
                    other => panic!("expected Column, got {other:?}"),
                }
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_aggregate_function_call() {
        let stmt = parse("gen where count(species) > 5").unwrap();
        match stmt {
            Statement::Query { where_clause: Some(expr), .. } => {
                if let Expr::Compare(lhs, CompareOp::Gt, _) = expr {
                    assert!(matches!(*lhs, Expr::Call(_)));
                } else {
                    panic!("expected comparison");
                }
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_structure_is_a_parse_error() {
        assert!(parse("===").is_err());
    }

    #[test]
    fn parses_on_date_window() {
        let stmt = parse("accession where date_recvd on 21/11/2021").unwrap();
        match stmt {
            Statement::Query { domain, where_clause: Some(Expr::On(col, date)) } => {
                assert_eq!(domain, "accession");
                assert!(matches!(*col, Expr::Column(_)));
                assert_eq!(*date, Expr::Literal(Literal::Date("21/11/2021".into())));
            }
            other => panic!("expected an ON predicate, got {other:?}"),
        }
    }

    #[test]
    fn bare_weekday_and_month_words_parse_as_dates() {
        let stmt = parse("accession where date_recvd > monday").unwrap();
        match stmt {
            Statement::Query { where_clause: Some(Expr::Compare(_, CompareOp::Gt, rhs)), .. } => {
                assert_eq!(*rhs, Expr::Literal(Literal::Date("monday".into())));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
