//! Tokeniser shared by all four dialects (spec.md §4.4 "Lexical rules").

use crate::error::{BotanicError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    /// Raw text of a slash- or dash-separated date (`21/11/2021`,
    /// `2021-11-21`, `21-11-2021`) — a numeric literal that turned out
    /// to contain a date separator, so the parser tags it `Literal::Date`
    /// instead of `Int`/`Float` (spec.md §4.5.6).
    Date(String),
    Star,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    And,
    Or,
    Not,
    Like,
    Contains,
    In,
    Between,
    Is,
    Null,
    Distinct,
    Correlate,
    Where,
    Select,
    /// `col ON date` — half-open local-day window (spec.md §4.5.6).
    On,
    Eof,
}

const KEYWORDS: &[(&str, Token)] = &[
    ("and", Token::And),
    ("&&", Token::And),
    ("or", Token::Or),
    ("||", Token::Or),
    ("not", Token::Not),
    ("like", Token::Like),
    ("contains", Token::Contains),
    ("in", Token::In),
    ("between", Token::Between),
    ("is", Token::Is),
    ("null", Token::Null),
    ("none", Token::Null),
    ("distinct", Token::Distinct),
    ("correlate", Token::Correlate),
    ("where", Token::Where),
    ("select", Token::Select),
    ("on", Token::On),
];

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.char_indices().peekable(),
            input,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let (start, c) = match self.chars.peek().copied() {
            Some(pair) => pair,
            None => return Ok(Token::Eof),
        };

        match c {
            '*' => {
                self.chars.next();
                Ok(Token::Star)
            }
            ',' => {
                self.chars.next();
                Ok(Token::Comma)
            }
            '.' => {
                self.chars.next();
                Ok(Token::Dot)
            }
            '(' => {
                self.chars.next();
                Ok(Token::LParen)
            }
            ')' => {
                self.chars.next();
                Ok(Token::RParen)
            }
            '[' => {
                self.chars.next();
                Ok(Token::LBracket)
            }
            ']' => {
                self.chars.next();
                Ok(Token::RBracket)
            }
            '=' => {
                self.chars.next();
                if self.eat('=') {
                    Ok(Token::Eq)
                } else {
                    Ok(Token::Eq)
                }
            }
            '!' => {
                self.chars.next();
                if self.eat('=') {
                    Ok(Token::NotEq)
                } else {
                    Ok(Token::Not)
                }
            }
            '>' => {
                self.chars.next();
                if self.eat('=') {
                    Ok(Token::Gte)
                } else {
                    Ok(Token::Gt)
                }
            }
            '<' => {
                self.chars.next();
                if self.eat('=') {
                    Ok(Token::Lte)
                } else if self.eat('>') {
                    Ok(Token::NotEq)
                } else {
                    Ok(Token::Lt)
                }
            }
            '&' => {
                self.chars.next();
                self.eat('&');
                Ok(Token::And)
            }
            '|' => {
                self.chars.next();
                self.eat('|');
                Ok(Token::Or)
            }
            '\'' | '"' => self.read_quoted(c),
            _ if c.is_ascii_digit() || (c == '-' && self.peek_digit_after_minus()) => {
                self.read_number()
            }
            _ => self.read_bare(start),
        }
    }

    fn peek_digit_after_minus(&mut self) -> bool {
        let mut clone = self.chars.clone();
        clone.next();
        matches!(clone.peek(), Some((_, d)) if d.is_ascii_digit())
    }

    fn eat(&mut self, expected: char) -> bool {
        if let Some((_, c)) = self.chars.peek().copied() {
            if c == expected {
                self.chars.next();
                return true;
            }
        }
        false
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, c)) = self.chars.peek().copied() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn read_quoted(&mut self, quote: char) -> Result<Token> {
        self.chars.next();
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(Token::Str(s)),
                Some((_, '\\')) => {
                    if let Some((_, next)) = self.chars.next() {
                        s.push(next);
                    }
                }
                Some((_, c)) => s.push(c),
                None => {
                    return Err(BotanicError::parse(format!(
                        "unterminated quoted string: {quote}{s}"
                    )))
                }
            }
        }
    }

    /// Reads a digit-led token. The grammar has no division or
    /// interior-minus operator, so a `/` or non-leading `-` seen inside
    /// one can only be a date separator (`21/11/2021`, `2021-11-21`,
    /// `21-11-2021`); such a run is returned whole as `Token::Date` for
    /// the parser to resolve (spec.md §4.5.6).
    fn read_number(&mut self) -> Result<Token> {
        let mut s = String::new();
        if let Some((_, '-')) = self.chars.peek().copied() {
            s.push('-');
            self.chars.next();
        }
        let mut is_float = false;
        let mut is_date = false;
        while let Some((_, c)) = self.chars.peek().copied() {
            if c.is_ascii_digit() {
                s.push(c);
                self.chars.next();
            } else if c == '.' && !is_float && !is_date {
                is_float = true;
                s.push(c);
                self.chars.next();
            } else if (c == '/' || c == '-') && !is_float {
                is_date = true;
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if is_date {
            return Ok(Token::Date(s));
        }
        if is_float {
            s.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| BotanicError::parse(format!("invalid number literal: {s}")))
        } else {
            s.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| BotanicError::parse(format!("invalid number literal: {s}")))
        }
    }

    fn read_bare(&mut self, start: usize) -> Result<Token> {
        let mut end = start;
        while let Some((idx, c)) = self.chars.peek().copied() {
            if c.is_whitespace()
                || matches!(c, '*' | ',' | '.' | '(' | ')' | '[' | ']' | '=' | '!' | '>' | '<' | '&' | '|' | '\'' | '"')
            {
                break;
            }
            end = idx + c.len_utf8();
            self.chars.next();
        }
        let word = &self.input[start..end];
        if word.is_empty() {
            return Err(BotanicError::parse("unexpected character in query"));
        }
        let lower = word.to_ascii_lowercase();
        for (kw, tok) in KEYWORDS {
            if *kw == lower {
                return Ok(tok.clone());
            }
        }
        if lower == "true" {
            return Ok(Token::Str("true".to_string()));
        }
        if lower == "empty" {
            return Ok(Token::Ident("Empty".to_string()));
        }
        Ok(Token::Ident(word.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_comparison() {
        let tokens = Lexer::new("genus = 'Rosa'").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("genus".into()),
                Token::Eq,
                Token::Str("Rosa".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let tokens = Lexer::new("a AND b Or c").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("a".into()),
                Token::And,
                Token::Ident("b".into()),
                Token::Or,
                Token::Ident("c".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn negative_numbers_are_one_token() {
        let tokens = Lexer::new("days > -1").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("days".into()),
                Token::Gt,
                Token::Int(-1),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        assert!(Lexer::new("genus = 'Rosa").tokenize().is_err());
    }

    #[test]
    fn slash_and_dash_dates_tokenize_whole() {
        assert_eq!(
            Lexer::new("21/11/2021").tokenize().unwrap(),
            vec![Token::Date("21/11/2021".into()), Token::Eof]
        );
        assert_eq!(
            Lexer::new("2021-11-21").tokenize().unwrap(),
            vec![Token::Date("2021-11-21".into()), Token::Eof]
        );
    }

    #[test]
    fn on_is_a_keyword() {
        let tokens = Lexer::new("date_recvd on 21/11/2021").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("date_recvd".into()),
                Token::On,
                Token::Date("21/11/2021".into()),
                Token::Eof,
            ]
        );
    }
}
