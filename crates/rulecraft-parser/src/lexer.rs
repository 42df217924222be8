//! Tokenizer for rule strings
//!
//! Whitespace between tokens is insignificant. `AND` / `OR` are keywords in
//! any letter case; every other word is an identifier.

use crate::error::{ParseError, Result};
use rulecraft_core::Comparison;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LParen,
    RParen,
    And,
    Or,
    Comparison(Comparison),
    Identifier(String),
    Integer(i64),
    Float(f64),
    String(String),
}

impl TokenKind {
    /// True for tokens that can stand on the right of a comparison
    pub fn is_literal(&self) -> bool {
        matches!(self, TokenKind::Integer(_) | TokenKind::Float(_) | TokenKind::String(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::And => write!(f, "'AND'"),
            TokenKind::Or => write!(f, "'OR'"),
            TokenKind::Comparison(c) => write!(f, "operator '{}'", c),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Integer(i) => write!(f, "number {}", i),
            TokenKind::Float(v) => write!(f, "number {}", v),
            TokenKind::String(s) => write!(f, "string '{}'", s),
        }
    }
}

/// Token with the byte offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Rule string tokenizer
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenize the whole input
    pub fn tokenize(input: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        log::debug!("Tokenized '{}' into {} tokens", input, tokens.len());
        Ok(tokens)
    }

    /// Read the next token, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        let Some(&(position, c)) = self.chars.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '(' => {
                self.chars.next();
                TokenKind::LParen
            }
            ')' => {
                self.chars.next();
                TokenKind::RParen
            }
            '>' | '<' | '=' | '!' => self.read_operator(position)?,
            '\'' | '"' => self.read_string(position, c)?,
            '-' if self.next_is_digit(position) => self.read_number(position)?,
            c if c.is_ascii_digit() => self.read_number(position)?,
            c if is_identifier_start(c) => self.read_word(position),
            other => {
                return Err(ParseError::UnexpectedCharacter { ch: other, position });
            }
        };

        Ok(Some(Token { kind, position }))
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    fn next_is_digit(&self, position: usize) -> bool {
        self.input[position + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// Consume the longest run of operator characters, then match it
    fn read_operator(&mut self, start: usize) -> Result<TokenKind> {
        let end = self.consume_while(|c| matches!(c, '>' | '<' | '=' | '!'));
        let text = &self.input[start..end];
        text.parse::<Comparison>()
            .map(TokenKind::Comparison)
            .map_err(|_| ParseError::InvalidOperator {
                operator: text.to_string(),
                position: start,
            })
    }

    fn read_string(&mut self, start: usize, quote: char) -> Result<TokenKind> {
        self.chars.next();
        let mut value = String::new();
        let mut escaped = false;
        for (_, c) in self.chars.by_ref() {
            if escaped {
                value.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                return Ok(TokenKind::String(value));
            } else {
                value.push(c);
            }
        }
        Err(ParseError::UnterminatedString { position: start })
    }

    fn read_number(&mut self, start: usize) -> Result<TokenKind> {
        if let Some(&(_, '-')) = self.chars.peek() {
            self.chars.next();
        }
        let mut end = self.consume_while(|c| c.is_ascii_digit());
        let mut is_float = false;

        if let Some(&(dot, '.')) = self.chars.peek() {
            self.chars.next();
            let fraction_end = self.consume_while(|c| c.is_ascii_digit());
            if fraction_end == dot + 1 {
                return Err(self.invalid_number(start));
            }
            end = fraction_end;
            is_float = true;
        }

        // `30abc` or `1.2.3` is one bad token, not a number followed by junk
        if let Some(&(_, c)) = self.chars.peek() {
            if is_identifier_part(c) {
                return Err(self.invalid_number(start));
            }
        }

        let input = self.input;
        let text = &input[start..end];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.invalid_number(start))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| self.invalid_number(start))
        }
    }

    fn invalid_number(&mut self, start: usize) -> ParseError {
        let end = self.consume_while(|c| is_identifier_part(c) || c == '-');
        ParseError::InvalidNumber {
            text: self.input[start..end].to_string(),
            position: start,
        }
    }

    fn read_word(&mut self, start: usize) -> TokenKind {
        let input = self.input;
        let end = self.consume_while(is_identifier_part);
        let word = &input[start..end];
        if word.eq_ignore_ascii_case("and") {
            TokenKind::And
        } else if word.eq_ignore_ascii_case("or") {
            TokenKind::Or
        } else {
            TokenKind::Identifier(word.to_string())
        }
    }

    /// Advance while `pred` holds; returns the byte offset just past the run
    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while let Some(&(_, c)) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            self.chars.next();
        }
        self.chars
            .peek()
            .map(|&(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Whether `name` is usable as an attribute name in rule text
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let valid_shape = match chars.next() {
        Some(first) => is_identifier_start(first) && chars.all(is_identifier_part),
        None => false,
    };
    valid_shape && !name.eq_ignore_ascii_case("and") && !name.eq_ignore_ascii_case("or")
}
