//! Expression parser
//!
//! Parses rule strings into [`Expr`] trees.
//!
//! Grammar:
//! ```text
//! expr      := and_expr ( OR and_expr )*
//! and_expr  := primary ( AND primary )*
//! primary   := '(' expr ')' | condition
//! condition := IDENT COMPARATOR literal
//! literal   := INTEGER | FLOAT | QUOTED_STRING
//! ```
//!
//! `AND` binds tighter than `OR`; both are left-associative, so
//! `a AND b AND c` parses as `(a AND b) AND c`.

use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use rulecraft_core::{Comparison, Condition, Expr, Literal, LogicalOperator, MAX_RULE_NODES};

/// Deepest parenthesis nesting accepted
pub const MAX_NESTING_DEPTH: usize = 64;

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse a rule string.
    ///
    /// Deterministic: the same input always yields the same tree.
    pub fn parse(input: &str) -> Result<Expr> {
        let tokens = Lexer::tokenize(input)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            depth: 0,
            nodes: 0,
            input_len: input.len(),
        };
        let expr = parser.parse_binary(LogicalOperator::Or.precedence())?;

        if let Some(token) = parser.peek() {
            return Err(match token.kind {
                TokenKind::RParen => ParseError::UnbalancedParenthesis {
                    position: token.position,
                },
                _ => ParseError::UnexpectedToken {
                    found: token.kind.to_string(),
                    expected: "AND or OR".to_string(),
                    position: token.position,
                },
            });
        }

        log::debug!("Parsed rule expression: {}", expr);
        Ok(expr)
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    nodes: usize,
    input_len: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Count one more tree node, failing once the rule outgrows the cap
    fn add_node(&mut self, position: usize) -> Result<()> {
        self.nodes += 1;
        if self.nodes > MAX_RULE_NODES {
            return Err(ParseError::TooManyNodes {
                max: MAX_RULE_NODES,
                position,
            });
        }
        Ok(())
    }

    fn previous(&self) -> Option<&'t Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Precedence climbing over `AND` / `OR`
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr> {
        let mut left = self.parse_primary()?;

        while let Some(token) = self.peek() {
            let operator = match token.kind {
                TokenKind::And => LogicalOperator::And,
                TokenKind::Or => LogicalOperator::Or,
                _ => break,
            };
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            self.add_node(token.position)?;
            self.advance();
            let right = self.parse_binary(precedence + 1)?;
            left = Expr::logical(left, operator, right);
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let Some(token) = self.advance() else {
            return Err(self.missing_operand_at_end());
        };

        match &token.kind {
            TokenKind::LParen => self.parse_group(token.position),
            TokenKind::Identifier(name) => self.parse_condition(name),
            TokenKind::And | TokenKind::Or => Err(ParseError::MissingOperand {
                expected: format!("condition before {}", token.kind),
                position: token.position,
            }),
            TokenKind::RParen => Err(ParseError::MissingOperand {
                expected: "condition".to_string(),
                position: token.position,
            }),
            TokenKind::Comparison(_) => Err(ParseError::MissingOperand {
                expected: format!("attribute name before {}", token.kind),
                position: token.position,
            }),
            literal => Err(ParseError::UnexpectedToken {
                found: literal.to_string(),
                expected: "attribute name or '('".to_string(),
                position: token.position,
            }),
        }
    }

    fn parse_group(&mut self, open_position: usize) -> Result<Expr> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep {
                max: MAX_NESTING_DEPTH,
                position: open_position,
            });
        }

        let inner = self.parse_binary(LogicalOperator::Or.precedence())?;

        match self.advance() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => {
                self.depth -= 1;
                Ok(inner)
            }
            Some(other) => Err(ParseError::UnexpectedToken {
                found: other.kind.to_string(),
                expected: "AND, OR or ')'".to_string(),
                position: other.position,
            }),
            None => Err(ParseError::UnbalancedParenthesis {
                position: open_position,
            }),
        }
    }

    fn parse_condition(&mut self, attribute: &str) -> Result<Expr> {
        let comparison = match self.advance() {
            Some(Token {
                kind: TokenKind::Comparison(c),
                ..
            }) => *c,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    found: other.kind.to_string(),
                    expected: format!("comparison operator after '{}'", attribute),
                    position: other.position,
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    expected: format!("comparison operator after '{}'", attribute),
                })
            }
        };

        let value = self.parse_literal(comparison)?;
        let position = self.previous().map_or(self.input_len, |t| t.position);
        self.add_node(position)?;
        Ok(Expr::Condition(Condition::new(attribute, comparison, value)))
    }

    fn parse_literal(&mut self, comparison: Comparison) -> Result<Literal> {
        let Some(token) = self.advance() else {
            return Err(ParseError::UnexpectedEnd {
                expected: format!("value after '{}'", comparison),
            });
        };

        match &token.kind {
            TokenKind::Integer(i) => Ok(Literal::Integer(*i)),
            TokenKind::Float(f) => Ok(Literal::Float(*f)),
            TokenKind::String(s) => Ok(Literal::String(s.clone())),
            // Bare words are not strings; they must be quoted
            TokenKind::Identifier(_) => Err(ParseError::UnexpectedToken {
                found: token.kind.to_string(),
                expected: "number or quoted string".to_string(),
                position: token.position,
            }),
            _ => Err(ParseError::MissingOperand {
                expected: format!("value after '{}'", comparison),
                position: token.position,
            }),
        }
    }

    fn missing_operand_at_end(&self) -> ParseError {
        match self.previous() {
            Some(prev) if matches!(prev.kind, TokenKind::And | TokenKind::Or) => {
                ParseError::MissingOperand {
                    expected: format!("condition after {}", prev.kind),
                    position: self.input_len,
                }
            }
            _ => ParseError::UnexpectedEnd {
                expected: "condition or '('".to_string(),
            },
        }
    }
}
