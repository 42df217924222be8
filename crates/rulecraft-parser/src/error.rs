//! Parser error types

use thiserror::Error;

/// Parser error
///
/// Positions are byte offsets into the rule string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Nothing but whitespace
    #[error("Empty rule expression")]
    Empty,

    /// Character that cannot start any token
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    /// Operator-like token outside the supported set
    #[error("Unknown operator '{operator}' at position {position}")]
    InvalidOperator { operator: String, position: usize },

    /// String literal without its closing quote
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    /// Malformed or out-of-range numeric literal
    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    /// Well-formed token in the wrong place
    #[error("Unexpected {found} at position {position}: expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        position: usize,
    },

    /// Input ended while more was required
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEnd { expected: String },

    /// Missing operand between or around operators
    #[error("Missing operand at position {position}: expected {expected}")]
    MissingOperand { expected: String, position: usize },

    /// `(` without `)` or the other way round
    #[error("Unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },

    /// Parentheses nested deeper than the parser accepts
    #[error("Parentheses nested deeper than {max} levels at position {position}")]
    TooDeep { max: usize, position: usize },

    /// Rule has more conditions and operators than a tree may hold
    #[error("Rule has more than {max} nodes (limit reached at position {position})")]
    TooManyNodes { max: usize, position: usize },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
