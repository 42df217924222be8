//! Rulecraft Parser - rule text to AST
//!
//! Turns rule strings such as
//! `(age > 30 AND department = 'Sales') OR experience >= 5`
//! into [`rulecraft_core::Expr`] trees.

pub mod error;
pub mod expression_parser;
pub mod lexer;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use expression_parser::{ExpressionParser, MAX_NESTING_DEPTH};
pub use rulecraft_core::MAX_RULE_NODES;
pub use lexer::{is_identifier, Lexer, Token, TokenKind};
