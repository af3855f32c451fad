use crate::token::TokenKind;
use thiserror::Error;

/// Diagnostics raised while scanning and parsing. Offsets are byte offsets into the expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("Unexpected token at {offset}: expected {expected:?}, found {found:?} '{text}'")]
    UnexpectedToken {
        offset: usize,
        expected: TokenKind,
        found: TokenKind,
        text: String,
    },

    #[error("Unterminated string literal starting at {0}")]
    UnterminatedString(usize),

    #[error("Unknown character at {offset}: '{text}'")]
    UnknownCharacter { offset: usize, text: String },

    #[error("Expected a node test at {offset}, found '{text}'")]
    ExpectedNodeTest { offset: usize, text: String },

    #[error("Predicate not allowed after abbreviated step at {0}")]
    PredicateNotAllowed(usize),

    #[error("Expected a location step at {offset}, found '{text}'")]
    InvalidStep { offset: usize, text: String },

    #[error("Expression nested deeper than {limit} levels at {offset}")]
    TooDeep { offset: usize, limit: usize },

    #[error("Unparsed input at {offset}: '{text}'")]
    TrailingInput { offset: usize, text: String },
}
