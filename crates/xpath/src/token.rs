//! Token kinds produced by the scanner.

use crate::ast::{Axis, Operator};

/// Token kinds. The binary operators come first so that "is an operator" is a range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Unknown,
    Or,
    And,
    Equal,
    NotEqual,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Union,
    DotDot,
    ColonColon,
    SlashSlash,
    Number,
    Axis,
    Name,
    String,
    Eof,
    LParens,
    RParens,
    LBracket,
    RBracket,
    Dot,
    At,
    Comma,
    Star,
    Slash,
    Dollar,
    RBrace,
}

impl TokenKind {
    pub fn is_operator(self) -> bool {
        (TokenKind::Or..=TokenKind::Union).contains(&self)
    }

    /// The binary operator this token spells, if any.
    pub fn operator(self) -> Option<Operator> {
        Some(match self {
            TokenKind::Or => Operator::Or,
            TokenKind::And => Operator::And,
            TokenKind::Equal => Operator::Eq,
            TokenKind::NotEqual => Operator::Ne,
            TokenKind::Lt => Operator::Lt,
            TokenKind::Le => Operator::Le,
            TokenKind::Gt => Operator::Gt,
            TokenKind::Ge => Operator::Ge,
            TokenKind::Plus => Operator::Plus,
            TokenKind::Minus => Operator::Minus,
            TokenKind::Multiply => Operator::Multiply,
            TokenKind::Divide => Operator::Divide,
            TokenKind::Modulo => Operator::Modulo,
            TokenKind::Union => Operator::Union,
            _ => return None,
        })
    }
}

/// The current token. Text payloads are owned so the parser can move them into the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte span in the expression.
    pub start: usize,
    pub end: usize,
    pub name: Option<String>,
    /// Empty when the name carried no `prefix:` qualifier.
    pub prefix: Option<String>,
    pub string_value: Option<String>,
    pub axis: Option<Axis>,
    /// Set when a name is directly followed (after spaces) by `(`.
    pub can_be_function: bool,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: usize) -> Self {
        Self {
            kind,
            start,
            end: start,
            name: None,
            prefix: None,
            string_value: None,
            axis: None,
            can_be_function: false,
        }
    }
}
