//! Parsing for the XPath subset used by YANG `when`, `must` and `if-feature` constraints.
//!
//! [`parse`] turns an expression into an owned [`Node`] tree. [`parse_with`] drives the
//! same parser through any [`AstBuilder`] and also returns the diagnostics it raised.

pub mod ast;
pub mod builder;
pub mod display;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod token;

pub use ast::{Axis, Node, NodeType, Operator};
pub use builder::{AstBuilder, TreeBuilder};
pub use error::XPathError;
pub use parser::{Parsed, parse, parse_with};
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
