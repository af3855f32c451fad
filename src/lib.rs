//! # yangcond
//!
//! Parses and evaluates the XPath subset used by YANG `when`, `must` and `if-feature`
//! statements, against an in-memory data tree backed by an optional data store.
//!
//! - **xpath**: scanner, precedence-climbing parser and AST ([`yangcond_xpath`])
//! - **eval**: evaluator and schema-driven condition checks ([`yangcond_core`])
//! - **traits**: schema and data-store accessors ([`yangcond_traits`])
//! - **types**: the data tree and path helpers ([`yangcond_types`])

pub mod assignments;
pub mod error;
pub mod schema_xml;

pub use yangcond_core as eval;
pub use yangcond_traits as traits;
pub use yangcond_types as types;
pub use yangcond_xpath as xpath;

pub use error::AppError;
pub use schema_xml::load_schema;

pub use yangcond_core::{
    Condition, ConditionError, ConditionKind, EvalConfig, EvalOutcome, Evaluator, FailReason,
    conditions_of, evaluate,
};
pub use yangcond_traits::{DataStore, InMemoryStore, NoStore, SchemaNode, SchemaTree};
pub use yangcond_types::DataNode;
pub use yangcond_xpath::{AstBuilder, Node, Parsed, TreeBuilder, XPathError, parse, parse_with};

/// Parses `expr`, evaluates it with `path` as the context node and drops the AST.
///
/// An expression that does not parse is false.
pub fn process_condition<'a, N: SchemaNode<'a>>(
    expr: &str,
    path: &str,
    data_root: &DataNode,
    schema: N,
    store: &dyn DataStore,
) -> bool {
    Evaluator::new(schema, store).process_condition(expr, path, data_root)
}
