//! # yangcond-core
//!
//! Evaluates YANG `when`, `must` and `if-feature` conditions.
//!
//! Evaluation never raises: an expression either holds or it does not. Internally each
//! AST node produces an [`EvalOutcome`], which keeps the [`FailReason`] for a `false`
//! so that callers such as [`Evaluator::apply_conditions`] can report it.
//!
//! The evaluator reads the schema through [`traits::SchemaNode`] and falls back to a
//! [`traits::DataStore`] for paths missing from the in-memory tree.

pub use yangcond_traits as traits;
pub use yangcond_types as types;
pub use yangcond_xpath as xpath;

mod axes;
pub mod condition;
pub mod config;
pub mod context;
mod data;
pub mod engine;
pub mod error;
mod functions;
mod operators;
pub mod outcome;

pub use condition::{Condition, ConditionKind, conditions_of};
pub use config::EvalConfig;
pub use context::{EvalContext, StepScope};
pub use engine::{Evaluator, evaluate, evaluate_node};
pub use error::ConditionError;
pub use outcome::{EvalOutcome, FailReason, Resolved};
