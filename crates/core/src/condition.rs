//! `when`, `must` and `if-feature` conditions attached to schema nodes.

use crate::engine::Evaluator;
use crate::error::ConditionError;
use crate::outcome::{EvalOutcome, FailReason};
use std::fmt;
use yangcond_traits::SchemaNode;
use yangcond_types::DataNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    When,
    Must,
    IfFeature,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 3] = [ConditionKind::When, ConditionKind::Must, ConditionKind::IfFeature];

    /// The schema attribute holding a condition of this kind.
    pub fn attribute(self) -> &'static str {
        match self {
            ConditionKind::When => "when",
            ConditionKind::Must => "must",
            ConditionKind::IfFeature => "if-feature",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// One condition as declared on a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub kind: ConditionKind,
    pub expression: String,
}

impl Condition {
    /// The expression to evaluate. An `if-feature` statement is wrapped in a call to
    /// `if-feature()` so its operands are checked as feature names.
    pub fn evaluable(&self) -> String {
        match self.kind {
            ConditionKind::IfFeature => format!("if-feature({})", self.expression),
            ConditionKind::When | ConditionKind::Must => self.expression.clone(),
        }
    }
}

/// The conditions declared on `node`, in `when`, `must`, `if-feature` order.
pub fn conditions_of<'a, N: SchemaNode<'a>>(node: N) -> Vec<Condition> {
    ConditionKind::ALL
        .into_iter()
        .filter_map(|kind| {
            node.attribute(kind.attribute())
                .filter(|expression| !expression.trim().is_empty())
                .map(|expression| Condition {
                    kind,
                    expression: expression.to_string(),
                })
        })
        .collect()
}

impl<'a, N: SchemaNode<'a>> Evaluator<'a, '_, N> {
    /// Checks one condition with `path` as the context node.
    pub fn check_condition(
        &self,
        condition: &Condition,
        path: &str,
        data_root: &DataNode,
    ) -> Result<(), ConditionError> {
        let expression = condition.evaluable();
        let outcome = match yangcond_xpath::parse(&expression) {
            Some(ast) => {
                if self.config().trace_ast {
                    log::debug!("{} condition at '{path}' parsed as {ast}", condition.kind);
                }
                self.outcome(&ast, path, data_root)
            }
            None => EvalOutcome::fail(FailReason::MissingNode),
        };
        match outcome {
            EvalOutcome::Success(_) => Ok(()),
            EvalOutcome::Fail(reason) => Err(ConditionError::Violated {
                path: path.to_string(),
                kind: condition.kind,
                expression: condition.expression.clone(),
                reason,
            }),
        }
    }

    /// Checks every condition on every data node of `data_root` that carries data.
    ///
    /// The whole tree is visible to every condition. Returns the first violation, in
    /// depth-first order.
    pub fn apply_conditions(&self, data_root: &DataNode) -> Result<(), ConditionError> {
        let mut violation = None;
        data_root.walk(|path, node| {
            if violation.is_some() || !node.has_data() {
                return;
            }
            let Some(schema_node) = self.schema().lookup(path) else {
                return;
            };
            for condition in conditions_of(schema_node) {
                if let Err(err) = self.check_condition(&condition, path, data_root) {
                    log::warn!("{err}");
                    violation = Some(err);
                    return;
                }
            }
        });
        violation.map_or(Ok(()), Err)
    }
}
