//! The result of evaluating one AST node.
//!
//! Callers of [`crate::Evaluator::evaluate`] only see a boolean. Internally every node
//! evaluates to an [`EvalOutcome`] so that the reason for a `false` stays available.

use thiserror::Error;
use yangcond_xpath::Axis;

/// What a successful node produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    /// The node's value: a literal, a number, or the path a location step resolved to.
    pub value: Option<String>,
    /// For a Step, the value stored at the path it resolved to.
    pub step_value: Option<String>,
}

/// Why a node evaluated to false.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    #[error("expression is incomplete")]
    MissingNode,

    #[error("condition does not hold")]
    NotSatisfied,

    #[error("no data at '{0}'")]
    PathNotFound(String),

    #[error("no schema node at '{0}'")]
    NoSchemaNode(String),

    #[error("'{0}' has no parent")]
    NoParent(String),

    #[error("axis '{}' is not supported", .0.name())]
    UnsupportedAxis(Axis),

    #[error("wildcard and node-type tests cannot be resolved to a path")]
    UnnamedNodeTest,

    #[error("node-set union is not supported")]
    UnsupportedUnion,

    #[error("variable '${0}' is not bound")]
    UnresolvedVariable(String),

    #[error("unknown function '{0}()'")]
    UnknownFunction(String),

    #[error("{function}() expects {expected} argument(s), got {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("operand has no value")]
    NoValue,

    #[error("'{0}' is not an integer")]
    NotANumber(String),

    #[error("location path used as an arithmetic operand")]
    StepOperand,

    #[error("operator requires numeric operands")]
    NonNumericOperands,

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("feature '{0}' is not enabled")]
    FeatureDisabled(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    Success(Resolved),
    Fail(FailReason),
}

impl EvalOutcome {
    /// A success carrying no value, as produced by comparisons and logical operators.
    pub fn success() -> Self {
        EvalOutcome::Success(Resolved::default())
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        EvalOutcome::Success(Resolved {
            value: Some(value.into()),
            step_value: None,
        })
    }

    pub fn fail(reason: FailReason) -> Self {
        EvalOutcome::Fail(reason)
    }

    /// `success()` when `holds`, otherwise a `NotSatisfied` failure.
    pub fn from_bool(holds: bool) -> Self {
        if holds {
            Self::success()
        } else {
            Self::fail(FailReason::NotSatisfied)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EvalOutcome::Success(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            EvalOutcome::Success(resolved) => resolved.value.as_deref(),
            EvalOutcome::Fail(_) => None,
        }
    }

    pub fn step_value(&self) -> Option<&str> {
        match self {
            EvalOutcome::Success(resolved) => resolved.step_value.as_deref(),
            EvalOutcome::Fail(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&FailReason> {
        match self {
            EvalOutcome::Success(_) => None,
            EvalOutcome::Fail(reason) => Some(reason),
        }
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            EvalOutcome::Success(resolved) => resolved.value,
            EvalOutcome::Fail(_) => None,
        }
    }

    /// Logical negation. The value of a success is not carried over.
    pub fn negate(self) -> Self {
        Self::from_bool(!self.is_success())
    }
}

impl From<EvalOutcome> for bool {
    fn from(outcome: EvalOutcome) -> Self {
        outcome.is_success()
    }
}
