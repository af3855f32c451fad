//! Binary operators and unary minus.
//!
//! Both operands are always evaluated. An operator takes the numeric path when its
//! right operand (for unary minus, its only operand) is numeric by construction;
//! otherwise `=` and `!=` compare strings and everything else fails.
//!
//! A bare name test used as an operand is resolved like a one-step location path, so
//! `name = 'eth0'` reads the value stored at `name`.

use crate::context::{EvalContext, StepScope};
use crate::data;
use crate::engine::{evaluate_node, resolve_existing};
use crate::outcome::{EvalOutcome, FailReason};
use yangcond_traits::SchemaNode;
use yangcond_types::path;
use yangcond_xpath::{Node, Operator};

pub fn evaluate_operator<'a, N: SchemaNode<'a>>(
    op: Operator,
    left: Option<&Node>,
    right: Option<&Node>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    if op == Operator::Union {
        log::debug!("Union of node sets is not supported");
        return EvalOutcome::fail(FailReason::UnsupportedUnion);
    }

    let left_outcome = evaluate_operand(left, ctx, step_path, scope);
    let right_outcome = match right {
        Some(right) => evaluate_operand(Some(right), ctx, step_path, scope),
        None => EvalOutcome::fail(FailReason::MissingNode),
    };

    match op {
        Operator::Or => {
            return EvalOutcome::from_bool(left_outcome.is_success() || right_outcome.is_success());
        }
        Operator::And => {
            return EvalOutcome::from_bool(left_outcome.is_success() && right_outcome.is_success());
        }
        _ => {}
    }

    let numeric = match op {
        Operator::UnaryMinus => left.is_some_and(Node::is_numeric),
        _ => right.is_some_and(Node::is_numeric),
    };

    let mut right_value = operand_value(right, &right_outcome);
    if !numeric {
        right_value = right_value.map(|value| path::strip_qualifier(&value).to_string());
    }

    let mut left_value = left_outcome.value().map(str::to_string);
    if left_outcome.is_success() {
        match left {
            Some(Node::Function { name, .. }) if name == "current" || name == "boolean" => {
                left_value = left_value.and_then(|at| data::stored_value(ctx, &at));
            }
            Some(node) if is_location(node) => {
                if let (Some(at), Some(value)) = (left_value.as_deref(), right_value.as_deref()) {
                    if let Some(schema_node) = ctx.schema.lookup(at) {
                        right_value = Some(schema_node.translate_from(value));
                    }
                }
                left_value = left_outcome.step_value().map(str::to_string);
            }
            _ => {}
        }
    }

    let result = if numeric {
        if left.is_some_and(is_location) {
            log::debug!("Location path used as operand of '{}'", op.symbol());
            Err(FailReason::StepOperand)
        } else {
            numeric_operator(op, left_value.as_deref(), right_value.as_deref())
        }
    } else {
        string_operator(op, &left_outcome, &right_outcome, left_value, right_value)
    };
    result.unwrap_or_else(|reason| {
        if reason != FailReason::NotSatisfied {
            log::debug!("Operator '{}' failed: {reason}", op.symbol());
        }
        EvalOutcome::fail(reason)
    })
}

fn evaluate_operand<'a, N: SchemaNode<'a>>(
    node: Option<&Node>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    let outcome = evaluate_node(node, ctx, step_path, scope);
    match (node, outcome) {
        (Some(Node::Axis { .. }), EvalOutcome::Success(resolved)) if !ctx.in_if_feature => {
            resolve_existing(ctx, resolved)
        }
        (_, outcome) => outcome,
    }
}

fn is_location(node: &Node) -> bool {
    matches!(node, Node::Step { .. } | Node::Axis { .. })
}

/// A location operand compares by the value stored at its path rather than the path.
fn operand_value(node: Option<&Node>, outcome: &EvalOutcome) -> Option<String> {
    match node {
        Some(node) if is_location(node) => outcome.step_value().map(str::to_string),
        _ => outcome.value().map(str::to_string),
    }
}

fn parse_integer(value: Option<&str>) -> Result<i64, FailReason> {
    let value = value.ok_or(FailReason::NoValue)?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| FailReason::NotANumber(value.to_string()))
}

fn checked(result: Option<i64>) -> Result<EvalOutcome, FailReason> {
    result
        .map(|n| EvalOutcome::with_value(n.to_string()))
        .ok_or(FailReason::Overflow)
}

fn numeric_operator(
    op: Operator,
    left: Option<&str>,
    right: Option<&str>,
) -> Result<EvalOutcome, FailReason> {
    let l = parse_integer(left)?;
    if op == Operator::UnaryMinus {
        return checked(l.checked_neg());
    }
    let r = parse_integer(right)?;
    match op {
        Operator::Eq => Ok(EvalOutcome::from_bool(l == r)),
        Operator::Ne => Ok(EvalOutcome::from_bool(l != r)),
        Operator::Lt => Ok(EvalOutcome::from_bool(l < r)),
        Operator::Le => Ok(EvalOutcome::from_bool(l <= r)),
        Operator::Gt => Ok(EvalOutcome::from_bool(l > r)),
        Operator::Ge => Ok(EvalOutcome::from_bool(l >= r)),
        Operator::Plus => checked(l.checked_add(r)),
        Operator::Minus => checked(l.checked_sub(r)),
        Operator::Multiply => checked(l.checked_mul(r)),
        Operator::Divide if r == 0 => Err(FailReason::DivisionByZero),
        Operator::Divide => checked(l.checked_div(r)),
        Operator::Modulo if r == 0 => Err(FailReason::DivisionByZero),
        Operator::Modulo => checked(l.checked_rem(r)),
        Operator::Or | Operator::And | Operator::UnaryMinus | Operator::Union => {
            Err(FailReason::NonNumericOperands)
        }
    }
}

fn string_operator(
    op: Operator,
    left_outcome: &EvalOutcome,
    right_outcome: &EvalOutcome,
    left: Option<String>,
    right: Option<String>,
) -> Result<EvalOutcome, FailReason> {
    if !matches!(op, Operator::Eq | Operator::Ne) {
        return Err(FailReason::NonNumericOperands);
    }
    for outcome in [left_outcome, right_outcome] {
        if let Some(reason) = outcome.reason() {
            return Err(reason.clone());
        }
    }
    let equal = left == right;
    Ok(EvalOutcome::from_bool(if op == Operator::Eq { equal } else { !equal }))
}
