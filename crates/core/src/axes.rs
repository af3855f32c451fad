//! Path building for each axis.
//!
//! Axes do not select nodes here. Each one turns the current step path into the
//! path of the node it addresses; the enclosing Step checks that the path exists.

use crate::context::{EvalContext, StepScope};
use crate::outcome::{EvalOutcome, FailReason};
use yangcond_traits::SchemaNode;
use yangcond_types::path;
use yangcond_xpath::Axis;

pub fn evaluate_axis<'a, N: SchemaNode<'a>>(
    axis: Axis,
    name: Option<&str>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    match axis {
        Axis::Child => child(name, ctx, step_path, scope),
        Axis::Attribute => attribute(name, ctx, step_path),
        Axis::Parent => parent(ctx, step_path),
        Axis::SelfAxis => self_axis(ctx, step_path),
        Axis::Root => EvalOutcome::with_value(""),
        other => {
            log::debug!("Axis '{}' is not supported", other.name());
            EvalOutcome::fail(FailReason::UnsupportedAxis(other))
        }
    }
}

/// `<base>/<name>`, where the first child test of a step taken from the context node
/// itself is re-anchored at the context node's parent when that parent is a plain
/// container.
fn child<'a, N: SchemaNode<'a>>(
    name: Option<&str>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    let Some(name) = name else {
        return EvalOutcome::fail(FailReason::UnnamedNodeTest);
    };

    if ctx.in_if_feature {
        return if crate::functions::feature_enabled(ctx, name) {
            EvalOutcome::with_value(name)
        } else {
            EvalOutcome::fail(FailReason::FeatureDisabled(name.to_string()))
        };
    }

    let mut base = step_path.unwrap_or(ctx.path);
    if !scope.first_child_done && step_path == Some(ctx.path) {
        let container_parent = ctx
            .schema
            .lookup(ctx.path)
            .and_then(|node| node.parent())
            .is_some_and(|parent| !parent.is_leaf_list() && !parent.is_list() && !parent.is_leaf());
        if container_parent {
            base = path::parent(base).unwrap_or(base);
            scope.first_child_done = true;
        }
    }
    EvalOutcome::with_value(path::join(base, name))
}

fn attribute<'a, N: SchemaNode<'a>>(
    name: Option<&str>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
) -> EvalOutcome {
    match name {
        Some(name) => EvalOutcome::with_value(path::join(step_path.unwrap_or(ctx.path), name)),
        None => EvalOutcome::fail(FailReason::UnnamedNodeTest),
    }
}

fn parent<'a, N: SchemaNode<'a>>(ctx: &EvalContext<'a, '_, N>, step_path: Option<&str>) -> EvalOutcome {
    let base = step_path.unwrap_or(ctx.path);
    match path::parent(base) {
        Some(parent) => EvalOutcome::with_value(parent),
        None => EvalOutcome::fail(FailReason::NoParent(base.to_string())),
    }
}

/// A step path that has moved away from the context node is its own self; at the
/// context node `.` addresses the enclosing node, as `..` does.
fn self_axis<'a, N: SchemaNode<'a>>(
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
) -> EvalOutcome {
    match step_path {
        Some(current) if current != ctx.path => EvalOutcome::with_value(current),
        _ => parent(ctx, step_path),
    }
}
