//! Built-in functions of YANG constraint expressions.

use crate::context::{EvalContext, StepScope};
use crate::data;
use crate::engine::evaluate_node;
use crate::outcome::{EvalOutcome, FailReason};
use yangcond_traits::SchemaNode;
use yangcond_types::path;
use yangcond_xpath::Node;

/// Dispatches a function call to the correct implementation. Prefixes are ignored.
pub fn evaluate_function<'a, N: SchemaNode<'a>>(
    name: &str,
    args: &[Node],
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    let result = match name {
        "not" => Ok(func_boolean(args, ctx, step_path, scope).negate()),
        "boolean" => Ok(func_boolean(args, ctx, step_path, scope)),
        "current" => Ok(EvalOutcome::with_value(ctx.path)),
        "name" => func_name(args, ctx, step_path, scope),
        "count" => func_count(args, ctx, step_path, scope),
        "derived-from" => func_derived_from(name, args, false, ctx, step_path, scope),
        "derived-from-or-self" => func_derived_from(name, args, true, ctx, step_path, scope),
        "if-feature" => func_if_feature(args, ctx, step_path, scope),
        _ => Err(FailReason::UnknownFunction(name.to_string())),
    };
    result.unwrap_or_else(|reason| {
        log::debug!("{name}() failed: {reason}");
        EvalOutcome::fail(reason)
    })
}

fn expect_args(function: &str, args: &[Node], expected: usize) -> Result<(), FailReason> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FailReason::ArgumentCount {
            function: function.to_string(),
            expected,
            found: args.len(),
        })
    }
}

/// True if any argument holds. Every argument is evaluated.
fn func_boolean<'a, N: SchemaNode<'a>>(
    args: &[Node],
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    let any = args.iter().fold(false, |any, arg| {
        evaluate_node(Some(arg), ctx, step_path, scope).is_success() | any
    });
    EvalOutcome::from_bool(any)
}

/// The last segment of the argument's path.
fn func_name<'a, N: SchemaNode<'a>>(
    args: &[Node],
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> Result<EvalOutcome, FailReason> {
    expect_args("name", args, 1)?;
    let outcome = evaluate_node(args.first(), ctx, step_path, scope);
    if let Some(reason) = outcome.reason() {
        return Err(reason.clone());
    }
    outcome
        .value()
        .and_then(path::last_segment)
        .map(EvalOutcome::with_value)
        .ok_or(FailReason::NoValue)
}

/// The number of children below the argument's path. Absent paths count 0.
fn func_count<'a, N: SchemaNode<'a>>(
    args: &[Node],
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> Result<EvalOutcome, FailReason> {
    expect_args("count", args, 1)?;
    match evaluate_node(args.first(), ctx, step_path, scope) {
        EvalOutcome::Success(resolved) => {
            let at = resolved.value.ok_or(FailReason::NoValue)?;
            Ok(EvalOutcome::with_value(data::child_count(ctx, &at).to_string()))
        }
        EvalOutcome::Fail(FailReason::PathNotFound(_)) => Ok(EvalOutcome::with_value("0")),
        EvalOutcome::Fail(reason) => Err(reason),
    }
}

/// Compares `<idref_prefix>:<name>` of the first argument's schema node (and, for the
/// `-or-self` variant, `<idref_self>:<name>`) with the second argument.
fn func_derived_from<'a, N: SchemaNode<'a>>(
    function: &str,
    args: &[Node],
    or_self: bool,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> Result<EvalOutcome, FailReason> {
    expect_args(function, args, 2)?;
    let target = evaluate_node(args.first(), ctx, step_path, scope);
    let identity = evaluate_node(args.get(1), ctx, step_path, scope);

    let at = target.value().ok_or(FailReason::NoValue)?;
    let identity = identity.value().ok_or(FailReason::NoValue)?;
    let schema_node = ctx
        .schema
        .lookup(at)
        .ok_or_else(|| FailReason::NoSchemaNode(at.to_string()))?;

    let name = schema_node.name();
    let qualified_by = |attribute: &str| {
        schema_node
            .attribute(attribute)
            .is_some_and(|prefix| format!("{prefix}:{name}") == identity)
    };
    Ok(EvalOutcome::from_bool(
        qualified_by("idref_prefix") || (or_self && qualified_by("idref_self")),
    ))
}

/// A string argument names a feature directly. Any other argument is evaluated with
/// name tests resolving to feature checks, so `if-feature(a or b)` works.
fn func_if_feature<'a, N: SchemaNode<'a>>(
    args: &[Node],
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> Result<EvalOutcome, FailReason> {
    expect_args("if-feature", args, 1)?;
    match args.first() {
        Some(Node::String(feature)) if feature_enabled(ctx, feature) => {
            Ok(EvalOutcome::with_value(feature.as_str()))
        }
        Some(Node::String(feature)) => Err(FailReason::FeatureDisabled(feature.clone())),
        arg => Ok(evaluate_node(arg, &ctx.for_if_feature(), step_path, scope)),
    }
}

/// Walks from the context node's schema node towards the root and checks the first
/// non-empty `features` attribute for `feature` as a substring.
pub fn feature_enabled<'a, N: SchemaNode<'a>>(ctx: &EvalContext<'a, '_, N>, feature: &str) -> bool {
    let mut node = ctx.schema.lookup(ctx.path);
    while let Some(current) = node {
        if let Some(features) = current.features().filter(|f| !f.is_empty()) {
            return features.contains(feature);
        }
        node = current.parent();
    }
    false
}
