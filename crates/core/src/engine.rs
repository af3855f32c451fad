//! The evaluation engine for running a parsed constraint expression against a data tree.

use crate::axes::evaluate_axis;
use crate::config::EvalConfig;
use crate::context::{EvalContext, StepScope};
use crate::data;
use crate::functions::evaluate_function;
use crate::operators::evaluate_operator;
use crate::outcome::{EvalOutcome, FailReason, Resolved};
use std::marker::PhantomData;
use yangcond_traits::{DataStore, SchemaNode};
use yangcond_types::DataNode;
use yangcond_xpath::Node;

/// Evaluates one AST node. A missing node evaluates to false.
pub fn evaluate_node<'a, N: SchemaNode<'a>>(
    node: Option<&Node>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    let Some(node) = node else {
        return EvalOutcome::fail(FailReason::MissingNode);
    };

    match node {
        Node::String(value) | Node::Number(value) => EvalOutcome::with_value(value.as_str()),
        Node::Operator { op, left, right } => {
            evaluate_operator(*op, left.as_deref(), right.as_deref(), ctx, step_path, scope)
        }
        Node::Axis { axis, name, .. } => evaluate_axis(*axis, name.as_deref(), ctx, step_path, scope),
        Node::Step { left, right } => evaluate_step(left.as_deref(), right.as_deref(), ctx, step_path),
        Node::Predicate {
            base, condition, ..
        } => evaluate_predicate(base.as_deref(), condition.as_deref(), ctx, step_path, scope),
        Node::Variable { name, .. } => {
            let name = name.clone().unwrap_or_default();
            log::debug!("Variable '${name}' has no binding");
            EvalOutcome::fail(FailReason::UnresolvedVariable(name))
        }
        Node::Function { name, args, .. } => evaluate_function(name, args, ctx, step_path, scope),
    }
}

/// Resolves `left` to a path, extends it with `right`, then checks that the resulting
/// path holds data. The first-child rule is scoped to this step.
fn evaluate_step<'a, N: SchemaNode<'a>>(
    left: Option<&Node>,
    right: Option<&Node>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
) -> EvalOutcome {
    let mut scope = StepScope::default();
    let working = step_path.unwrap_or(ctx.path);

    let left_outcome = evaluate_node(left, ctx, Some(working), &mut scope);
    let next_path = left_outcome.value().unwrap_or(working).to_string();

    let resolved = match right {
        Some(right) => {
            let right_outcome = evaluate_node(Some(right), ctx, Some(&next_path), &mut scope);
            match (left_outcome, right_outcome) {
                (EvalOutcome::Success(_), EvalOutcome::Success(resolved)) => resolved,
                (EvalOutcome::Fail(reason), _) | (_, EvalOutcome::Fail(reason)) => {
                    return EvalOutcome::fail(reason);
                }
            }
        }
        None => match left_outcome {
            EvalOutcome::Success(resolved) => resolved,
            failed => return failed,
        },
    };

    resolve_existing(ctx, resolved)
}

/// Checks that the path in `resolved` holds data and captures the value stored there.
pub(crate) fn resolve_existing<'a, N: SchemaNode<'a>>(
    ctx: &EvalContext<'a, '_, N>,
    resolved: Resolved,
) -> EvalOutcome {
    let Some(path) = resolved.value else {
        return EvalOutcome::fail(FailReason::NoValue);
    };
    match data::step_exists(ctx, &path) {
        Some(stored) => EvalOutcome::Success(Resolved {
            value: Some(path),
            step_value: stored,
        }),
        None => {
            log::trace!("No data at '{path}'");
            EvalOutcome::fail(FailReason::PathNotFound(path))
        }
    }
}

/// Evaluates `base`, then `condition` with the base's value as the step path.
fn evaluate_predicate<'a, N: SchemaNode<'a>>(
    base: Option<&Node>,
    condition: Option<&Node>,
    ctx: &EvalContext<'a, '_, N>,
    step_path: Option<&str>,
    scope: &mut StepScope,
) -> EvalOutcome {
    let base_outcome = evaluate_node(base, ctx, step_path, scope);
    let Some(condition) = condition else {
        return base_outcome;
    };
    if !base_outcome.is_success() {
        return base_outcome;
    }
    match evaluate_node(Some(condition), ctx, base_outcome.value(), scope) {
        EvalOutcome::Success(Resolved { value: None, .. }) => base_outcome,
        held => held,
    }
}

/// Evaluates constraint expressions against one schema and one backing store.
///
/// `'a` is the lifetime of the schema; `'d` the lifetime of the store.
#[derive(Debug)]
pub struct Evaluator<'a, 'd, N: SchemaNode<'a>> {
    schema: N,
    store: &'d dyn DataStore,
    config: EvalConfig,
    _marker: PhantomData<&'a ()>,
}

impl<'a, 'd, N: SchemaNode<'a>> Evaluator<'a, 'd, N> {
    pub fn new(schema: N, store: &'d dyn DataStore) -> Self {
        Self {
            schema,
            store,
            config: EvalConfig::default(),
            _marker: PhantomData,
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn schema(&self) -> N {
        self.schema
    }

    /// Evaluates `ast` with `path` as the context node. True when the expression holds.
    pub fn evaluate(&self, ast: &Node, path: &str, data_root: &DataNode) -> bool {
        self.outcome(ast, path, data_root).is_success()
    }

    /// Like [`Evaluator::evaluate`], keeping the reason when the expression does not hold.
    pub fn outcome(&self, ast: &Node, path: &str, data_root: &DataNode) -> EvalOutcome {
        let ctx = EvalContext::new(path, data_root, self.schema, self.store, &self.config);
        let mut scope = StepScope::default();
        let outcome = evaluate_node(Some(ast), &ctx, None, &mut scope);
        if let Some(reason) = outcome.reason() {
            log::debug!("'{ast}' is false at '{path}': {reason}");
        }
        outcome
    }

    /// Parses and evaluates `expr` in one go. An expression that does not parse is false.
    pub fn process_condition(&self, expr: &str, path: &str, data_root: &DataNode) -> bool {
        let Some(ast) = yangcond_xpath::parse(expr) else {
            log::debug!("Condition '{expr}' did not parse");
            return false;
        };
        if self.config.trace_ast {
            log::debug!("Condition '{expr}' parsed as {ast}");
        }
        self.evaluate(&ast, path, data_root)
    }
}

/// Evaluates `ast` at `path` with the default configuration.
pub fn evaluate<'a, N: SchemaNode<'a>>(
    ast: &Node,
    path: &str,
    data_root: &DataNode,
    schema: N,
    store: &dyn DataStore,
) -> bool {
    Evaluator::new(schema, store).evaluate(ast, path, data_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yangcond_traits::{InMemoryStore, NoStore, SchemaTree};
    use yangcond_xpath::parse;

    fn interfaces_schema() -> SchemaTree {
        let mut tree = SchemaTree::new();
        let root = tree.root_id();
        let interfaces = tree.add_node(root, "interfaces");
        let list = tree.add_node(interfaces, "interface");
        let entry = tree.add_node(list, "*");
        for leaf in ["name", "type", "mtu"] {
            let id = tree.add_node(entry, leaf);
            tree.set_attribute(id, "mode", "rw");
        }
        let enabled = tree.add_node(entry, "enabled");
        tree.set_attribute(enabled, "mode", "rw");
        tree.add_value(enabled, "true", "1");
        tree.add_value(enabled, "false", "0");
        tree
    }

    fn interfaces_data() -> DataNode {
        let eth0 = DataNode::new("eth0")
            .with_child(DataNode::leaf("name", "eth0"))
            .with_child(DataNode::leaf("type", "ethernetCsmacd"))
            .with_child(DataNode::leaf("mtu", "1500"))
            .with_child(DataNode::leaf("enabled", "1"));
        DataNode::new("/").with_child(
            DataNode::new("interfaces").with_child(DataNode::new("interface").with_child(eth0)),
        )
    }

    fn holds(expr: &str, path: &str) -> bool {
        let schema = interfaces_schema();
        let data = interfaces_data();
        Evaluator::new(schema.root(), &NoStore).process_condition(expr, path, &data)
    }

    #[test]
    fn test_current_child_value_comparison() {
        let schema = SchemaTree::new();
        let data = DataNode::new("/").with_child(DataNode::new("a").with_child(DataNode::leaf("b", "x")));
        let ast = parse("current()/b = 'x'").unwrap();
        assert!(evaluate(&ast, "/a", &data, schema.root(), &NoStore));
        let ast = parse("current()/b = 'y'").unwrap();
        assert!(!evaluate(&ast, "/a", &data, schema.root(), &NoStore));
    }

    #[test]
    fn test_step_resolves_value() {
        let schema = interfaces_schema();
        let data = interfaces_data();
        let evaluator = Evaluator::new(schema.root(), &NoStore);
        let ast = parse("/interfaces/interface/eth0/mtu").unwrap();
        let outcome = evaluator.outcome(&ast, "/interfaces", &data);
        assert_eq!(outcome.value(), Some("/interfaces/interface/eth0/mtu"));
        assert_eq!(outcome.step_value(), Some("1500"));
    }

    #[test]
    fn test_missing_path_fails() {
        let schema = interfaces_schema();
        let data = interfaces_data();
        let evaluator = Evaluator::new(schema.root(), &NoStore);
        let ast = parse("/interfaces/interface/eth1/mtu").unwrap();
        assert_eq!(
            evaluator.outcome(&ast, "/interfaces", &data).reason(),
            Some(&FailReason::PathNotFound(
                "/interfaces/interface/eth1/mtu".to_string()
            ))
        );
    }

    #[test]
    fn test_absolute_path_comparisons() {
        let path = "/interfaces/interface/eth0/mtu";
        assert!(holds("/interfaces/interface/eth0/mtu = '1500'", path));
        assert!(holds("/interfaces/interface/eth0/mtu != '9000'", path));
        assert!(holds("/interfaces/interface/eth0/type = 'ianaift:ethernetCsmacd'", path));
    }

    #[test]
    fn test_bare_name_operand_reads_stored_value() {
        let path = "/interfaces/interface/eth0";
        assert!(holds("name = 'eth0'", path));
        assert!(!holds("name = 'eth1'", path));
        assert!(holds("count(mtu) = 0", path));
    }

    #[test]
    fn test_location_operand_of_arithmetic_fails() {
        let schema = interfaces_schema();
        let data = interfaces_data();
        let evaluator = Evaluator::new(schema.root(), &NoStore);
        let ast = parse("current()/mtu = 1500").unwrap();
        assert_eq!(
            evaluator.outcome(&ast, "/interfaces/interface/eth0", &data).reason(),
            Some(&FailReason::StepOperand)
        );
    }

    #[test]
    fn test_step_value_is_translated() {
        let path = "/interfaces/interface/eth0/mtu";
        assert!(holds("/interfaces/interface/eth0/enabled = 'true'", path));
        assert!(!holds("/interfaces/interface/eth0/enabled = 'false'", path));
    }

    #[test]
    fn test_relative_paths() {
        let path = "/interfaces/interface/eth0/mtu";
        assert!(holds("../type = 'ianaift:ethernetCsmacd'", path));
        assert!(holds("current()/../name = 'eth0'", path));
        assert!(!holds("../missing = 'x'", path));
    }

    #[test]
    fn test_predicate_evaluates_condition_at_base() {
        let path = "/interfaces";
        assert!(holds("/interfaces/interface/eth0[mtu = '1500']", path));
        assert!(!holds("/interfaces/interface/eth0[mtu = '9000']", path));
    }

    #[test]
    fn test_malformed_expression_is_false() {
        assert!(!holds("1 +", "/interfaces"));
        assert!(!holds("", "/interfaces"));
        assert!(!holds("(((", "/interfaces"));
        assert!(!holds("1 div 0", "/interfaces"));
    }

    #[test]
    fn test_variables_are_unresolved() {
        let schema = interfaces_schema();
        let data = interfaces_data();
        let evaluator = Evaluator::new(schema.root(), &NoStore);
        let ast = parse("$mtu").unwrap();
        assert_eq!(
            evaluator.outcome(&ast, "/interfaces", &data).reason(),
            Some(&FailReason::UnresolvedVariable("mtu".to_string()))
        );
    }

    #[test]
    fn test_store_fallback() {
        let schema = interfaces_schema();
        let data = DataNode::new("/");
        let store = InMemoryStore::new();
        store.set("/interfaces/interface/eth1/mtu", "9000").unwrap();

        let evaluator = Evaluator::new(schema.root(), &store);
        assert!(evaluator.process_condition(
            "/interfaces/interface/eth1/mtu = '9000'",
            "/interfaces",
            &data
        ));

        let evaluator = evaluator.with_config(EvalConfig::default().with_store_fallback(false));
        assert!(!evaluator.process_condition(
            "/interfaces/interface/eth1/mtu = '9000'",
            "/interfaces",
            &data
        ));
    }

    #[test]
    fn test_tree_shadows_store() {
        let schema = interfaces_schema();
        let data = interfaces_data();
        let store = InMemoryStore::new();
        store.set("/interfaces/interface/eth0/mtu", "9000").unwrap();
        let evaluator = Evaluator::new(schema.root(), &store);
        assert!(evaluator.process_condition(
            "/interfaces/interface/eth0/mtu = '1500'",
            "/interfaces",
            &data
        ));
    }
}
