//! Canonical serialization of the AST.
//!
//! The output spells every axis out (`child::a`, `parent::node()`) and wraps every
//! binary operator in parentheses, so re-parsing it yields a structurally equal tree.

use crate::ast::{Axis, Node, NodeType, Operator};
use std::fmt;

/// Displays an optional subtree, printing nothing for a hole.
struct Hole<'a>(Option<&'a Node>);

impl fmt::Display for Hole<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(node) => write!(f, "{node}"),
            None => Ok(()),
        }
    }
}

fn write_node_test(
    f: &mut fmt::Formatter<'_>,
    node_type: NodeType,
    prefix: Option<&str>,
    name: Option<&str>,
) -> fmt::Result {
    if let Some(test) = node_type.test_name() {
        return match name {
            Some(literal) => write!(f, "{test}('{literal}')"),
            None => write!(f, "{test}()"),
        };
    }
    match (prefix, name) {
        (Some(prefix), Some(name)) => write!(f, "{prefix}:{name}"),
        (Some(prefix), None) => write!(f, "{prefix}:*"),
        (None, Some(name)) => f.write_str(name),
        (None, None) => f.write_str("*"),
    }
}

/// Whether a predicate base must be parenthesised to keep its shape on re-parse.
fn predicate_base_needs_parens(base: Option<&Node>, reverse_step: bool) -> bool {
    match base {
        Some(Node::Axis {
            axis: Axis::Root, ..
        }) => true,
        Some(Node::Axis { axis, .. }) => reverse_step != axis.is_reverse(),
        Some(Node::Step { .. }) => true,
        _ => false,
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::String(value) if value.contains('\'') => write!(f, "\"{value}\""),
            Node::String(value) => write!(f, "'{value}'"),
            Node::Number(text) => f.write_str(text),
            Node::Operator {
                op: Operator::UnaryMinus,
                left,
                ..
            } => write!(f, "(-{})", Hole(left.as_deref())),
            Node::Operator { op, left, right } => write!(
                f,
                "({} {} {})",
                Hole(left.as_deref()),
                op.symbol(),
                Hole(right.as_deref())
            ),
            Node::Axis {
                axis: Axis::Root, ..
            } => f.write_str("/"),
            Node::Axis {
                axis,
                node_type,
                prefix,
                name,
            } => {
                write!(f, "{}::", axis.name())?;
                write_node_test(f, *node_type, prefix.as_deref(), name.as_deref())
            }
            Node::Step { left, right } => match left.as_deref() {
                Some(Node::Axis {
                    axis: Axis::Root, ..
                }) => write!(f, "/{}", Hole(right.as_deref())),
                Some(step @ Node::Step { .. }) => {
                    write!(f, "({step})/{}", Hole(right.as_deref()))
                }
                other => write!(f, "{}/{}", Hole(other), Hole(right.as_deref())),
            },
            Node::Predicate {
                base,
                condition,
                reverse_step,
            } => {
                if predicate_base_needs_parens(base.as_deref(), *reverse_step) {
                    write!(f, "({})", Hole(base.as_deref()))?;
                } else {
                    write!(f, "{}", Hole(base.as_deref()))?;
                }
                write!(f, "[{}]", Hole(condition.as_deref()))
            }
            Node::Variable { prefix, name } => {
                f.write_str("$")?;
                if let Some(prefix) = prefix {
                    write!(f, "{prefix}:")?;
                }
                f.write_str(name.as_deref().unwrap_or_default())
            }
            Node::Function { prefix, name, args } => {
                if let Some(prefix) = prefix {
                    write!(f, "{prefix}:")?;
                }
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
