//! The node-construction strategy the parser calls through.
//!
//! The parser never constructs nodes itself. Every grammar production ends in a call
//! on an [`AstBuilder`], so the same parser can produce the owned [`Node`] tree,
//! a compact S-expression for tests, or a host-specific representation. A builder is
//! passed per parse, which lets independent parses with different builders coexist.

use crate::ast::{Axis, Node, NodeType, Operator};

pub trait AstBuilder {
    type Node;

    /// Called once before the first token is parsed.
    fn start_build(&mut self) {}

    /// Called once with the final result; may post-process it.
    fn end_build(&mut self, result: Option<Self::Node>) -> Option<Self::Node> {
        result
    }

    fn string(&mut self, value: String) -> Self::Node;

    fn number(&mut self, text: &str) -> Self::Node;

    /// Builds a binary operator, or a unary minus with its operand in `left`.
    fn operator(
        &mut self,
        op: Operator,
        left: Option<Self::Node>,
        right: Option<Self::Node>,
    ) -> Self::Node;

    fn axis(
        &mut self,
        axis: Axis,
        node_type: NodeType,
        prefix: Option<String>,
        name: Option<String>,
    ) -> Self::Node;

    fn join_step(&mut self, left: Option<Self::Node>, right: Option<Self::Node>) -> Self::Node;

    fn predicate(
        &mut self,
        base: Option<Self::Node>,
        condition: Option<Self::Node>,
        reverse_step: bool,
    ) -> Self::Node;

    fn variable(&mut self, prefix: Option<String>, name: Option<String>) -> Self::Node;

    fn function(&mut self, prefix: Option<String>, name: String, args: Vec<Self::Node>)
    -> Self::Node;
}

/// Builds the owned [`Node`] tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl AstBuilder for TreeBuilder {
    type Node = Node;

    fn string(&mut self, value: String) -> Node {
        Node::String(value)
    }

    fn number(&mut self, text: &str) -> Node {
        Node::Number(text.to_string())
    }

    fn operator(&mut self, op: Operator, left: Option<Node>, right: Option<Node>) -> Node {
        Node::Operator {
            op,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    fn axis(
        &mut self,
        axis: Axis,
        node_type: NodeType,
        prefix: Option<String>,
        name: Option<String>,
    ) -> Node {
        Node::Axis {
            axis,
            node_type,
            prefix,
            name,
        }
    }

    fn join_step(&mut self, left: Option<Node>, right: Option<Node>) -> Node {
        Node::Step {
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    fn predicate(&mut self, base: Option<Node>, condition: Option<Node>, reverse_step: bool) -> Node {
        Node::Predicate {
            base: base.map(Box::new),
            condition: condition.map(Box::new),
            reverse_step,
        }
    }

    fn variable(&mut self, prefix: Option<String>, name: Option<String>) -> Node {
        Node::Variable { prefix, name }
    }

    fn function(&mut self, prefix: Option<String>, name: String, args: Vec<Node>) -> Node {
        Node::Function { prefix, name, args }
    }
}
