//! Defines the Abstract Syntax Tree (AST) for constraint expressions.
//!
//! Subtrees are optional wherever a malformed expression can leave a hole: the parser
//! always produces a best-effort tree, and evaluation treats a missing subtree as false.

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A string literal, quotes removed.
    String(String),
    /// A number literal, kept as its source text.
    Number(String),
    /// A binary operator, or a unary minus whose operand sits in `left`.
    Operator {
        op: Operator,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
    /// One axis step with its node test.
    Axis {
        axis: Axis,
        node_type: NodeType,
        prefix: Option<String>,
        name: Option<String>,
    },
    /// Joins a step (or filter expression) to the rest of a location path.
    Step {
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
    Predicate {
        base: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        reverse_step: bool,
    },
    Variable {
        prefix: Option<String>,
        name: Option<String>,
    },
    Function {
        prefix: Option<String>,
        name: String,
        args: Vec<Node>,
    },
}

impl Node {
    /// True for nodes whose value is numeric by construction: number literals,
    /// arithmetic operators and unary minus.
    pub fn is_numeric(&self) -> bool {
        match self {
            Node::Number(_) => true,
            Node::Operator { op, .. } => op.is_arithmetic(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Logical
    Or,
    And,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    UnaryMinus,
    // Node-set
    Union,
}

impl Operator {
    /// Binding strength used by the precedence-climbing parser. Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Eq | Operator::Ne => 3,
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => 4,
            Operator::Plus | Operator::Minus => 5,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 6,
            Operator::UnaryMinus => 7,
            Operator::Union => 8,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Plus
                | Operator::Minus
                | Operator::Multiply
                | Operator::Divide
                | Operator::Modulo
                | Operator::UnaryMinus
        )
    }

    /// The operator's spelling in expression text.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Plus => "+",
            Operator::Minus | Operator::UnaryMinus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "div",
            Operator::Modulo => "mod",
            Operator::Union => "|",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The document root, produced by a leading `/`. Has no textual axis name.
    Root,
    Ancestor,
    AncestorOrSelf,
    Attribute,
    Child,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Namespace,
    Parent,
    Preceding,
    PrecedingSibling,
    SelfAxis,
}

impl Axis {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "attribute" => Axis::Attribute,
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "following" => Axis::Following,
            "following-sibling" => Axis::FollowingSibling,
            "namespace" => Axis::Namespace,
            "parent" => Axis::Parent,
            "preceding" => Axis::Preceding,
            "preceding-sibling" => Axis::PrecedingSibling,
            "self" => Axis::SelfAxis,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Root => "",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::Attribute => "attribute",
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Following => "following",
            Axis::FollowingSibling => "following-sibling",
            Axis::Namespace => "namespace",
            Axis::Parent => "parent",
            Axis::Preceding => "preceding",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::SelfAxis => "self",
        }
    }

    /// Axes that walk backwards in document order.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::Preceding | Axis::PrecedingSibling
        )
    }
}

/// The node-type part of a node test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Unknown,
    /// `node()`
    All,
    Text,
    ProcessingInstruction,
    Comment,
    Attribute,
    Namespace,
}

impl NodeType {
    /// Matches the node-type test keywords that may precede `(`.
    pub fn from_test_name(name: &str) -> Option<Self> {
        Some(match name {
            "node" => NodeType::All,
            "text" => NodeType::Text,
            "comment" => NodeType::Comment,
            "processing-instruction" => NodeType::ProcessingInstruction,
            _ => return None,
        })
    }

    /// The type a name test selects on the given axis.
    pub fn principal(axis: Axis) -> Self {
        match axis {
            Axis::Attribute => NodeType::Attribute,
            Axis::Namespace => NodeType::Namespace,
            _ => NodeType::Unknown,
        }
    }

    pub fn test_name(self) -> Option<&'static str> {
        match self {
            NodeType::All => Some("node"),
            NodeType::Text => Some("text"),
            NodeType::Comment => Some("comment"),
            NodeType::ProcessingInstruction => Some("processing-instruction"),
            NodeType::Unknown | NodeType::Attribute | NodeType::Namespace => None,
        }
    }
}
