//! A precedence-climbing parser for constraint expressions.
//!
//! The grammar is the XPath 1.0 expression grammar. Binary operators are parsed by
//! precedence climbing over [`Operator::precedence`]; everything below the operator
//! level (union, path, filter, primary and step productions) is recursive descent.
//!
//! Parsing never fails outright. Structural problems are recorded as diagnostics and
//! the parser carries on with whatever it has, so callers always get a best-effort
//! tree (possibly with holes, possibly absent).

use crate::ast::{Axis, Node, NodeType, Operator};
use crate::builder::{AstBuilder, TreeBuilder};
use crate::error::XPathError;
use crate::scanner::Scanner;
use crate::token::TokenKind;

/// How deep sub-expressions and relative paths may nest before parsing gives up on them.
pub const MAX_DEPTH: usize = 128;

/// The outcome of a parse: the built tree, if any, plus every diagnostic raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<N> {
    pub ast: Option<N>,
    pub issues: Vec<XPathError>,
}

impl<N> Parsed<N> {
    /// True when the expression parsed without any diagnostic.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// --- Main Public Parser ---

/// Parses `expr` into an owned [`Node`] tree.
pub fn parse(expr: &str) -> Option<Node> {
    let parsed = parse_with(expr, &mut TreeBuilder);
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("Parsed '{expr}' into {:#?}", parsed.ast);
    }
    parsed.ast
}

/// Parses `expr`, constructing nodes through `builder`.
pub fn parse_with<B: AstBuilder>(expr: &str, builder: &mut B) -> Parsed<B::Node> {
    let mut parser = Parser {
        scanner: Scanner::new(expr),
        builder,
        depth: 0,
    };
    parser.builder.start_build();
    let ast = parser.parse_expr();
    if parser.scanner.kind() != TokenKind::Eof {
        let offset = parser.scanner.offset();
        parser.scanner.record(XPathError::TrailingInput {
            offset,
            text: expr[offset..].to_string(),
        });
    }
    let ast = parser.builder.end_build(ast);
    Parsed {
        ast,
        issues: parser.scanner.take_issues(),
    }
}

struct Parser<'s, 'b, B: AstBuilder> {
    scanner: Scanner<'s>,
    builder: &'b mut B,
    depth: usize,
}

impl<B: AstBuilder> Parser<'_, '_, B> {
    // --- Expressions ---

    fn parse_expr(&mut self) -> Option<B::Node> {
        self.parse_sub_expr(0)
    }

    /// Takes one more nesting level. Past [`MAX_DEPTH`] it records `TooDeep` instead
    /// and refuses, leaving the current token for the callers.
    fn deepen(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            let offset = self.scanner.offset();
            self.scanner.record(XPathError::TooDeep {
                offset,
                limit: MAX_DEPTH,
            });
            return false;
        }
        self.depth += 1;
        true
    }

    /// Runs `production` one nesting level down, or yields a hole when too deep.
    fn nested(&mut self, production: impl FnOnce(&mut Self) -> Option<B::Node>) -> Option<B::Node> {
        if !self.deepen() {
            return None;
        }
        let node = production(self);
        self.depth -= 1;
        node
    }

    /// Parses operators binding tighter than `caller_precedence`.
    fn parse_sub_expr(&mut self, caller_precedence: u8) -> Option<B::Node> {
        self.nested(|parser| parser.parse_sub_expr_at(caller_precedence))
    }

    fn parse_sub_expr_at(&mut self, caller_precedence: u8) -> Option<B::Node> {
        let mut node = if self.scanner.kind() == TokenKind::Minus {
            self.scanner.next_kind();
            let operand = self.parse_sub_expr(Operator::UnaryMinus.precedence());
            Some(self.builder.operator(Operator::UnaryMinus, operand, None))
        } else {
            self.parse_union_expr()
        };

        // Each operator folded in here nests the tree one level deeper on the left.
        let mut levels = 0;
        while let Some(op) = self.scanner.kind().operator() {
            if op.precedence() <= caller_precedence || !self.deepen() {
                break;
            }
            levels += 1;
            self.scanner.next_kind();
            let right = self.parse_sub_expr(op.precedence());
            node = Some(self.builder.operator(op, node, right));
        }
        self.depth -= levels;
        node
    }

    fn parse_union_expr(&mut self) -> Option<B::Node> {
        let mut node = self.parse_path_expr();
        let mut levels = 0;
        while self.scanner.kind() == TokenKind::Union && self.deepen() {
            levels += 1;
            self.scanner.next_kind();
            let right = self.parse_path_expr();
            node = Some(self.builder.operator(Operator::Union, node, right));
        }
        self.depth -= levels;
        node
    }

    fn parse_path_expr(&mut self) -> Option<B::Node> {
        if !self.is_primary_expr() {
            return self.parse_location_path();
        }
        let filter = self.parse_filter_expr();
        match self.scanner.kind() {
            TokenKind::Slash => {
                self.scanner.next_kind();
                let rest = self.parse_relative_location_path();
                Some(self.builder.join_step(filter, rest))
            }
            TokenKind::SlashSlash => {
                self.scanner.next_kind();
                let rest = self.descendant_path();
                Some(self.builder.join_step(filter, Some(rest)))
            }
            _ => filter,
        }
    }

    fn parse_filter_expr(&mut self) -> Option<B::Node> {
        let mut node = self.parse_primary_expr();
        let mut levels = 0;
        while self.scanner.kind() == TokenKind::LBracket && self.deepen() {
            levels += 1;
            let condition = self.parse_predicate();
            node = Some(self.builder.predicate(node, condition, false));
        }
        self.depth -= levels;
        node
    }

    fn parse_primary_expr(&mut self) -> Option<B::Node> {
        match self.scanner.kind() {
            TokenKind::String => {
                let value = self.scanner.take_string_value().unwrap_or_default();
                self.scanner.next_kind();
                Some(self.builder.string(value))
            }
            TokenKind::Number => {
                let text = self.scanner.raw_value();
                let node = self.builder.number(text);
                self.scanner.next_kind();
                Some(node)
            }
            TokenKind::Dollar => {
                self.scanner.next_kind();
                let (prefix, name) = if self.scanner.check_token(TokenKind::Name) {
                    (self.scanner.take_prefix(), self.scanner.take_name())
                } else {
                    (None, None)
                };
                self.scanner.next_kind();
                Some(self.builder.variable(prefix, name))
            }
            TokenKind::LParens => {
                self.scanner.next_kind();
                let inner = self.parse_expr();
                self.scanner.pass_token(TokenKind::RParens);
                inner
            }
            TokenKind::Name => self.parse_function_call(),
            _ => None,
        }
    }

    fn parse_function_call(&mut self) -> Option<B::Node> {
        let prefix = self.scanner.take_prefix();
        let name = self.scanner.take_name().unwrap_or_default();
        self.scanner.next_kind();
        self.scanner.pass_token(TokenKind::LParens);

        let mut args = Vec::new();
        if self.scanner.kind() != TokenKind::RParens {
            loop {
                match self.parse_expr() {
                    Some(arg) => args.push(arg),
                    None => log::debug!("Dropping malformed argument {} of {name}()", args.len() + 1),
                }
                if self.scanner.kind() != TokenKind::Comma {
                    break;
                }
                self.scanner.next_kind();
            }
        }
        self.scanner.pass_token(TokenKind::RParens);
        Some(self.builder.function(prefix, name, args))
    }

    // --- Location Paths ---

    fn parse_location_path(&mut self) -> Option<B::Node> {
        match self.scanner.kind() {
            TokenKind::Slash => {
                self.scanner.next_kind();
                let root = self.builder.axis(Axis::Root, NodeType::All, None, None);
                if self.is_step() {
                    let rest = self.parse_relative_location_path();
                    Some(self.builder.join_step(Some(root), rest))
                } else {
                    Some(root)
                }
            }
            TokenKind::SlashSlash => {
                self.scanner.next_kind();
                let root = self.builder.axis(Axis::Root, NodeType::All, None, None);
                let rest = self.descendant_path();
                Some(self.builder.join_step(Some(root), Some(rest)))
            }
            _ => self.parse_relative_location_path(),
        }
    }

    fn parse_relative_location_path(&mut self) -> Option<B::Node> {
        self.nested(Self::parse_relative_location_path_at)
    }

    fn parse_relative_location_path_at(&mut self) -> Option<B::Node> {
        if !self.is_step() {
            let issue = XPathError::InvalidStep {
                offset: self.scanner.offset(),
                text: self.scanner.raw_value().to_string(),
            };
            self.scanner.record(issue);
            return None;
        }
        let step = self.parse_step();
        match self.scanner.kind() {
            TokenKind::Slash => {
                self.scanner.next_kind();
                let rest = self.parse_relative_location_path();
                Some(self.builder.join_step(step, rest))
            }
            TokenKind::SlashSlash => {
                self.scanner.next_kind();
                let rest = self.descendant_path();
                Some(self.builder.join_step(step, Some(rest)))
            }
            _ => step,
        }
    }

    /// The expansion of `//`: `descendant-or-self::node()` joined to the following path.
    fn descendant_path(&mut self) -> B::Node {
        let any = self
            .builder
            .axis(Axis::DescendantOrSelf, NodeType::All, None, None);
        let rest = self.parse_relative_location_path();
        self.builder.join_step(Some(any), rest)
    }

    fn parse_step(&mut self) -> Option<B::Node> {
        let axis = match self.scanner.kind() {
            TokenKind::Dot => return self.abbreviated_step(Axis::SelfAxis),
            TokenKind::DotDot => return self.abbreviated_step(Axis::Parent),
            TokenKind::Axis => {
                let axis = self.scanner.axis().unwrap_or(Axis::Child);
                self.scanner.next_kind();
                self.scanner.pass_token(TokenKind::ColonColon);
                axis
            }
            TokenKind::At => {
                self.scanner.next_kind();
                Axis::Attribute
            }
            TokenKind::Name | TokenKind::Star => Axis::Child,
            _ => {
                let issue = XPathError::InvalidStep {
                    offset: self.scanner.offset(),
                    text: self.scanner.raw_value().to_string(),
                };
                self.scanner.record(issue);
                return None;
            }
        };

        let mut node = self.parse_node_test(axis);
        let mut levels = 0;
        while self.scanner.kind() == TokenKind::LBracket && self.deepen() {
            levels += 1;
            let condition = self.parse_predicate();
            node = Some(self.builder.predicate(node, condition, axis.is_reverse()));
        }
        self.depth -= levels;
        node
    }

    /// `.` and `..`, which take no predicates.
    fn abbreviated_step(&mut self, axis: Axis) -> Option<B::Node> {
        self.scanner.next_kind();
        let node = self.builder.axis(axis, NodeType::All, None, None);
        if self.scanner.kind() == TokenKind::LBracket {
            let offset = self.scanner.offset();
            self.scanner.record(XPathError::PredicateNotAllowed(offset));
            return None;
        }
        Some(node)
    }

    fn parse_node_test(&mut self, axis: Axis) -> Option<B::Node> {
        match self.scanner.kind() {
            TokenKind::Name if self.scanner.can_be_function() && self.is_node_type() => {
                let node_type = self
                    .scanner
                    .name()
                    .and_then(NodeType::from_test_name)
                    .unwrap_or(NodeType::Unknown);
                self.scanner.next_kind();
                self.scanner.pass_token(TokenKind::LParens);
                let mut literal = None;
                if node_type == NodeType::ProcessingInstruction
                    && self.scanner.kind() != TokenKind::RParens
                {
                    if self.scanner.check_token(TokenKind::String) {
                        literal = self.scanner.take_string_value();
                    }
                    self.scanner.next_kind();
                }
                self.scanner.pass_token(TokenKind::RParens);
                Some(self.builder.axis(axis, node_type, None, literal))
            }
            TokenKind::Name => {
                let prefix = self.scanner.take_prefix();
                let name = self.scanner.take_name().filter(|n| n != "*");
                self.scanner.next_kind();
                Some(
                    self.builder
                        .axis(axis, NodeType::principal(axis), prefix, name),
                )
            }
            TokenKind::Star => {
                self.scanner.next_kind();
                Some(
                    self.builder
                        .axis(axis, NodeType::principal(axis), None, None),
                )
            }
            _ => {
                let issue = XPathError::ExpectedNodeTest {
                    offset: self.scanner.offset(),
                    text: self.scanner.raw_value().to_string(),
                };
                self.scanner.record(issue);
                Some(self.builder.axis(axis, NodeType::Unknown, None, None))
            }
        }
    }

    fn parse_predicate(&mut self) -> Option<B::Node> {
        self.scanner.pass_token(TokenKind::LBracket);
        let condition = self.parse_expr();
        self.scanner.pass_token(TokenKind::RBracket);
        condition
    }

    // --- Lookahead ---

    fn is_primary_expr(&self) -> bool {
        match self.scanner.kind() {
            TokenKind::String | TokenKind::Number | TokenKind::Dollar | TokenKind::LParens => true,
            TokenKind::Name => self.scanner.can_be_function() && !self.is_node_type(),
            _ => false,
        }
    }

    fn is_node_type(&self) -> bool {
        self.scanner.prefix().is_none()
            && self
                .scanner
                .name()
                .and_then(NodeType::from_test_name)
                .is_some()
    }

    fn is_step(&self) -> bool {
        matches!(
            self.scanner.kind(),
            TokenKind::Dot
                | TokenKind::DotDot
                | TokenKind::At
                | TokenKind::Axis
                | TokenKind::Star
                | TokenKind::Name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renders the parse as an S-expression, exercising the builder seam.
    struct SExprBuilder {
        started: bool,
    }

    impl AstBuilder for SExprBuilder {
        type Node = String;

        fn start_build(&mut self) {
            self.started = true;
        }

        fn string(&mut self, value: String) -> String {
            format!("'{value}'")
        }

        fn number(&mut self, text: &str) -> String {
            text.to_string()
        }

        fn operator(&mut self, op: Operator, left: Option<String>, right: Option<String>) -> String {
            let left = left.unwrap_or_else(|| "_".to_string());
            match (op, right) {
                (Operator::UnaryMinus, _) => format!("(neg {left})"),
                (_, right) => format!(
                    "({} {left} {})",
                    op.symbol(),
                    right.unwrap_or_else(|| "_".to_string())
                ),
            }
        }

        fn axis(
            &mut self,
            axis: Axis,
            node_type: NodeType,
            prefix: Option<String>,
            name: Option<String>,
        ) -> String {
            let axis_name = match axis {
                Axis::Root => "root",
                other => other.name(),
            };
            let test = match (node_type.test_name(), prefix, name) {
                (Some(test), _, Some(literal)) => format!("{test}({literal})"),
                (Some(test), _, None) => format!("{test}()"),
                (None, Some(prefix), Some(name)) => format!("{prefix}:{name}"),
                (None, Some(prefix), None) => format!("{prefix}:*"),
                (None, None, Some(name)) => name,
                (None, None, None) => "*".to_string(),
            };
            format!("{axis_name}:{test}")
        }

        fn join_step(&mut self, left: Option<String>, right: Option<String>) -> String {
            format!(
                "(/ {} {})",
                left.unwrap_or_else(|| "_".to_string()),
                right.unwrap_or_else(|| "_".to_string())
            )
        }

        fn predicate(&mut self, base: Option<String>, condition: Option<String>, reverse: bool) -> String {
            format!(
                "([{}] {} {})",
                if reverse { "rev" } else { "" },
                base.unwrap_or_else(|| "_".to_string()),
                condition.unwrap_or_else(|| "_".to_string())
            )
        }

        fn variable(&mut self, prefix: Option<String>, name: Option<String>) -> String {
            match prefix {
                Some(prefix) => format!("${prefix}:{}", name.unwrap_or_default()),
                None => format!("${}", name.unwrap_or_default()),
            }
        }

        fn function(&mut self, _prefix: Option<String>, name: String, args: Vec<String>) -> String {
            format!("{name}({})", args.join(", "))
        }
    }

    fn sexpr(expr: &str) -> String {
        let mut builder = SExprBuilder { started: false };
        let parsed = parse_with(expr, &mut builder);
        assert!(builder.started);
        assert!(parsed.is_clean(), "{expr}: {:?}", parsed.issues);
        parsed.ast.unwrap()
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        assert_eq!(sexpr("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(sexpr("(1 + 2) * 3"), "(* (+ 1 2) 3)");
        assert_eq!(sexpr("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(sexpr("8 div 4 mod 3"), "(mod (div 8 4) 3)");
    }

    #[test]
    fn test_parse_unary_minus() {
        assert_eq!(sexpr("- 1 + 2"), "(+ (neg 1) 2)");
        assert_eq!(sexpr("1 - -2"), "(- 1 (neg 2))");
        assert_eq!(sexpr("--3"), "(neg (neg 3))");
    }

    #[test]
    fn test_parse_logical_and_comparison() {
        assert_eq!(
            sexpr("a = 1 or b != 2 and c"),
            "(or (= child:a 1) (and (!= child:b 2) child:c))"
        );
        assert_eq!(sexpr("1 < 2 = 3 >= 4"), "(= (< 1 2) (>= 3 4))");
    }

    #[test]
    fn test_parse_union() {
        assert_eq!(sexpr("a | b | c"), "(| (| child:a child:b) child:c)");
    }

    #[test]
    fn test_parse_location_paths() {
        assert_eq!(sexpr("../b"), "(/ parent:node() child:b)");
        assert_eq!(sexpr("/a/b"), "(/ root:node() (/ child:a child:b))");
        assert_eq!(sexpr("/"), "root:node()");
        assert_eq!(
            sexpr("//a"),
            "(/ root:node() (/ descendant-or-self:node() child:a))"
        );
        assert_eq!(
            sexpr("a//b"),
            "(/ child:a (/ descendant-or-self:node() child:b))"
        );
        assert_eq!(sexpr("."), "self:node()");
    }

    #[test]
    fn test_parse_filter_expression_paths() {
        assert_eq!(sexpr("current()/b"), "(/ current() child:b)");
        assert_eq!(
            sexpr("current()//b"),
            "(/ current() (/ descendant-or-self:node() child:b))"
        );
        assert_eq!(sexpr("(a)[1]"), "([] child:a 1)");
    }

    #[test]
    fn test_parse_predicates() {
        assert_eq!(sexpr("ancestor::x[1]"), "([rev] ancestor:x 1)");
        assert_eq!(sexpr("x[1][2]"), "([] ([] child:x 1) 2)");
        assert_eq!(
            sexpr("../list[name = 'k']/value"),
            "(/ parent:node() (/ ([] child:list (= child:name 'k')) child:value))"
        );
    }

    #[test]
    fn test_parse_axes_and_node_tests() {
        assert_eq!(sexpr("@id"), "attribute:id");
        assert_eq!(sexpr("namespace::*"), "namespace:*");
        assert_eq!(sexpr("child::if:type"), "child:if:type");
        assert_eq!(sexpr("pfx:*"), "child:pfx:*");
        assert_eq!(sexpr("text()"), "child:text()");
        assert_eq!(
            sexpr("processing-instruction('xml')"),
            "child:processing-instruction(xml)"
        );
        assert_eq!(
            sexpr("preceding-sibling::node()"),
            "preceding-sibling:node()"
        );
    }

    #[test]
    fn test_parse_functions_and_variables() {
        assert_eq!(
            sexpr("derived-from(../type, 'if:eth')"),
            "derived-from((/ parent:node() child:type), 'if:eth')"
        );
        assert_eq!(sexpr("count(child::items)"), "count(child:items)");
        assert_eq!(sexpr("true()"), "true()");
        assert_eq!(sexpr("$var"), "$var");
        assert_eq!(sexpr("$p:v = 2"), "(= $p:v 2)");
    }

    #[test]
    fn test_parse_builds_node_tree() {
        let ast = parse("current()/b = 'x'").unwrap();
        let expected = Node::Operator {
            op: Operator::Eq,
            left: Some(Box::new(Node::Step {
                left: Some(Box::new(Node::Function {
                    prefix: None,
                    name: "current".to_string(),
                    args: vec![],
                })),
                right: Some(Box::new(Node::Axis {
                    axis: Axis::Child,
                    node_type: NodeType::Unknown,
                    prefix: None,
                    name: Some("b".to_string()),
                })),
            })),
            right: Some(Box::new(Node::String("x".to_string()))),
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_parse_malformed_is_partial() {
        let parsed = parse_with("1 +", &mut TreeBuilder);
        assert_eq!(
            parsed.ast,
            Some(Node::Operator {
                op: Operator::Plus,
                left: Some(Box::new(Node::Number("1".to_string()))),
                right: None,
            })
        );
        assert!(!parsed.is_clean());
    }

    #[test]
    fn test_parse_predicate_after_abbreviated_step() {
        let parsed = parse_with(".[1]", &mut TreeBuilder);
        assert!(parsed.ast.is_none());
        assert!(parsed
            .issues
            .iter()
            .any(|i| matches!(i, XPathError::PredicateNotAllowed(1))));
    }

    #[test]
    fn test_parse_reports_trailing_input() {
        let parsed = parse_with("a b", &mut TreeBuilder);
        assert!(parsed.ast.is_some());
        assert_eq!(
            parsed.issues,
            vec![XPathError::TrailingInput {
                offset: 2,
                text: "b".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_empty_expression() {
        let parsed = parse_with("", &mut TreeBuilder);
        assert!(parsed.ast.is_none());
        assert!(!parsed.is_clean());
    }

    fn too_deep(parsed: &Parsed<Node>) -> bool {
        parsed
            .issues
            .iter()
            .any(|i| matches!(i, XPathError::TooDeep { limit: MAX_DEPTH, .. }))
    }

    #[test]
    fn test_parse_nesting_below_limit_is_clean() {
        let expr = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        let parsed = parse_with(&expr, &mut TreeBuilder);
        assert!(parsed.is_clean(), "{:?}", parsed.issues);
        assert_eq!(parsed.ast, Some(Node::Number("1".to_string())));
    }

    #[test]
    fn test_parse_caps_parenthesis_depth() {
        let expr = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let parsed = parse_with(&expr, &mut TreeBuilder);
        assert!(parsed.ast.is_none());
        assert!(too_deep(&parsed));
    }

    #[test]
    fn test_parse_caps_operator_chains() {
        let sum = format!("1{}", " + 1".repeat(100_000));
        let parsed = parse_with(&sum, &mut TreeBuilder);
        assert!(matches!(parsed.ast, Some(Node::Operator { op: Operator::Plus, .. })));
        assert!(too_deep(&parsed));

        let negations = format!("{}1", "-".repeat(100_000));
        assert!(too_deep(&parse_with(&negations, &mut TreeBuilder)));

        let union = format!("a{}", " | a".repeat(100_000));
        assert!(too_deep(&parse_with(&union, &mut TreeBuilder)));
    }

    #[test]
    fn test_parse_caps_steps_and_predicates() {
        let steps = format!("a{}", "/a".repeat(100_000));
        let parsed = parse_with(&steps, &mut TreeBuilder);
        assert!(matches!(parsed.ast, Some(Node::Step { .. })));
        assert!(too_deep(&parsed));

        let predicates = format!("a{}", "[1]".repeat(100_000));
        assert!(too_deep(&parse_with(&predicates, &mut TreeBuilder)));
    }

    #[test]
    fn test_parse_unterminated_string_still_builds() {
        let parsed = parse_with("a = 'open", &mut TreeBuilder);
        assert!(matches!(
            parsed.ast,
            Some(Node::Operator { op: Operator::Eq, .. })
        ));
        assert_eq!(parsed.issues, vec![XPathError::UnterminatedString(4)]);
    }
}
