//! Green-tree builders shared by fixers
//!
//! Replacement trees are assembled from fresh leaves and cloned pieces of the
//! matched node. The shapes built here are exactly what the parser produces
//! for the same text, so a rewritten file parses back to the same tree.

use pyfix_core::PySyntaxKind;
use pyfix_core::cst::{
    GreenElement, GreenNode, GreenToken, NodeOrToken, green_children, green_kind,
};

/// A fresh token
pub fn leaf(kind: PySyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

/// A fresh node with the given children
pub fn node(kind: PySyntaxKind, children: Vec<GreenElement>) -> GreenElement {
    NodeOrToken::Node(GreenNode::new(kind.into(), children))
}

pub fn comma() -> GreenElement {
    leaf(PySyntaxKind::Comma, ",")
}

pub fn space() -> GreenElement {
    leaf(PySyntaxKind::Whitespace, " ")
}

/// Wrap an expression in parentheses: `(expr)`
pub fn parenthesize(expr: GreenElement) -> GreenElement {
    node(
        PySyntaxKind::Atom,
        vec![
            leaf(PySyntaxKind::LParen, "("),
            expr,
            leaf(PySyntaxKind::RParen, ")"),
        ],
    )
}

/// Build a call `func(args...)`
///
/// `args` are the argument list items including separators. A `Power` callee
/// without `**` is extended with the call trailer instead of being nested, the
/// way `a.b(c)` parses. Callers parenthesize callees that are not primaries.
pub fn call(func: GreenElement, args: Vec<GreenElement>) -> GreenNode {
    let mut trailer = vec![leaf(PySyntaxKind::LParen, "(")];
    if !args.is_empty() {
        trailer.push(node(PySyntaxKind::ArgList, args));
    }
    trailer.push(leaf(PySyntaxKind::RParen, ")"));
    let trailer = node(PySyntaxKind::Trailer, trailer);

    match func {
        NodeOrToken::Node(power)
            if is_kind(&power, PySyntaxKind::Power) && !has_power_operator(&power) =>
        {
            let mut children = green_children(&power);
            children.push(trailer);
            GreenNode::new(PySyntaxKind::Power.into(), children)
        }
        other => GreenNode::new(PySyntaxKind::Power.into(), vec![other, trailer]),
    }
}

/// Kind check for a green node
pub fn is_kind(node: &GreenNode, kind: PySyntaxKind) -> bool {
    green_kind(&NodeOrToken::Node(node.clone())) == kind
}

fn has_power_operator(power: &GreenNode) -> bool {
    let double_star = rowan::SyntaxKind::from(PySyntaxKind::DoubleStar);
    power.children().any(|child| {
        child
            .as_token()
            .is_some_and(|token| token.kind() == double_star)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfix_core::parse_python;

    fn expression_green(source: &str) -> GreenElement {
        let parse = parse_python(source);
        let stmt = parse.syntax().first_child().unwrap();
        match stmt.first_child_or_token().unwrap() {
            NodeOrToken::Node(n) => NodeOrToken::Node(n.green().into_owned()),
            NodeOrToken::Token(t) => NodeOrToken::Token(t.green().to_owned()),
        }
    }

    fn statement_expression_green(source: &str) -> GreenNode {
        match expression_green(source) {
            NodeOrToken::Node(n) => n,
            NodeOrToken::Token(_) => panic!("expected a node for {source:?}"),
        }
    }

    #[test]
    fn test_call_on_name() {
        let built = call(leaf(PySyntaxKind::Name, "f"), vec![]);
        assert_eq!(built.to_string(), "f()");
        assert_eq!(built, statement_expression_green("f()\n"));
    }

    #[test]
    fn test_call_flattens_attribute_chain() {
        let callee = expression_green("a.b\n");
        let built = call(callee, vec![leaf(PySyntaxKind::Name, "x")]);
        assert_eq!(built.to_string(), "a.b(x)");
        assert_eq!(built, statement_expression_green("a.b(x)\n"));
    }

    #[test]
    fn test_call_on_parenthesized_expression() {
        let callee = parenthesize(expression_green("f+g\n"));
        let built = call(
            callee,
            vec![
                leaf(PySyntaxKind::Name, "x"),
                comma(),
                space(),
                leaf(PySyntaxKind::Name, "y"),
            ],
        );
        assert_eq!(built.to_string(), "(f+g)(x, y)");
        assert_eq!(built, statement_expression_green("(f+g)(x, y)\n"));
    }

    #[test]
    fn test_call_does_not_flatten_power_operator() {
        let callee = expression_green("f**g\n");
        let built = call(callee, vec![]);
        assert_eq!(built.children().count(), 2);
    }
}
