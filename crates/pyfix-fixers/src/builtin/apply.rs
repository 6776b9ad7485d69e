//! `apply` fixer
//!
//! Rewrites `apply(func, args)` to `func(*args)` and
//! `apply(func, args, kwds)` to `func(*args, **kwds)`.
//!
//! `args` is placed behind a single `*` as a whole, so a compound argument
//! such as `apply(f, a + b)` becomes `f(*a + b)`.

use pyfix_core::cst::{
    CloneOptions, GreenElement, NodeOrToken, PySyntaxElementExt, PySyntaxNodeExt, deep_clone,
    leading_trivia, with_leading_trivia,
};
use pyfix_core::{PySyntaxElement, PySyntaxKind, PySyntaxNode};
use tracing::debug;

use crate::fixer::{Fixer, MatchBindings};
use crate::util::{self, call, comma, leaf, parenthesize, space};

/// Binding roles produced by the matcher
const FUNC: &str = "func";
const ARGS: &str = "args";
const KWDS: &str = "kwds";

/// Replaces calls to the `apply` builtin with extended call syntax
#[derive(Debug, Default, Clone, Copy)]
pub struct ApplyFixer;

impl ApplyFixer {
    pub fn new() -> Self {
        Self
    }
}

impl Fixer for ApplyFixer {
    fn name(&self) -> &'static str {
        "apply"
    }

    fn description(&self) -> &'static str {
        "Replace apply(f, args, kwds) with f(*args, **kwds)"
    }

    /// Match `apply ( func , args [, kwds] [,] )` with positional arguments
    fn match_node(&self, node: &PySyntaxNode) -> Option<MatchBindings> {
        if node.kind() != PySyntaxKind::Power {
            return None;
        }

        let children = node.significant_children();
        let [callee, trailer] = children.as_slice() else {
            return None;
        };
        if callee.token_text(PySyntaxKind::Name).as_deref() != Some("apply") {
            return None;
        }

        let trailer = trailer.as_node()?;
        if trailer.kind() != PySyntaxKind::Trailer {
            return None;
        }
        let trailer_children = trailer.significant_children();
        let [open, arglist, close] = trailer_children.as_slice() else {
            return None;
        };
        if open.kind() != PySyntaxKind::LParen || close.kind() != PySyntaxKind::RParen {
            return None;
        }
        let arglist = arglist.as_node()?;
        if arglist.kind() != PySyntaxKind::ArgList {
            return None;
        }

        let arguments = split_arguments(arglist)?;
        if !(2..=3).contains(&arguments.len()) {
            return None;
        }
        if arguments.iter().any(is_keyword_or_generator) {
            return None;
        }
        if splat_prefix(&arguments[0]).is_some() {
            return None;
        }

        let mut bindings = MatchBindings::new();
        let mut roles = arguments.into_iter();
        for role in [FUNC, ARGS, KWDS] {
            if let Some(argument) = roles.next() {
                bindings.bind(role, argument);
            }
        }
        Some(bindings)
    }

    fn transform(&self, node: &PySyntaxNode, bindings: &MatchBindings) -> Option<PySyntaxNode> {
        let func = bindings.expect_binding(FUNC);
        let args = bindings.expect_binding(ARGS);
        let kwds = bindings.get(KWDS);

        // Already splatted arguments have no direct call-syntax equivalent
        if splat_prefix(args).is_some() {
            debug!("apply: args already splatted, leaving call unchanged");
            return None;
        }
        if kwds.is_some_and(|kwds| splat_prefix(kwds).is_some()) {
            debug!("apply: kwds already splatted, leaving call unchanged");
            return None;
        }

        let reset = CloneOptions::reset_formatting();
        let prefix = leading_trivia(&NodeOrToken::Node(node.clone()));

        let mut callee = deep_clone(func, reset);
        if needs_parentheses(func) {
            callee = parenthesize(callee);
        }

        let mut arguments: Vec<GreenElement> = vec![util::node(
            PySyntaxKind::Argument,
            vec![leaf(PySyntaxKind::Star, "*"), deep_clone(args, reset)],
        )];
        if let Some(kwds) = kwds {
            arguments.push(comma());
            arguments.push(util::node(
                PySyntaxKind::Argument,
                vec![
                    space(),
                    leaf(PySyntaxKind::DoubleStar, "**"),
                    deep_clone(kwds, reset),
                ],
            ));
        }

        let replacement = with_leading_trivia(&call(callee, arguments), &prefix);
        Some(PySyntaxNode::new_root(replacement))
    }
}

/// Split an argument list on commas
///
/// Returns `None` for malformed lists (two commas in a row, a leading comma
/// or a missing separator). A single trailing comma is allowed.
fn split_arguments(arglist: &PySyntaxNode) -> Option<Vec<PySyntaxElement>> {
    let mut arguments = Vec::new();
    let mut expecting_argument = true;

    for item in arglist.significant_children() {
        if item.is_kind(PySyntaxKind::Comma) {
            if expecting_argument {
                return None;
            }
            expecting_argument = true;
        } else {
            if !expecting_argument {
                return None;
            }
            arguments.push(item);
            expecting_argument = false;
        }
    }

    Some(arguments)
}

/// `*` or `**` in front of a call argument
fn splat_prefix(argument: &PySyntaxElement) -> Option<PySyntaxKind> {
    let node = argument.as_node()?;
    if node.kind() != PySyntaxKind::Argument {
        return None;
    }
    node.significant_children()
        .first()
        .map(|first| first.kind())
        .filter(|kind| matches!(kind, PySyntaxKind::Star | PySyntaxKind::DoubleStar))
}

/// `name=value` and bare generator arguments
fn is_keyword_or_generator(argument: &PySyntaxElement) -> bool {
    argument.is_kind(PySyntaxKind::Argument) && splat_prefix(argument).is_none()
}

/// Whether the callee must be wrapped in parentheses to stay a primary
///
/// Names and atoms are primaries already, and so is a trailer chain unless it
/// ends in a `**` operation.
fn needs_parentheses(func: &PySyntaxElement) -> bool {
    match func {
        NodeOrToken::Token(token) => token.kind() != PySyntaxKind::Name,
        NodeOrToken::Node(node) => match node.kind() {
            PySyntaxKind::Atom => false,
            PySyntaxKind::Power => node
                .significant_children()
                .iter()
                .rev()
                .nth(1)
                .is_some_and(|second_last| second_last.kind() == PySyntaxKind::DoubleStar),
            _ => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfix_core::parse_python;

    fn first_power(source: &str) -> PySyntaxNode {
        parse_python(source)
            .syntax()
            .descendants()
            .find(|n| n.kind() == PySyntaxKind::Power)
            .expect("power node")
    }

    #[test]
    fn test_match_binds_roles() {
        let bindings = ApplyFixer
            .match_node(&first_power("apply(f.g, a + b, kw)\n"))
            .unwrap();
        assert_eq!(bindings.len(), 3);
        assert_eq!(
            bindings.expect_binding(FUNC).kind(),
            PySyntaxKind::Power
        );
        assert_eq!(
            bindings.expect_binding(ARGS).kind(),
            PySyntaxKind::ArithExpr
        );
        assert_eq!(bindings.expect_binding(KWDS).kind(), PySyntaxKind::Name);
    }

    #[test]
    fn test_match_without_kwds() {
        let bindings = ApplyFixer
            .match_node(&first_power("apply(f, args,)\n"))
            .unwrap();
        assert!(bindings.contains(FUNC));
        assert!(bindings.contains(ARGS));
        assert!(!bindings.contains(KWDS));
    }

    #[test]
    fn test_match_rejects_other_shapes() {
        for source in [
            "apply()\n",
            "apply(f)\n",
            "apply(f,)\n",
            "apply(f, a, k, extra)\n",
            "apply(f, args=a)\n",
            "apply(*f, a)\n",
            "apply(f, a).x\n",
            "x.apply(f, a)\n",
            "applied(f, a)\n",
        ] {
            let power = first_power(source);
            assert!(
                ApplyFixer.match_node(&power).is_none(),
                "unexpected match for {source:?}"
            );
        }
    }

    #[test]
    fn test_splatted_arguments_match_but_do_not_transform() {
        for source in ["apply(f, *a)\n", "apply(f, a, **k)\n", "apply(f, a, *k)\n"] {
            let power = first_power(source);
            let bindings = ApplyFixer.match_node(&power).expect("match");
            assert!(
                ApplyFixer.transform(&power, &bindings).is_none(),
                "unexpected rewrite for {source:?}"
            );
        }
    }

    #[test]
    fn test_needs_parentheses() {
        let cases = [
            ("x = f\n", false),
            ("x = (f)\n", false),
            ("x = f.g\n", false),
            ("x = f()\n", false),
            ("x = f ** g\n", true),
            ("x = f + g\n", true),
            ("x = 'abc'\n", true),
            ("x = -f\n", true),
            ("x = lambda: f\n", true),
        ];

        for (source, expected) in cases {
            let parse = parse_python(source);
            let stmt = parse.syntax().first_child().unwrap();
            // x, =, value, newline
            let value = stmt.significant_children()[2].clone();
            assert_eq!(needs_parentheses(&value), expected, "{source:?}");
        }
    }

    #[test]
    fn test_transform_builds_fresh_trees_and_keeps_input() {
        let parse = parse_python("x = apply(f, a, k)\n");
        let power = parse
            .syntax()
            .descendants()
            .find(|n| n.kind() == PySyntaxKind::Power)
            .unwrap();
        let bindings = ApplyFixer.match_node(&power).unwrap();

        let first = ApplyFixer.transform(&power, &bindings).unwrap();
        let second = ApplyFixer.transform(&power, &bindings).unwrap();

        assert_eq!(first.text().to_string(), " f(*a, **k)");
        assert_eq!(first.green().into_owned(), second.green().into_owned());
        assert_ne!(first, second);

        assert_eq!(power.text().to_string(), " apply(f, a, k)");
        assert_eq!(parse.syntax().text().to_string(), "x = apply(f, a, k)\n");
        assert!(ApplyFixer.match_node(&power).is_some());
    }

    #[test]
    fn test_transform_keeps_leading_trivia() {
        let power = first_power("x =   apply(f, a)\n");
        let bindings = ApplyFixer.match_node(&power).unwrap();
        let replacement = ApplyFixer.transform(&power, &bindings).unwrap();
        assert_eq!(replacement.text().to_string(), "   f(*a)");
    }
}
