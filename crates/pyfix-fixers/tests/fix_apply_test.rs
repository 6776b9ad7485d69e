//! Behavior tests for the `apply` fixer
//!
//! Every rewrite is checked twice: the output text must match, and the
//! rewritten tree must be identical to the tree the parser builds for the
//! expected text.

use pyfix_core::parse_python;
use pyfix_fixers::{ApplyFixer, RefactorOptions, RefactorResult, RefactoringEngine};
use std::path::Path;
use std::sync::Arc;

fn engine() -> RefactoringEngine {
    RefactoringEngine::new(vec![Arc::new(ApplyFixer::new())], RefactorOptions::default())
}

fn refactor(source: &str) -> RefactorResult {
    engine()
        .refactor_source(source, Path::new("test.py"))
        .unwrap_or_else(|e| panic!("refactoring {source:?} failed: {e}"))
}

fn check(before: &str, after: &str) {
    let result = refactor(before);
    assert_eq!(result.output, after, "rewriting {before:?}");
    assert_eq!(
        result.tree,
        parse_python(after).green().clone(),
        "tree shape for {after:?}"
    );
}

fn unchanged(source: &str) {
    let result = refactor(source);
    assert_eq!(result.output, source);
    assert!(result.fixes.is_empty(), "unexpected fixes for {source:?}");
}

#[test]
fn test_basic_rewrites() {
    let cases = [
        ("x = apply(f, g + h)", "x = f(*g + h)"),
        ("y = apply(f, g, h)", "y = f(*g, **h)"),
        ("z = apply(fs[0], g or h, h or g)", "z = fs[0](*g or h, **h or g)"),
        ("apply(f, (x, y) + t)", "f(*(x, y) + t)"),
        ("apply(f, args,)", "f(*args)"),
        ("apply(f, args, kwds,)", "f(*args, **kwds)"),
    ];
    for (before, after) in cases {
        check(before, after);
    }
}

#[test]
fn test_callee_parenthesized_when_not_primary() {
    let cases = [
        ("x = apply(f+g, args)", "x = (f+g)(*args)"),
        ("x = apply(f*g, args)", "x = (f*g)(*args)"),
        ("x = apply(f**g, args)", "x = (f**g)(*args)"),
        ("x = apply(a.b**c, args)", "x = (a.b**c)(*args)"),
        ("x = apply(g if c else h, args)", "x = (g if c else h)(*args)"),
        ("x = apply(lambda *a: a, args)", "x = (lambda *a: a)(*args)"),
        ("x = apply(-f, args)", "x = (-f)(*args)"),
        ("x = apply('fmt', args)", "x = ('fmt')(*args)"),
    ];
    for (before, after) in cases {
        check(before, after);
    }
}

#[test]
fn test_callee_kept_when_primary() {
    let cases = [
        ("x = apply(f.g, args)", "x = f.g(*args)"),
        ("x = apply(f[x], args)", "x = f[x](*args)"),
        ("x = apply(f(), args)", "x = f()(*args)"),
        ("x = apply(a.b.c.d.e.f, args)", "x = a.b.c.d.e.f(*args)"),
        ("x = apply((f or g), args)", "x = (f or g)(*args)"),
        ("x = apply([f][0], args)", "x = [f][0](*args)"),
    ];
    for (before, after) in cases {
        check(before, after);
    }
}

#[test]
fn test_comments_inside_call_are_dropped() {
    check(
        "apply(   # foo\n          f, # bar\n          args)",
        "f(*args)",
    );
}

#[test]
fn test_spacing_is_normalized() {
    check("apply(  f,  args,   kwds)", "f(*args, **kwds)");
    check("apply(  f  ,args,kwds   )", "f(*args, **kwds)");
    check("apply(f,\n      args,\n      kwds)", "f(*args, **kwds)");
}

#[test]
fn test_leading_trivia_of_call_is_kept() {
    check("x =   apply(f, a)\n", "x =   f(*a)\n");
    check(
        "def f():\n    # call it\n    return apply(g, a)\n",
        "def f():\n    # call it\n    return g(*a)\n",
    );
    check(
        "x = 1\n\n# first\napply(f, a)  # trailing\n",
        "x = 1\n\n# first\nf(*a)  # trailing\n",
    );
    check("total = 1 + \\\n    apply(f, a)\n", "total = 1 + \\\n    f(*a)\n");
}

#[test]
fn test_byte_order_mark_is_kept() {
    check("\u{feff}apply(f, a)\n", "\u{feff}f(*a)\n");
    check("\u{feff}x = apply(f, a)\n", "\u{feff}x = f(*a)\n");
}

#[test]
fn test_nested_calls_are_rewritten_inside_out() {
    check("apply(f, apply(g, a))", "f(*g(*a))");
    check("apply(apply(h, b), a, k)", "h(*b)(*a, **k)");
    check("x = [apply(f, a) for a in xs]", "x = [f(*a) for a in xs]");
    check("outer(apply(f, a), apply(g, b))", "outer(f(*a), g(*b))");
}

#[test]
fn test_compound_args_stay_behind_one_splat() {
    check("apply(f, a + b, c or d)", "f(*a + b, **c or d)");
}

#[test]
fn test_unchanged_shapes() {
    let sources = [
        "apply()",
        "apply(f)",
        "apply(f,)",
        "apply(f, args, kwds, extras)",
        "apply(f, *args, **kwds)",
        "apply(f, *args)",
        "apply(f, **kwds)",
        "apply(f, args, **kwds)",
        "apply(f, args, *kwds)",
        "apply(func=f, args=args, kwds=kwds)",
        "apply(f, args=args, kwds=kwds)",
        "apply(f, args, kwds=kwds)",
        "apply(*f, args)",
        "apply(f, a).attr",
        "apply(f, a)[0]",
        "apply(f, a) ** 2",
        "x.apply(f, a)",
        "def apply(f, a):\n    pass\n",
        "apply",
        "apply = None\n",
    ];
    for source in sources {
        unchanged(source);
    }
}

#[test]
fn test_applied_fix_records_position_and_text() {
    let result = refactor("import os\nx = (1,\n     apply(f, a, k))\n");
    assert_eq!(result.fixes.len(), 1);

    let fix = &result.fixes[0];
    assert_eq!(fix.fixer, "apply");
    assert_eq!((fix.line, fix.column), (3, 6));
    assert_eq!(fix.before, "apply(f, a, k)");
    assert_eq!(fix.after, "f(*a, **k)");
}

#[test]
fn test_only_matched_call_changes() {
    let source = "\
import sys

def run(f, args, kwds):
    result = apply(f, args, kwds)  # legacy
    print >>sys.stderr, result
    return result
";
    let expected = "\
import sys

def run(f, args, kwds):
    result = f(*args, **kwds)  # legacy
    print >>sys.stderr, result
    return result
";
    check(source, expected);
}
