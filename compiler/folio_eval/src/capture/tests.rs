use folio_ir::{ExprKind, FileId, Span, VirtualPath};
use folio_parse::parse_code;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::scope::{Binding, BindingKind};
use crate::value::Value;

/// Bindings `x` and `y` in the defining scope.
fn defining_scopes() -> Scopes<'static> {
    let mut scopes = Scopes::new(None);
    for name in ["x", "y"] {
        scopes
            .bind(Name::new(name), Binding::new(Value::Int(1), Span::detached()))
            .ok();
    }
    scopes
}

fn analyze(code: &str, capturer: Capturer) -> Scope {
    let scopes = defining_scopes();
    let source = parse_code(code, FileId::new(None, VirtualPath::new("/capture.fol")));
    let arena = source.arena();
    let ExprKind::CodeBlock(range) = arena.kind(source.root()) else {
        panic!("code parses into a block");
    };
    let first = arena.expr_list(range)[0];
    let mut visitor = CapturesVisitor::new(Some(&scopes), capturer);
    match arena.kind(first) {
        ExprKind::Closure(id) => visitor.visit_closure_def(id, arena),
        _ => visitor.visit_expr(first, arena),
    }
    visitor.finish()
}

fn captured(code: &str) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = analyze(code, Capturer::Function)
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    names.sort_unstable();
    names
}

#[test]
fn only_defined_locals_are_captured() {
    assert_eq!(captured("(a) => a + x + z"), vec!["x"]);
}

#[test]
fn parameters_shadow_outer_names() {
    assert!(captured("(x) => x").is_empty());
    assert!(captured("(..x) => x").is_empty());
}

#[test]
fn inner_lets_shadow_after_their_definition() {
    assert_eq!(captured("() => { let y = 1; y + x }"), vec!["x"]);
    assert_eq!(captured("() => { let x = x; x }"), vec!["x"]);
}

#[test]
fn loop_patterns_bind() {
    assert_eq!(captured("() => for y in x { y }"), vec!["x"]);
}

#[test]
fn defaults_see_the_defining_scope() {
    assert_eq!(captured("(a: y) => a"), vec!["y"]);
    assert_eq!(captured("(y: y) => y"), vec!["y"]);
}

#[test]
fn nested_closures_pass_captures_through() {
    assert_eq!(captured("() => (b) => x + b"), vec!["x"]);
    assert!(captured("() => (x) => x").is_empty());
}

#[test]
fn context_bodies_capture_too() {
    let scope = analyze("context x + y", Capturer::Context);
    assert_eq!(scope.len(), 2);
}

#[test]
fn captured_bindings_are_marked() {
    let scope = analyze("() => x", Capturer::Function);
    let kind = scope.get(Name::new("x")).map(Binding::kind);
    assert_eq!(kind, Some(BindingKind::Captured(Capturer::Function)));
}

proptest! {
    #[test]
    fn analysis_is_idempotent(
        params in proptest::sample::subsequence(vec!["a", "x"], 0..=2),
        used in proptest::collection::vec(proptest::sample::select(vec!["a", "x", "y", "z"]), 1..5),
    ) {
        let code = format!("({}) => {}", params.join(", "), used.join(" + "));
        let first = captured(&code);
        prop_assert_eq!(captured(&code), first.clone());

        let mut expected: Vec<&str> = used
            .iter()
            .copied()
            .filter(|name| matches!(*name, "x" | "y") && !params.contains(name))
            .collect();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(first, expected);
    }
}
