use folio_ir::{Name, Span};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::errors::EvalErrorKind;

fn library() -> Library {
    let mut global = Scope::new();
    global.define("pi", Value::Float(2.5));
    let mut math = Scope::new();
    math.define("alpha", Value::Symbol(Symbol::single('α')));
    Library {
        global: Module::new("global", global),
        math: Module::new("math", math),
    }
}

fn name(s: &str) -> Name {
    Name::new(s)
}

#[test]
fn lookup_walks_outward() {
    let lib = library();
    let mut scopes = Scopes::new(Some(&lib));
    scopes
        .bind(name("x"), Binding::new(Value::Int(1), Span::detached()))
        .ok();
    scopes.enter();
    scopes
        .bind(name("y"), Binding::new(Value::Int(2), Span::detached()))
        .ok();
    assert_eq!(scopes.get(name("x")).ok(), Some(&Value::Int(1)));
    assert_eq!(scopes.get(name("y")).ok(), Some(&Value::Int(2)));
    assert_eq!(scopes.get(name("pi")).ok(), Some(&Value::Float(2.5)));
    scopes.exit();
    assert!(scopes.get(name("y")).is_err());
}

#[test]
fn shadowing_needs_a_new_frame() {
    let mut scopes = Scopes::new(None);
    let first = scopes.bind(name("x"), Binding::new(Value::Int(1), Span::detached()));
    assert!(first.is_ok());
    let again = scopes.bind(name("x"), Binding::new(Value::Int(2), Span::detached()));
    assert_eq!(
        again.err().map(|e| e.kind),
        Some(EvalErrorKind::Redefinition { name: "x".into() })
    );
    scopes.enter();
    let inner = scopes.bind(name("x"), Binding::new(Value::Int(3), Span::detached()));
    assert!(inner.is_ok());
    assert_eq!(scopes.get(name("x")).ok(), Some(&Value::Int(3)));
}

#[test]
fn math_lookup_falls_back_to_symbols() {
    let lib = library();
    let scopes = Scopes::new(Some(&lib));
    assert_eq!(
        scopes.get_in_math(name("x")).ok(),
        Some(Value::Symbol(Symbol::single('x')))
    );
    assert_eq!(
        scopes.get_in_math(name("alpha")).ok(),
        Some(Value::Symbol(Symbol::single('α')))
    );
    assert!(scopes.get(name("alpha")).is_err());
    assert!(matches!(
        scopes.get_in_math(name("foo")).err().map(|e| e.kind),
        Some(EvalErrorKind::UnknownVariable { .. })
    ));
}

#[test]
fn library_bindings_are_constant() {
    let lib = library();
    let mut scopes = Scopes::new(Some(&lib));
    let err = scopes.get_mut(name("pi")).err().map(|e| e.message);
    assert_eq!(err, Some("cannot mutate a constant: pi".to_string()));
}

#[test]
fn captured_bindings_are_read_only() {
    let mut scopes = Scopes::new(None);
    let binding = Binding::new(Value::Int(1), Span::detached());
    scopes
        .top
        .define_captured(name("x"), &binding, Capturer::Function);
    assert!(matches!(
        scopes.get_mut(name("x")).err().map(|e| e.kind),
        Some(EvalErrorKind::CapturedMutation { .. })
    ));
}

#[test]
fn definition_order_is_kept() {
    let mut scope = Scope::new();
    scope.define("b", Value::Int(1));
    scope.define("a", Value::Int(2));
    let names: Vec<&str> = scope.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

proptest! {
    #[test]
    fn enter_exit_is_well_nested(defs in proptest::collection::vec(0..4usize, 0..12)) {
        let mut scopes = Scopes::new(None);
        let before = scopes.depth();
        scopes.enter();
        scopes.enter();
        for (i, d) in defs.iter().enumerate() {
            let _ = scopes.bind(name(&format!("v{d}")), Binding::new(Value::from(i), Span::detached()));
        }
        scopes.exit();
        scopes.exit();
        prop_assert_eq!(scopes.depth(), before);
        prop_assert!(scopes.top.is_empty());
    }
}
