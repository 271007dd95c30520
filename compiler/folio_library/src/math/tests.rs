use folio_eval::value::Value;
use folio_eval::{Elem, ElemKind};
use pretty_assertions::assert_eq;

use crate::testing::eval;

fn single(code: &str) -> Elem {
    let Ok(Value::Content(content)) = eval(code) else {
        panic!("`{code}` did not produce content");
    };
    let Some(elem) = content.to_single() else {
        panic!("`{code}` did not produce a single element");
    };
    elem.clone()
}

/// The first element inside an inline equation.
fn in_equation(code: &str) -> Elem {
    let equation = single(code);
    assert_eq!(equation.kind(), ElemKind::Equation);
    let Some(body) = equation.content_field("body") else {
        panic!("equation without body");
    };
    let Some(first) = body.iter().next() else {
        panic!("empty equation");
    };
    first.clone()
}

#[test]
fn sqrt_is_a_root_without_index() {
    let root = single("math.sqrt[x]");
    assert_eq!(root.kind(), ElemKind::Root);
    assert_eq!(root.get("index"), Some(Value::None));
    assert_eq!(root.content_field("radicand").map(|c| c.plain_text()), Some("x".into()));
}

#[test]
fn accents_wrap_their_base() {
    let hat = single("math.hat[x]");
    assert_eq!(hat.kind(), ElemKind::Accent);
    assert_eq!(hat.get("accent"), Some(Value::str("\u{302}")));
    assert_eq!(hat.content_field("base").map(|c| c.plain_text()), Some("x".into()));

    let dot = single("math.dot(\"y\")");
    assert_eq!(dot.get("accent"), Some(Value::str("\u{307}")));
}

#[test]
fn accents_accept_symbols() {
    let tilde = single("math.tilde(sym.alpha)");
    let Some(base) = tilde.content_field("base") else {
        panic!("accent without base");
    };
    assert_eq!(base.to_single().map(Elem::kind), Some(ElemKind::Symbol));
    assert_eq!(base.plain_text(), "α");
}

#[test]
fn accents_reject_other_values() {
    assert!(eval("math.hat(1pt)").is_err());
    assert!(eval("math.hat()").is_err());
}

#[test]
fn operators_are_upright_content() {
    let lim = single("math.lim");
    assert_eq!(lim.kind(), ElemKind::Op);
    assert_eq!(lim.get("limits"), Some(Value::Bool(true)));
    assert_eq!(lim.content_field("text").map(|c| c.plain_text()), Some("lim".into()));
    assert_eq!(single("math.sin").get("limits"), Some(Value::Bool(false)));
}

#[test]
fn number_sets_are_double_struck() {
    let Ok(Value::Symbol(rr)) = eval("math.RR") else {
        panic!("RR is not a symbol");
    };
    assert_eq!(rr.get(), 'ℝ');
}

#[test]
fn math_names_resolve_inside_equations() {
    let accent = in_equation("[$hat(x)$]");
    assert_eq!(accent.kind(), ElemKind::Accent);

    let op = in_equation("[$sin$]");
    assert_eq!(op.kind(), ElemKind::Op);

    let frac = in_equation("[$frac(a, b)$]");
    assert_eq!(frac.kind(), ElemKind::Frac);
    assert_eq!(frac.content_field("num").map(|c| c.plain_text()), Some("a".into()));
}

#[test]
fn shadowed_symbols_stay_reachable() {
    let Ok(Value::Func(_)) = eval("math.dot") else {
        panic!("math.dot is not the accent");
    };
    let Ok(Value::Symbol(dot)) = eval("sym.dot") else {
        panic!("sym.dot is not a symbol");
    };
    assert_eq!(dot.get(), '⋅');
}

#[test]
fn math_elements_construct() {
    let vec = single("math.vec([1], [2])");
    assert_eq!(vec.kind(), ElemKind::Vec);
    let cases = single("math.cases([a], [b])");
    assert_eq!(cases.kind(), ElemKind::Cases);
}
