use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::errors::EvalErrorKind;
use crate::testing::eval_code;
use crate::value::Array;

fn ints(values: &[i64]) -> Value {
    Value::Array(values.iter().map(|&v| Value::Int(v)).collect::<Array>())
}

fn strs(values: &[&str]) -> Value {
    Value::Array(values.iter().map(|&v| Value::str(v)).collect::<Array>())
}

fn eval(code: &str) -> Option<Value> {
    eval_code(code).ok()
}

#[test]
fn string_methods() {
    assert_eq!(eval("\"héllo\".len()"), Some(Value::Int(6)));
    assert_eq!(eval("\"a,b,c\".split(\",\")"), Some(strs(&["a", "b", "c"])));
    assert_eq!(eval("\"  a b \".split()"), Some(strs(&["a", "b"])));
    assert_eq!(eval("\"  x  \".trim()"), Some(Value::str("x")));
    assert_eq!(eval("\"abc\".contains(\"b\")"), Some(Value::Bool(true)));
    assert_eq!(eval("\"abc\".starts-with(\"ab\")"), Some(Value::Bool(true)));
    assert_eq!(eval("\"a-b-c\".replace(\"-\", \"+\")"), Some(Value::str("a+b+c")));
    assert_eq!(eval("\"abc\".at(1)"), Some(Value::str("b")));
    assert_eq!(eval("\"abc\".slice(1)"), Some(Value::str("bc")));
    assert_eq!(eval("\"abc\".rev()"), Some(Value::str("cba")));
}

#[test]
fn empty_patterns_match_between_characters() {
    assert_eq!(eval("\"abc\".replace(\"\", \"-\")"), Some(Value::str("-a-b-c-")));
    assert_eq!(eval("\"aaa\".position(\"\")"), Some(Value::Int(0)));
    assert_eq!(eval("\"ab\".matches(\"\").len()"), Some(Value::Int(3)));
    assert_eq!(eval("\"\".replace(\"\", \"x\")"), Some(Value::str("x")));
}

#[test]
fn string_methods_take_regexes() {
    assert_eq!(
        eval("\"a1b22\".replace(regex(\"[0-9]+\"), \"#\")"),
        Some(Value::str("a#b#"))
    );
    assert_eq!(eval("\"a1b22\".split(regex(\"[0-9]+\"))"), Some(strs(&["a", "b", ""])));
}

#[test]
fn array_queries() {
    assert_eq!(eval("(1, 2, 3).len()"), Some(Value::Int(3)));
    assert_eq!(eval("(1, 2, 3).first()"), Some(Value::Int(1)));
    assert_eq!(eval("(1, 2, 3).last()"), Some(Value::Int(3)));
    assert_eq!(eval("(1, 2, 3).at(-1)"), Some(Value::Int(3)));
    assert_eq!(eval("(1, 2, 3).at(5, default: 0)"), Some(Value::Int(0)));
    assert_eq!(eval("(1, 2, 3).contains(2)"), Some(Value::Bool(true)));
    assert_eq!(eval("(1, 2, 3).find(x => x > 1)"), Some(Value::Int(2)));
    assert_eq!(eval("(1, 2, 3).position(x => x == 3)"), Some(Value::Int(2)));
}

#[test]
fn array_out_of_bounds() {
    assert_eq!(
        eval_code("(1, 2).at(5)").err().map(|e| e.kind),
        Some(EvalErrorKind::IndexOutOfBounds { index: 5, len: 2 })
    );
}

#[test]
fn array_transformations() {
    assert_eq!(eval("(1, 2, 3).map(x => x * x)"), Some(ints(&[1, 4, 9])));
    assert_eq!(eval("(3, 1, 2).sorted()"), Some(ints(&[1, 2, 3])));
    assert_eq!(eval("(3, 1, 2).sorted(key: x => -x)"), Some(ints(&[3, 2, 1])));
    assert_eq!(eval("(1, 2, 3).rev()"), Some(ints(&[3, 2, 1])));
    assert_eq!(eval("(1, 2, 3).slice(1)"), Some(ints(&[2, 3])));
    assert_eq!(eval("(1, (2, 3)).flatten()"), Some(ints(&[1, 2, 3])));
    assert_eq!(eval("(1, 1, 2, 1).dedup()"), Some(ints(&[1, 2])));
    assert_eq!(eval("(1, 2, 3).fold(0, (a, b) => a + b)"), Some(Value::Int(6)));
    assert_eq!(eval("(1, 2, 3).sum()"), Some(Value::Int(6)));
    assert_eq!(eval("(2, 3).product()"), Some(Value::Int(6)));
}

#[test]
fn array_joins_and_zips() {
    assert_eq!(eval("(\"a\", \"b\").join(\", \")"), Some(Value::str("a, b")));
    assert_eq!(
        eval("(\"a\", \"b\", \"c\").join(\", \", last: \" and \")"),
        Some(Value::str("a, b and c"))
    );
    assert_eq!(
        eval("(1, 2).zip((3, 4))"),
        Some(Value::Array(
            [ints(&[1, 3]), ints(&[2, 4])].into_iter().collect::<Array>()
        ))
    );
    assert_eq!(
        eval("(\"a\",).enumerate()"),
        Some(Value::Array(
            [Value::Array([Value::Int(0), Value::str("a")].into_iter().collect::<Array>())]
                .into_iter()
                .collect::<Array>()
        ))
    );
}

#[test]
fn array_chunks() {
    assert_eq!(
        eval("(1, 2, 3).chunks(2)"),
        Some(Value::Array([ints(&[1, 2]), ints(&[3])].into_iter().collect::<Array>()))
    );
    assert!(eval_code("(1, 2).chunks(0)").is_err());
}

#[test]
fn dict_methods() {
    assert_eq!(eval("(b: 1, a: 2).keys()"), Some(strs(&["b", "a"])));
    assert_eq!(eval("(b: 1, a: 2).values()"), Some(ints(&[1, 2])));
    assert_eq!(eval("(a: 1).at(\"z\", default: 5)"), Some(Value::Int(5)));
    assert_eq!(
        eval_code("(a: 1).at(\"z\")").err().map(|e| e.kind),
        Some(EvalErrorKind::KeyNotFound { key: "z".into() })
    );
    assert_eq!(
        eval("let d = (a: 1, b: 2); let removed = d.remove(\"a\"); (removed, d.len())"),
        Some(ints(&[1, 1]))
    );
}

#[test]
fn dict_fields() {
    assert_eq!(eval("(a: 1).a"), Some(Value::Int(1)));
    assert!(eval_code("(a: 1).b").is_err());
}

#[test]
fn content_fields() {
    assert_eq!(eval("strong[x].has(\"body\")"), Some(Value::Bool(true)));
    assert_eq!(eval("heading(level: 2)[x].level"), Some(Value::Int(2)));
    assert_eq!(eval("strong[x].func() == strong"), Some(Value::Bool(true)));
    assert_eq!(eval("emph[x].func() == strong"), Some(Value::Bool(false)));
}

#[test]
fn unknown_methods_and_fields() {
    assert!(matches!(
        eval_code("(1, 2).frobnicate()").err().map(|e| e.kind),
        Some(EvalErrorKind::UnknownField { .. })
    ));
    assert!(eval_code("1.foo").is_err());
}

#[test]
fn methods_are_values_too() {
    assert_eq!(eval("let f = (1, 2, 3).map; f(x => x + 1)"), Some(ints(&[2, 3, 4])));
}

#[test]
fn mutation_needs_a_place() {
    assert!(eval_code("(1, 2).push(3)").is_err());
    assert!(is_mutating("push"));
    assert!(!is_mutating("map"));
}

#[test]
fn length_conversions() {
    assert_eq!(eval("72pt.inches()"), Some(Value::Float(1.0)));
    assert_eq!(eval("1in.pt()"), Some(Value::Float(72.0)));
}

#[test]
fn version_components() {
    assert_eq!(eval("version(1, 2, 3).major"), Some(Value::Int(1)));
    assert_eq!(eval("version(1, 2).at(-1)"), Some(Value::Int(2)));
    assert!(eval_code("version(1, 2).at(2)").is_err());
}

proptest! {
    #[test]
    fn sorted_is_ordered(items in proptest::collection::vec(-50i64..50, 0..12)) {
        let list: Vec<String> = items.iter().map(i64::to_string).collect();
        let code = format!("({}{}).sorted()", list.join(", "), if items.len() == 1 { "," } else { "" });
        let mut expected = items.clone();
        expected.sort_unstable();
        prop_assert_eq!(eval(&code), Some(ints(&expected)));
    }

    #[test]
    fn rev_twice_is_identity(items in proptest::collection::vec(0i64..100, 2..10)) {
        let list: Vec<String> = items.iter().map(i64::to_string).collect();
        let code = format!("({}).rev().rev()", list.join(", "));
        prop_assert_eq!(eval(&code), Some(ints(&items)));
    }
}
