use folio_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;

use super::{codes, ints, kind_of};
use crate::errors::{ArgSlot, EvalErrorKind};
use crate::testing::{eval_code, eval_markup_warnings};
use crate::value::Value;

#[test]
fn named_parameters_have_defaults() {
    assert_eq!(
        eval_code("let f(x, y: 2) = x + y; f(1) + f(1, y: 10)").ok(),
        Some(Value::Int(14))
    );
}

#[test]
fn sinks_collect_the_rest() {
    assert_eq!(
        eval_code("let f(..args) = args.pos().len(); f(1, 2, 3)").ok(),
        Some(Value::Int(3))
    );
    assert_eq!(
        eval_code("let f(first, ..rest, last) = (first, last); f(1, 2, 3, 4)").ok(),
        Some(ints(&[1, 4]))
    );
}

#[test]
fn closures_call_themselves_by_name() {
    assert_eq!(
        eval_code("let fact(n) = if n <= 1 { 1 } else { n * fact(n - 1) }; fact(5)").ok(),
        Some(Value::Int(120))
    );
}

#[test]
fn parameters_shadow_the_function_name() {
    assert_eq!(eval_code("let f(f) = f; f(1)").ok(), Some(Value::Int(1)));
    assert_eq!(
        eval_code("let g(x, g: 3) = x + g; g(1)").ok(),
        Some(Value::Int(4))
    );
}

#[test]
fn captures_are_taken_at_definition() {
    assert_eq!(
        eval_code("let x = 1; let f() = x; { let x = 2; f() }").ok(),
        Some(Value::Int(1))
    );
    assert_eq!(
        eval_code("let y = 1; let f(x: y) = x; { let y = 5; f() }").ok(),
        Some(Value::Int(1))
    );
}

#[test]
fn captured_variables_are_read_only() {
    assert_eq!(
        kind_of(eval_code("let x = 1; let f() = { x += 1 }; f()")),
        Some(EvalErrorKind::CapturedMutation { name: "x".into() })
    );
}

#[test]
fn argument_errors() {
    assert_eq!(
        kind_of(eval_code("let f(x) = x; f()")),
        Some(EvalErrorKind::MissingArgument { name: "x".into() })
    );
    assert_eq!(
        kind_of(eval_code("let f(x) = x; f(1, 2)")),
        Some(EvalErrorKind::UnexpectedArgument {
            slot: ArgSlot::Positional(1)
        })
    );
    assert!(matches!(
        kind_of(eval_code("let f(x) = x; f(1, z: 2)")),
        Some(EvalErrorKind::UnexpectedArgument { .. })
    ));
}

#[test]
fn only_functions_and_types_are_callable() {
    assert_eq!(
        kind_of(eval_code("let x = 1; x()")),
        Some(EvalErrorKind::NotCallable { got: "integer".into() })
    );
    assert_eq!(eval_code("int(\"12\")").ok(), Some(Value::Int(12)));
}

#[test]
fn return_leaves_the_closure() {
    assert_eq!(eval_code("let f() = { return 5; 6 }; f()").ok(), Some(Value::Int(5)));
    assert_eq!(
        eval_code("let f(x) = { if x { return 1 }; 2 }; (f(true), f(false))").ok(),
        Some(ints(&[1, 2]))
    );
}

#[test]
fn return_inside_a_loop_reaches_the_closure() {
    assert_eq!(
        eval_code("let f() = { for x in (1, 2, 3) { if x == 2 { return x } }; 0 }; f()").ok(),
        Some(Value::Int(2))
    );
}

#[test]
fn partial_application() {
    assert_eq!(
        eval_code("let add(a, b) = a + b; let inc = add.with(1); inc(2)").ok(),
        Some(Value::Int(3))
    );
}

#[test]
fn arrow_closures_as_arguments() {
    assert_eq!(
        eval_code("let double = x => x * 2; (1, 2).map(double)").ok(),
        Some(ints(&[2, 4]))
    );
    assert_eq!(
        eval_code("(1, 2, 3, 4).filter(x => x > 2).len()").ok(),
        Some(Value::Int(2))
    );
}

#[test]
fn unbounded_recursion_hits_the_call_limit() {
    assert_eq!(
        kind_of(eval_code("let f(n) = f(n + 1); f(0)")),
        Some(EvalErrorKind::RecursionLimit {
            what: "function call",
            limit: 256
        })
    );
}

#[test]
fn errors_inside_calls_carry_a_trace() {
    let error = eval_code("let f(x) = x + \"a\"; f(1)").err();
    let Some(error) = error else {
        panic!("adding a string to an integer must fail");
    };
    assert!(!error.trace.is_empty());
}

#[test]
fn unconditional_return_discarding_content_warns() {
    let (result, warnings) = eval_markup_warnings("#let f() = { [a]; return 1 }\n#f()");
    let text = result.ok().map(|content| content.plain_text().trim().to_owned());
    assert_eq!(text, Some("1".into()));
    assert_eq!(codes(&warnings), vec![ErrorCode::W6006]);
}

#[test]
fn conditional_return_does_not_warn() {
    let (result, warnings) =
        eval_markup_warnings("#let f(x) = { [a]; if x { return 1 } }\n#f(true)");
    assert!(result.is_ok());
    assert!(warnings.is_empty());
}
